/*!

This is the long-form manual for `comment_survey` and `resurvey`.

## What it does

A Google Form collects free-text answers, for example "what did you like?" and
"what did you dislike?". The responses end up in a spreadsheet, one row per
response. `resurvey` reads two of these answer columns and creates a second
survey in which reviewers tick the comments they find most valuable. Counting
the ticks gives a ranking of the comments without anybody tallying by hand.

The created survey contains:
* a section header `"{spreadsheet name} @ {time}"`, so several voting rounds on
  the same spreadsheet can be told apart
* question A, a checkbox question whose choices are the comments of the first column
* question B, the same for the second column

Both questions ask the reviewer to choose three comments. The choices keep the
order of the rows, blank comments included, and duplicates are not merged.

## Input formats

The responses sheet must have a header in its first row. By default it is
named `Form Responses 1` (the name Google Forms gives it) and the comments are
in columns D and E.

### `xlsx`

An Excel workbook, for example downloaded from Google Sheets with
*File > Download > Microsoft Excel*. All the worksheets are read and the
responses sheet is looked up by name. Numbers and booleans are turned into text.

### `csv`

A single sheet in CSV format. Google Sheets names its CSV downloads
`"{spreadsheet} - {sheet}.csv"`; when the file name follows this pattern, it
provides both the spreadsheet name (used in the header) and the sheet name.
Otherwise both names are the file name without its extension, and the sheet
name must be set accordingly with `--sheet-name`.

## Output

Each survey is stored as a JSON document in the output directory, named after
its id. The program prints the published URL and the editor URL of the survey.
With `--dry-run`, nothing is stored and the survey is printed instead.

## Configuration

All the options have defaults. They can be changed in a JSON configuration file
passed with `--config`, and the command line flags override the file.

```json
{
  "source": {
    "provider": "xlsx",
    "filePath": "responses.xlsx",
    "sheetName": "Form Responses 1",
    "columnA": "D",
    "columnB": 4
  },
  "survey": {
    "formName": "Survey Response Voting",
    "questionA": "A. Which of the following comments do you find most valuable? Choose three (3).",
    "questionB": "B. Which of the following comments do you find most valuable? Choose three (3).",
    "publishingSummary": true,
    "emptyColumns": "reject"
  },
  "output": {
    "directory": "surveys",
    "baseUrl": "https://forms.example.org/d"
  }
}
```

Notes:
 - `columnA` and `columnB` are either a zero-based index (`3` is column D) or
   the letters of the column (`"D"`, `"AA"`).
 - `filePath` and `directory` are relative to the configuration file.
 - `emptyColumns` is `reject` (the default) or `allow`. With `reject`, a
   column without any comment stops the program before the survey is created.
   With `allow`, the corresponding question has no choices.

 */
