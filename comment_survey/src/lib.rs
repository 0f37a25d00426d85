/*!
Turns the free-text comments of a form responses spreadsheet into a new survey,
in which reviewers vote for the comments they find most valuable.

The library is independent of any particular spreadsheet or form host. The
caller passes a [SpreadsheetService] to read from and a [FormService] to create
the survey with. The [memory] module provides implementations of both.

```
use comment_survey::*;

let grid: Grid = vec![
    vec!["ts", "name", "q", "like1", "dislike1"],
    vec!["t1", "Ann", "x", "Great value", "Too slow"],
    vec!["t2", "Bob", "y", "Very helpful", "Confusing UI"],
]
.into_iter()
.map(|row| row.into_iter().map(String::from).collect())
.collect();

let likes = extract_column(&grid, 3)?;
assert_eq!(likes.values(), &["Great value".to_string(), "Very helpful".to_string()]);
# Ok::<(), SurveyError>(())
```
*/

mod config;
pub mod manual;
pub mod memory;
mod service;

use log::{debug, info, warn};
use snafu::prelude::*;

pub use crate::config::*;
pub use crate::service::*;

/// Extracts the values of one column, skipping the header row.
///
/// Rows that are too short contribute an empty string, so the result always
/// has one entry per non-header row.
///
/// Arguments:
/// * `grid` the cells of the sheet, the first row being the header
/// * `column_index` the zero-based index of the column. Negative values are rejected.
pub fn extract_column(grid: &[Vec<String>], column_index: i64) -> Result<CommentColumn> {
    let idx = usize::try_from(column_index).ok().context(InvalidArgumentSnafu {
        message: format!("column index must not be negative, got {}", column_index),
    })?;

    let values: Vec<String> = grid
        .iter()
        .skip(1)
        .map(|row| row.get(idx).cloned().unwrap_or_default())
        .collect();
    debug!(
        "extract_column: column {:?}: {:?} values",
        column_index,
        values.len()
    );
    Ok(CommentColumn::from(values))
}

/// Creates the voting survey with the given form service.
///
/// The survey holds a section header `"{title} @ {timestamp}"` followed by one
/// checkbox question per comment column. Any failure of the service aborts the
/// construction; a survey created before the failure is left as it is.
pub fn build_survey<F: FormService + ?Sized>(
    forms: &mut F,
    request: SurveyRequest,
    config: &SurveyConfig,
) -> Result<SurveyResult> {
    for (caption, column) in [
        (&config.question_a, &request.column_a),
        (&config.question_b, &request.column_b),
    ] {
        if column.is_empty() {
            match config.empty_columns {
                EmptyColumnPolicy::Reject => {
                    return InvalidArgumentSnafu {
                        message: format!("no comments to vote on for question {:?}", caption),
                    }
                    .fail();
                }
                EmptyColumnPolicy::Allow => {
                    warn!(
                        "build_survey: question {:?} will not have any choice",
                        caption
                    );
                }
            }
        }
    }

    let survey = forms
        .create_survey(&config.form_name)
        .context(ServiceSnafu {})?;
    debug!("build_survey: created survey {:?}", survey);
    forms
        .set_response_destination(&survey, &request.destination_spreadsheet_id)
        .context(ServiceSnafu {})?;
    forms
        .enable_response_summary(&survey, config.publishing_summary)
        .context(ServiceSnafu {})?;
    forms
        .add_header_section(&survey, &request.header_title())
        .context(ServiceSnafu {})?;
    forms
        .add_checkbox_question(&survey, &config.question_a, request.column_a.values())
        .context(ServiceSnafu {})?;
    forms
        .add_checkbox_question(&survey, &config.question_b, request.column_b.values())
        .context(ServiceSnafu {})?;

    Ok(SurveyResult {
        published_url: forms.published_url(&survey).context(ServiceSnafu {})?,
        edit_url: forms.edit_url(&survey).context(ServiceSnafu {})?,
    })
}

/// Reads the comments from the response sheet and creates the voting survey.
///
/// The title of the survey is the name of the spreadsheet. Nothing is created
/// if the response sheet cannot be found or a column index is invalid.
pub fn set_up_survey<S, F>(
    spreadsheets: &S,
    forms: &mut F,
    config: &SurveyConfig,
    timestamp_label: &str,
) -> Result<SurveyResult>
where
    S: SpreadsheetService + ?Sized,
    F: FormService + ?Sized,
{
    let ss = spreadsheets.spreadsheet_info().context(ServiceSnafu {})?;
    info!("Setting up survey from spreadsheet {:?}", ss.name);

    let sheet = spreadsheets
        .sheet_by_name(&config.sheet_name)
        .context(ServiceSnafu {})?
        .context(NotFoundSnafu {
            sheet_name: config.sheet_name.clone(),
            spreadsheet: ss.name.clone(),
        })?;
    let grid = spreadsheets.data_range(&sheet).context(ServiceSnafu {})?;
    if grid.len() <= 1 {
        warn!(
            "Sheet {:?} does not have any response below its header",
            sheet.name
        );
    }

    let column_a = extract_column(&grid, config.column_a)?;
    let column_b = extract_column(&grid, config.column_b)?;
    info!(
        "Read {} + {} comments from sheet {:?}",
        column_a.len(),
        column_b.len(),
        sheet.name
    );

    let request = SurveyRequest {
        title: ss.name,
        timestamp_label: timestamp_label.to_string(),
        destination_spreadsheet_id: ss.id,
        column_a,
        column_b,
    };
    let res = build_survey(forms, request, config)?;

    info!("Published URL: {}", res.published_url);
    info!("Editor URL: {}", res.edit_url);
    Ok(res)
}
