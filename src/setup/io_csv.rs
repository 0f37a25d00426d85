// Primitives for reading CSV files.

use comment_survey::memory::MemorySpreadsheet;
use comment_survey::Grid;
use snafu::prelude::*;

use crate::setup::{
    io_common::{file_stem, split_export_name},
    *,
};

/// Reads a CSV file as a spreadsheet with a single sheet.
///
/// The names of the spreadsheet and of the sheet come from the file name.
pub fn read_csv_spreadsheet(path: &Path) -> SetupResult<MemorySpreadsheet> {
    let path_s = path.display().to_string();
    let (spreadsheet_name, sheet_name) = split_export_name(&file_stem(path));
    debug!(
        "read_csv_spreadsheet: path: {:?} spreadsheet: {:?} sheet: {:?}",
        path_s, spreadsheet_name, sheet_name
    );

    let rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        // Responses to questions added later to the form leave the first rows short.
        .flexible(true)
        .from_path(path)
        .context(CsvOpenSnafu {
            path: path_s.clone(),
        })?;

    let mut grid: Grid = Vec::new();
    for (idx, line_r) in rdr.into_records().enumerate() {
        let lineno = idx + 1;
        let line = line_r.context(CsvLineParseSnafu {
            path: path_s.clone(),
            lineno,
        })?;
        debug!("read_csv_spreadsheet: lineno: {:?} row: {:?}", lineno, &line);
        grid.push(line.iter().map(|s| s.to_string()).collect());
    }
    info!("Read {} rows from {:?}", grid.len(), path_s);

    Ok(MemorySpreadsheet::new(&path_s, &spreadsheet_name).with_sheet(&sheet_name, grid))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::setup::io_common::tests::scratch_dir;
    use comment_survey::SpreadsheetService;
    use std::fs;

    #[test]
    fn export_name_gives_sheet_name() {
        let tmp = scratch_dir("export_name_gives_sheet_name");
        let dir = tmp.path();
        let path = dir.join("Team feedback - Form Responses 1.csv");
        fs::write(
            &path,
            "ts,name,q,like,dislike\nt1,Ann,x,\"Great, really\",Too slow\nt2,Bob\n",
        )
        .unwrap();

        let ss = read_csv_spreadsheet(&path).unwrap();
        let info = ss.spreadsheet_info().unwrap();
        assert_eq!(info.name, "Team feedback");
        assert_eq!(info.id, path.display().to_string());

        let sheet = ss.sheet_by_name("Form Responses 1").unwrap().unwrap();
        let grid = ss.data_range(&sheet).unwrap();
        assert_eq!(grid.len(), 3);
        assert_eq!(grid[1][3], "Great, really");
        assert_eq!(grid[2], vec!["t2".to_string(), "Bob".to_string()]);
    }

    #[test]
    fn plain_name_is_used_for_both() {
        let tmp = scratch_dir("plain_name_is_used_for_both");
        let dir = tmp.path();
        let path = dir.join("responses.csv");
        fs::write(&path, "a,b\n").unwrap();

        let ss = read_csv_spreadsheet(&path).unwrap();
        assert_eq!(ss.spreadsheet_info().unwrap().name, "responses");
        assert_eq!(ss.sheet_names(), vec!["responses"]);
    }

    #[test]
    fn missing_file() {
        let tmp = scratch_dir("missing_file_csv");
        let dir = tmp.path();
        let res = read_csv_spreadsheet(&dir.join("nope.csv"));
        assert!(matches!(res, Err(SetupError::CsvOpen { .. })));
    }
}
