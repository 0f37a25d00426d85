use calamine::{open_workbook, DataType, Range, Reader, Xlsx};
use comment_survey::memory::MemorySpreadsheet;
use comment_survey::Grid;
use snafu::prelude::*;

use crate::setup::{io_common::file_stem, *};

/// Reads all the worksheets of an Excel workbook.
pub fn read_xlsx_spreadsheet(path: &Path) -> SetupResult<MemorySpreadsheet> {
    let path_s = path.display().to_string();
    let mut workbook: Xlsx<_> = open_workbook(path).context(OpeningExcelSnafu {
        path: path_s.clone(),
    })?;

    let mut ss = MemorySpreadsheet::new(&path_s, &file_stem(path));
    let sheet_names: Vec<String> = workbook.sheet_names().to_owned();
    for sheet_name in sheet_names {
        let grid = match workbook.worksheet_range(&sheet_name) {
            Some(wrange) => range_to_grid(&wrange.context(ReadingWorksheetSnafu {
                path: path_s.clone(),
                sheet_name: sheet_name.clone(),
            })?),
            None => Vec::new(),
        };
        debug!(
            "read_xlsx_spreadsheet: worksheet: {:?} rows: {:?}",
            sheet_name,
            grid.len()
        );
        ss = ss.with_sheet(&sheet_name, grid);
    }
    info!("Read {} worksheets from {:?}", ss.sheet_names().len(), path_s);
    Ok(ss)
}

/// Converts a worksheet to a grid anchored at cell A1.
///
/// The range returned by calamine starts at the first used cell, so the
/// unused leading rows and columns are put back to keep the column indexes
/// those of the spreadsheet.
fn range_to_grid(wrange: &Range<DataType>) -> Grid {
    let (row0, col0) = match wrange.start() {
        Some((r, c)) => (r as usize, c as usize),
        None => return Vec::new(),
    };
    let mut grid: Grid = vec![Vec::new(); row0];
    for row in wrange.rows() {
        let mut cells: Vec<String> = vec![String::new(); col0];
        cells.extend(row.iter().map(read_cell));
        grid.push(cells);
    }
    grid
}

fn read_cell(cell: &DataType) -> String {
    match cell {
        DataType::String(s) => s.clone(),
        DataType::Empty => String::new(),
        DataType::Bool(true) => "TRUE".to_string(),
        DataType::Bool(false) => "FALSE".to_string(),
        DataType::Int(i) => i.to_string(),
        // Also covers the dates, which are kept as serial numbers.
        DataType::Float(f) | DataType::DateTime(f) => f.to_string(),
        other => {
            debug!("read_cell: unexpected cell {:?}", other);
            format!("{:?}", other)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::setup::io_common::tests::scratch_dir;

    #[test]
    fn cells_as_text() {
        assert_eq!(read_cell(&DataType::String("Great value".to_string())), "Great value");
        assert_eq!(read_cell(&DataType::Empty), "");
        assert_eq!(read_cell(&DataType::Float(3.0)), "3");
        assert_eq!(read_cell(&DataType::Float(2.5)), "2.5");
        assert_eq!(read_cell(&DataType::Int(-7)), "-7");
        assert_eq!(read_cell(&DataType::Bool(true)), "TRUE");
    }

    #[test]
    fn grid_is_anchored_at_a1() {
        // Values in B2:C3
        let mut wrange: Range<DataType> = Range::new((1, 1), (2, 2));
        wrange.set_value((1, 1), DataType::String("h1".to_string()));
        wrange.set_value((1, 2), DataType::String("h2".to_string()));
        wrange.set_value((2, 2), DataType::Float(4.0));

        let grid = range_to_grid(&wrange);
        assert_eq!(grid.len(), 3);
        assert!(grid[0].is_empty());
        assert_eq!(grid[1], vec!["", "h1", "h2"]);
        assert_eq!(grid[2], vec!["", "", "4"]);
    }

    #[test]
    fn empty_range() {
        let wrange: Range<DataType> = Range::empty();
        assert!(range_to_grid(&wrange).is_empty());
    }

    #[test]
    fn missing_file() {
        let tmp = scratch_dir("missing_file_xlsx");
        let dir = tmp.path();
        let res = read_xlsx_spreadsheet(&dir.join("nope.xlsx"));
        assert!(matches!(res, Err(SetupError::OpeningExcel { .. })));
    }
}
