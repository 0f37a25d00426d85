use std::path::Path;

/// The name of the file without its directory and extension.
pub fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default()
}

/// Splits the name of a sheet downloaded from Google Sheets, `"{spreadsheet} - {sheet}"`.
///
/// Names without the separator are used for both parts.
pub fn split_export_name(stem: &str) -> (String, String) {
    match stem.rsplit_once(" - ") {
        Some((spreadsheet, sheet)) if !spreadsheet.is_empty() && !sheet.is_empty() => {
            (spreadsheet.to_string(), sheet.to_string())
        }
        _ => (stem.to_string(), stem.to_string()),
    }
}
