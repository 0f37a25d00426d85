use crate::setup::*;

use comment_survey::EmptyColumnPolicy;
use serde::{Deserialize, Serialize};
use serde_json::Value as JSValue;
use snafu::prelude::*;
use std::fs;

#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceSettings {
    pub provider: Option<String>,
    #[serde(rename = "filePath")]
    pub file_path: Option<String>,
    #[serde(rename = "sheetName")]
    pub sheet_name: Option<String>,
    #[serde(rename = "columnA")]
    _column_a: Option<JSValue>,
    #[serde(rename = "columnB")]
    _column_b: Option<JSValue>,
}

impl SourceSettings {
    pub fn column_a(&self) -> SetupResult<Option<i64>> {
        read_js_column(&self._column_a)
    }

    pub fn column_b(&self) -> SetupResult<Option<i64>> {
        read_js_column(&self._column_b)
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct SurveySettings {
    #[serde(rename = "formName")]
    pub form_name: Option<String>,
    #[serde(rename = "questionA")]
    pub question_a: Option<String>,
    #[serde(rename = "questionB")]
    pub question_b: Option<String>,
    #[serde(rename = "publishingSummary")]
    pub publishing_summary: Option<bool>,
    #[serde(rename = "emptyColumns")]
    pub empty_columns: Option<EmptyColumnPolicy>,
}

#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputSettings {
    pub directory: Option<String>,
    #[serde(rename = "baseUrl")]
    pub base_url: Option<String>,
}

#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResurveyConfig {
    #[serde(default)]
    pub source: SourceSettings,
    #[serde(default)]
    pub survey: SurveySettings,
    #[serde(default)]
    pub output: OutputSettings,
}

pub fn read_config(path: &str) -> SetupResult<ResurveyConfig> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let config: ResurveyConfig =
        serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu { path })?;
    Ok(config)
}

/// Parses a column given as spreadsheet letters (`D`, `aa`) or as a zero-based index (`3`).
///
/// Negative indexes are passed through, the extraction rejects them.
pub fn parse_column(column: &str) -> SetupResult<i64> {
    let s = column.trim();
    if !s.is_empty() && s.chars().all(|c| c.is_ascii_alphabetic()) {
        // Bijective base 26: A=1 .. Z=26, AA=27.
        let mut n: i64 = 0;
        for c in s.to_ascii_uppercase().chars() {
            n = n
                .checked_mul(26)
                .and_then(|n| n.checked_add((c as i64) - ('A' as i64) + 1))
                .context(InvalidColumnSnafu { column })?;
        }
        Ok(n - 1)
    } else {
        s.parse::<i64>().ok().context(InvalidColumnSnafu { column })
    }
}

fn read_js_column(x: &Option<JSValue>) -> SetupResult<Option<i64>> {
    match x {
        None | Some(JSValue::Null) => Ok(None),
        Some(JSValue::Number(n)) => n.as_i64().map(Some).context(InvalidColumnSnafu {
            column: n.to_string(),
        }),
        Some(JSValue::String(s)) => parse_column(s).map(Some),
        Some(other) => InvalidColumnSnafu {
            column: other.to_string(),
        }
        .fail(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn column_letters() {
        assert_eq!(parse_column("A").unwrap(), 0);
        assert_eq!(parse_column("D").unwrap(), 3);
        assert_eq!(parse_column("e").unwrap(), 4);
        assert_eq!(parse_column("Z").unwrap(), 25);
        assert_eq!(parse_column("AA").unwrap(), 26);
        assert_eq!(parse_column("AD").unwrap(), 29);
    }

    #[test]
    fn column_numbers_are_zero_based() {
        assert_eq!(parse_column("3").unwrap(), 3);
        assert_eq!(parse_column(" 0 ").unwrap(), 0);
        assert_eq!(parse_column("-1").unwrap(), -1);
    }

    #[test]
    fn bad_columns() {
        for column in ["", "D4", "3.5", "Ä"] {
            assert!(
                matches!(parse_column(column), Err(SetupError::InvalidColumn { .. })),
                "{:?}",
                column
            );
        }
    }

    #[test]
    fn json_columns() {
        assert_eq!(read_js_column(&None).unwrap(), None);
        assert_eq!(read_js_column(&Some(json!(4))).unwrap(), Some(4));
        assert_eq!(read_js_column(&Some(json!("4"))).unwrap(), Some(4));
        assert_eq!(read_js_column(&Some(json!("E"))).unwrap(), Some(4));
        assert!(read_js_column(&Some(json!(1.5))).is_err());
        assert!(read_js_column(&Some(json!(true))).is_err());
    }

    #[test]
    fn partial_config() {
        let config: ResurveyConfig =
            serde_json::from_str(r#"{"source": {"columnA": "C"}}"#).unwrap();
        assert_eq!(config.source.column_a().unwrap(), Some(2));
        assert_eq!(config.source.column_b().unwrap(), None);
        assert_eq!(config.survey, SurveySettings::default());
        assert_eq!(config.output, OutputSettings::default());

        let config: ResurveyConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, ResurveyConfig::default());
    }
}
