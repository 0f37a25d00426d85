// ********* Input data structures ***********

use std::error::Error;
use std::fmt::Display;

use serde::{Deserialize, Serialize};
use snafu::Snafu;

/// The cells of a sheet, row by row. The first row is the header.
pub type Grid = Vec<Vec<String>>;

/// The comments found in one column of a sheet, header excluded.
///
/// The order follows the rows of the sheet and is the order in which the
/// choices are presented to the voters.
#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct CommentColumn(Vec<String>);

impl CommentColumn {
    pub fn values(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_values(self) -> Vec<String> {
        self.0
    }
}

impl From<Vec<String>> for CommentColumn {
    fn from(values: Vec<String>) -> Self {
        CommentColumn(values)
    }
}

/// Everything needed to create one voting survey.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct SurveyRequest {
    pub title: String,
    pub timestamp_label: String,
    /// The spreadsheet that receives the responses to the new survey.
    pub destination_spreadsheet_id: String,
    pub column_a: CommentColumn,
    pub column_b: CommentColumn,
}

impl SurveyRequest {
    /// The label of the section header, `"{title} @ {timestamp}"`.
    pub fn header_title(&self) -> String {
        format!("{} @ {}", self.title, self.timestamp_label)
    }
}

// ******** Output data structures *********

/// The locations of a newly created survey, as assigned by the form service.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct SurveyResult {
    pub published_url: String,
    pub edit_url: String,
}

/// One element of a survey.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum SurveyItem {
    /// A label without any input.
    SectionHeader { title: String },
    /// A question where any number of the choices may be ticked.
    Checkbox { title: String, choices: Vec<String> },
}

/// A survey, as held by a form service.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct SurveyDocument {
    pub name: String,
    #[serde(rename = "responseDestination")]
    pub response_destination: Option<String>,
    #[serde(rename = "publishingSummary")]
    pub publishing_summary: bool,
    pub items: Vec<SurveyItem>,
}

impl SurveyDocument {
    pub fn new(name: &str) -> SurveyDocument {
        SurveyDocument {
            name: name.to_string(),
            response_destination: None,
            publishing_summary: false,
            items: Vec::new(),
        }
    }

    /// The checkbox questions of the survey, in order.
    pub fn checkbox_questions(&self) -> Vec<(&str, &[String])> {
        self.items
            .iter()
            .filter_map(|item| match item {
                SurveyItem::Checkbox { title, choices } => Some((title.as_str(), choices.as_slice())),
                SurveyItem::SectionHeader { .. } => None,
            })
            .collect()
    }
}

/// The spreadsheet as a whole.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct SpreadsheetInfo {
    pub id: String,
    pub name: String,
}

/// A sheet found inside a spreadsheet.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct SheetRef {
    pub name: String,
    pub index: usize,
}

/// A survey created by a form service.
#[derive(Eq, PartialEq, Debug, Clone, Hash)]
pub struct SurveyHandle(pub String);

/// A question added to a survey.
#[derive(Eq, PartialEq, Debug, Clone, Hash)]
pub struct QuestionHandle {
    pub survey: SurveyHandle,
    pub index: usize,
}

// ********* Errors **********

/// A failure reported by the spreadsheet or the form service.
#[derive(Debug)]
pub struct ServiceError {
    message: String,
    source: Option<Box<dyn Error + Send + Sync>>,
}

impl ServiceError {
    pub fn new(message: impl Into<String>) -> ServiceError {
        ServiceError {
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source(
        message: impl Into<String>,
        source: impl Error + Send + Sync + 'static,
    ) -> ServiceError {
        ServiceError {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn Error + 'static))
    }
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// Errors that prevent a survey from being set up.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum SurveyError {
    #[snafu(display("Invalid argument: {message}"))]
    InvalidArgument { message: String },

    #[snafu(display("Sheet {sheet_name:?} not found in spreadsheet {spreadsheet:?}"))]
    NotFound {
        sheet_name: String,
        spreadsheet: String,
    },

    #[snafu(display("Service error: {source}"))]
    Service { source: ServiceError },
}

pub type Result<T, E = SurveyError> = std::result::Result<T, E>;

// ********* Configuration **********

pub const DEFAULT_SHEET_NAME: &str = "Form Responses 1";
/// Column D.
pub const DEFAULT_COLUMN_A: i64 = 3;
/// Column E.
pub const DEFAULT_COLUMN_B: i64 = 4;
pub const DEFAULT_FORM_NAME: &str = "Survey Response Voting";
pub const DEFAULT_QUESTION_A: &str =
    "A. Which of the following comments do you find most valuable? Choose three (3).";
pub const DEFAULT_QUESTION_B: &str =
    "B. Which of the following comments do you find most valuable? Choose three (3).";

/// What to do with a comment column that has no rows.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EmptyColumnPolicy {
    /// Fail before any survey is created.
    Reject,
    /// Create a question without choices.
    Allow,
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct SurveyConfig {
    /// The sheet holding the form responses.
    pub sheet_name: String,
    /// Zero-based index of the first comment column.
    pub column_a: i64,
    /// Zero-based index of the second comment column.
    pub column_b: i64,
    /// Display name of the created survey.
    pub form_name: String,
    pub question_a: String,
    pub question_b: String,
    /// Lets respondents see a summary of the responses.
    pub publishing_summary: bool,
    pub empty_columns: EmptyColumnPolicy,
}

impl Default for SurveyConfig {
    fn default() -> Self {
        SurveyConfig {
            sheet_name: DEFAULT_SHEET_NAME.to_string(),
            column_a: DEFAULT_COLUMN_A,
            column_b: DEFAULT_COLUMN_B,
            form_name: DEFAULT_FORM_NAME.to_string(),
            question_a: DEFAULT_QUESTION_A.to_string(),
            question_b: DEFAULT_QUESTION_B.to_string(),
            publishing_summary: true,
            empty_columns: EmptyColumnPolicy::Reject,
        }
    }
}
