use crate::config::*;

/// Read access to a spreadsheet.
pub trait SpreadsheetService {
    fn spreadsheet_info(&self) -> Result<SpreadsheetInfo, ServiceError>;

    /// Finds a sheet by its exact name.
    fn sheet_by_name(&self, name: &str) -> Result<Option<SheetRef>, ServiceError>;

    /// All the populated cells of the sheet. The first row is the header.
    fn data_range(&self, sheet: &SheetRef) -> Result<Grid, ServiceError>;
}

/// Write access to a service hosting surveys.
///
/// Every call may fail. A failed call leaves the survey as the service left it:
/// nothing is rolled back.
pub trait FormService {
    fn create_survey(&mut self, name: &str) -> Result<SurveyHandle, ServiceError>;

    fn set_response_destination(
        &mut self,
        survey: &SurveyHandle,
        spreadsheet_id: &str,
    ) -> Result<(), ServiceError>;

    fn enable_response_summary(
        &mut self,
        survey: &SurveyHandle,
        enabled: bool,
    ) -> Result<(), ServiceError>;

    fn add_header_section(&mut self, survey: &SurveyHandle, title: &str)
        -> Result<(), ServiceError>;

    fn add_checkbox_question(
        &mut self,
        survey: &SurveyHandle,
        caption: &str,
        choices: &[String],
    ) -> Result<QuestionHandle, ServiceError>;

    fn published_url(&self, survey: &SurveyHandle) -> Result<String, ServiceError>;

    fn edit_url(&self, survey: &SurveyHandle) -> Result<String, ServiceError>;
}
