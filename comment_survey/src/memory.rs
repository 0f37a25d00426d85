/*!
In-memory implementations of the spreadsheet and form services.

They are used for tests, for dry runs, and as the storage layer of services that
persist surveys elsewhere.

```
use comment_survey::memory::{MemoryForms, MemorySpreadsheet};
use comment_survey::{set_up_survey, Grid, SurveyConfig};

let grid: Grid = vec![
    vec!["ts", "name", "q", "like", "dislike"],
    vec!["t1", "Ann", "x", "Great value", "Too slow"],
]
.into_iter()
.map(|row| row.into_iter().map(String::from).collect())
.collect();

let sheets = MemorySpreadsheet::new("sheet-id", "MySheet").with_sheet("Form Responses 1", grid);
let mut forms = MemoryForms::new();
let res = set_up_survey(&sheets, &mut forms, &SurveyConfig::default(), "3:00:00 PM")?;
assert_eq!(res.edit_url, "memory://forms/survey-0001/edit");
# Ok::<(), comment_survey::SurveyError>(())
```
*/

use log::debug;

use crate::config::*;
use crate::service::*;

/// A spreadsheet whose sheets are held in memory.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct MemorySpreadsheet {
    info: SpreadsheetInfo,
    sheets: Vec<(String, Grid)>,
}

impl MemorySpreadsheet {
    pub fn new(id: &str, name: &str) -> MemorySpreadsheet {
        MemorySpreadsheet {
            info: SpreadsheetInfo {
                id: id.to_string(),
                name: name.to_string(),
            },
            sheets: Vec::new(),
        }
    }

    /// Adds a sheet after the existing ones.
    pub fn with_sheet(mut self, name: &str, grid: Grid) -> MemorySpreadsheet {
        self.sheets.push((name.to_string(), grid));
        self
    }

    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|(name, _)| name.as_str()).collect()
    }
}

impl SpreadsheetService for MemorySpreadsheet {
    fn spreadsheet_info(&self) -> Result<SpreadsheetInfo, ServiceError> {
        Ok(self.info.clone())
    }

    fn sheet_by_name(&self, name: &str) -> Result<Option<SheetRef>, ServiceError> {
        Ok(self
            .sheets
            .iter()
            .position(|(sheet_name, _)| sheet_name == name)
            .map(|index| SheetRef {
                name: name.to_string(),
                index,
            }))
    }

    fn data_range(&self, sheet: &SheetRef) -> Result<Grid, ServiceError> {
        match self.sheets.get(sheet.index) {
            Some((name, grid)) if *name == sheet.name => Ok(grid.clone()),
            _ => Err(ServiceError::new(format!(
                "sheet {:?} is not part of spreadsheet {:?}",
                sheet.name, self.info.name
            ))),
        }
    }
}

pub const MEMORY_BASE_URL: &str = "memory://forms";

/// A form service keeping every survey in memory.
///
/// Surveys get sequential ids `{prefix}-0001`, `{prefix}-0002`, ... (numbering can
/// start later, see [`MemoryForms::skip_to_number`]) and their
/// URLs are `{base_url}/{id}/viewform` and `{base_url}/{id}/edit`.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct MemoryForms {
    base_url: String,
    id_prefix: String,
    next_number: usize,
    surveys: Vec<(SurveyHandle, SurveyDocument)>,
}

impl Default for MemoryForms {
    fn default() -> Self {
        MemoryForms::new()
    }
}

impl MemoryForms {
    pub fn new() -> MemoryForms {
        MemoryForms {
            base_url: MEMORY_BASE_URL.to_string(),
            id_prefix: "survey".to_string(),
            next_number: 1,
            surveys: Vec::new(),
        }
    }

    pub fn with_base_url(self, base_url: &str) -> MemoryForms {
        MemoryForms {
            base_url: base_url.trim_end_matches('/').to_string(),
            ..self
        }
    }

    pub fn with_id_prefix(self, id_prefix: &str) -> MemoryForms {
        MemoryForms {
            id_prefix: id_prefix.to_string(),
            ..self
        }
    }

    /// Makes the next surveys get numbers from `number` on, unless they already do.
    pub fn skip_to_number(&mut self, number: usize) {
        self.next_number = self.next_number.max(number);
    }

    pub fn survey(&self, survey: &SurveyHandle) -> Option<&SurveyDocument> {
        self.surveys
            .iter()
            .find(|(handle, _)| handle == survey)
            .map(|(_, doc)| doc)
    }

    /// All the surveys created so far, oldest first.
    pub fn surveys(&self) -> impl Iterator<Item = (&SurveyHandle, &SurveyDocument)> {
        self.surveys.iter().map(|(handle, doc)| (handle, doc))
    }

    pub fn len(&self) -> usize {
        self.surveys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.surveys.is_empty()
    }

    fn survey_mut(&mut self, survey: &SurveyHandle) -> Result<&mut SurveyDocument, ServiceError> {
        self.surveys
            .iter_mut()
            .find(|(handle, _)| handle == survey)
            .map(|(_, doc)| doc)
            .ok_or_else(|| ServiceError::new(format!("unknown survey {:?}", survey.0)))
    }

    fn url(&self, survey: &SurveyHandle, suffix: &str) -> Result<String, ServiceError> {
        self.survey(survey)
            .ok_or_else(|| ServiceError::new(format!("unknown survey {:?}", survey.0)))?;
        Ok(format!("{}/{}/{}", self.base_url, survey.0, suffix))
    }
}

impl FormService for MemoryForms {
    fn create_survey(&mut self, name: &str) -> Result<SurveyHandle, ServiceError> {
        let handle = SurveyHandle(format!("{}-{:04}", self.id_prefix, self.next_number));
        self.next_number += 1;
        debug!("create_survey: {:?} name: {:?}", handle, name);
        self.surveys.push((handle.clone(), SurveyDocument::new(name)));
        Ok(handle)
    }

    fn set_response_destination(
        &mut self,
        survey: &SurveyHandle,
        spreadsheet_id: &str,
    ) -> Result<(), ServiceError> {
        self.survey_mut(survey)?.response_destination = Some(spreadsheet_id.to_string());
        Ok(())
    }

    fn enable_response_summary(
        &mut self,
        survey: &SurveyHandle,
        enabled: bool,
    ) -> Result<(), ServiceError> {
        self.survey_mut(survey)?.publishing_summary = enabled;
        Ok(())
    }

    fn add_header_section(
        &mut self,
        survey: &SurveyHandle,
        title: &str,
    ) -> Result<(), ServiceError> {
        self.survey_mut(survey)?.items.push(SurveyItem::SectionHeader {
            title: title.to_string(),
        });
        Ok(())
    }

    fn add_checkbox_question(
        &mut self,
        survey: &SurveyHandle,
        caption: &str,
        choices: &[String],
    ) -> Result<QuestionHandle, ServiceError> {
        let doc = self.survey_mut(survey)?;
        doc.items.push(SurveyItem::Checkbox {
            title: caption.to_string(),
            choices: choices.to_vec(),
        });
        Ok(QuestionHandle {
            survey: survey.clone(),
            index: doc.items.len() - 1,
        })
    }

    fn published_url(&self, survey: &SurveyHandle) -> Result<String, ServiceError> {
        self.url(survey, "viewform")
    }

    fn edit_url(&self, survey: &SurveyHandle) -> Result<String, ServiceError> {
        self.url(survey, "edit")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(rows: &[&[&str]]) -> Grid {
        rows.iter()
            .map(|row| row.iter().map(|s| s.to_string()).collect())
            .collect()
    }

    #[test]
    fn sheet_lookup_is_exact() {
        let ss = MemorySpreadsheet::new("id", "name")
            .with_sheet("Sheet1", grid(&[&["a"]]))
            .with_sheet("Form Responses 1", grid(&[&["b"]]));
        let sheet = ss.sheet_by_name("Form Responses 1").unwrap().unwrap();
        assert_eq!(sheet.index, 1);
        assert_eq!(ss.data_range(&sheet).unwrap(), grid(&[&["b"]]));
        assert_eq!(ss.sheet_by_name("form responses 1").unwrap(), None);
    }

    #[test]
    fn stale_sheet_ref_fails() {
        let ss = MemorySpreadsheet::new("id", "name").with_sheet("Sheet1", grid(&[&["a"]]));
        let stale = SheetRef {
            name: "Other".to_string(),
            index: 0,
        };
        assert!(ss.data_range(&stale).is_err());
    }

    #[test]
    fn forms_record_items_in_order() {
        let mut forms = MemoryForms::new().with_base_url("https://forms.test/d/");
        let h = forms.create_survey("Votes").unwrap();
        forms.add_header_section(&h, "Header").unwrap();
        let q = forms
            .add_checkbox_question(&h, "Q", &["x".to_string(), "".to_string()])
            .unwrap();
        assert_eq!(q.index, 1);
        assert_eq!(
            forms.published_url(&h).unwrap(),
            "https://forms.test/d/survey-0001/viewform"
        );
        let doc = forms.survey(&h).unwrap();
        assert_eq!(doc.name, "Votes");
        assert_eq!(
            doc.checkbox_questions(),
            vec![("Q", &["x".to_string(), "".to_string()][..])]
        );
    }

    #[test]
    fn numbering_can_start_later() {
        let mut forms = MemoryForms::new().with_id_prefix("run");
        forms.skip_to_number(3);
        assert_eq!(forms.create_survey("a").unwrap().0, "run-0003");
        forms.skip_to_number(2);
        assert_eq!(forms.create_survey("b").unwrap().0, "run-0004");
    }

    #[test]
    fn unknown_survey_is_a_service_error() {
        let mut forms = MemoryForms::new();
        let missing = SurveyHandle("nope".to_string());
        assert!(forms.add_header_section(&missing, "x").is_err());
        assert!(forms.edit_url(&missing).is_err());
    }
}
