use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};

use comment_survey::memory::MemoryForms;
use comment_survey::{FormService, QuestionHandle, ServiceError, SurveyDocument, SurveyHandle};
use serde::Serialize;
use snafu::prelude::*;

use crate::setup::*;

/// What is written for each survey.
#[derive(Serialize)]
struct StoredSurvey<'a> {
    id: &'a str,
    #[serde(rename = "publishedUrl")]
    published_url: String,
    #[serde(rename = "editUrl")]
    edit_url: String,
    survey: &'a SurveyDocument,
}

/// A form service that stores every survey as a JSON file in a directory.
///
/// The file `{id}.json` is rewritten after each change of the survey, so it
/// reflects everything done before a failure. An existing file is never taken
/// over by a new survey.
pub struct JsonFormStore {
    directory: PathBuf,
    id_prefix: String,
    forms: MemoryForms,
}

impl JsonFormStore {
    /// Opens the store, creating the directory if needed.
    ///
    /// The URLs of the surveys start with `base_url`, or with the file URL of
    /// the directory if no base is given.
    pub fn open(directory: &Path, base_url: Option<&str>) -> SetupResult<JsonFormStore> {
        fs::create_dir_all(directory).context(CreatingOutputDirSnafu {
            path: directory.display().to_string(),
        })?;
        let directory = fs::canonicalize(directory).context(CreatingOutputDirSnafu {
            path: directory.display().to_string(),
        })?;
        let base_url = match base_url {
            Some(b) => b.to_string(),
            None => format!("file://{}", directory.display()),
        };
        let id_prefix = chrono::Local::now().format("%Y%m%d-%H%M%S").to_string();
        info!(
            "Storing surveys in {:?} with base url {:?}",
            directory, base_url
        );
        Ok(JsonFormStore {
            directory,
            forms: MemoryForms::new()
                .with_base_url(&base_url)
                .with_id_prefix(&id_prefix),
            id_prefix,
        })
    }

    pub fn survey_path(&self, survey: &SurveyHandle) -> PathBuf {
        self.directory.join(format!("{}.json", survey.0))
    }

    /// Writes the survey. With `new`, fails instead of replacing an existing file.
    fn persist(&self, survey: &SurveyHandle, new: bool) -> Result<(), ServiceError> {
        let doc = self
            .forms
            .survey(survey)
            .ok_or_else(|| ServiceError::new(format!("unknown survey {:?}", survey.0)))?;
        let stored = StoredSurvey {
            id: &survey.0,
            published_url: self.forms.published_url(survey)?,
            edit_url: self.forms.edit_url(survey)?,
            survey: doc,
        };
        let path = self.survey_path(survey);
        debug!("persist: writing {:?}", path);
        let file = if new {
            OpenOptions::new().write(true).create_new(true).open(&path)
        } else {
            File::create(&path)
        };
        let file = file.map_err(|e| {
            ServiceError::with_source(format!("cannot write {}", path.display()), e)
        })?;
        write_json(file, &path, &stored)
    }
}

/// The number after the highest `{id_prefix}-NNNN.json` already in the directory.
fn next_free_number(directory: &Path, id_prefix: &str) -> std::io::Result<usize> {
    let mut next = 1;
    for entry in fs::read_dir(directory)? {
        let entry = entry?;
        let file_name = entry.file_name();
        let number = file_name
            .to_str()
            .and_then(|n| n.strip_prefix(id_prefix))
            .and_then(|n| n.strip_prefix('-'))
            .and_then(|n| n.strip_suffix(".json"))
            .and_then(|n| n.parse::<usize>().ok());
        if let Some(number) = number {
            next = next.max(number + 1);
        }
    }
    Ok(next)
}

fn write_json<T: Serialize>(file: File, path: &Path, value: &T) -> Result<(), ServiceError> {
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, value).map_err(|e| {
        ServiceError::with_source(format!("cannot write {}", path.display()), e)
    })?;
    writer
        .flush()
        .map_err(|e| ServiceError::with_source(format!("cannot write {}", path.display()), e))
}

impl FormService for JsonFormStore {
    fn create_survey(&mut self, name: &str) -> Result<SurveyHandle, ServiceError> {
        // Other runs may have stored surveys with the same prefix.
        let next = next_free_number(&self.directory, &self.id_prefix).map_err(|e| {
            ServiceError::with_source(format!("cannot list {}", self.directory.display()), e)
        })?;
        self.forms.skip_to_number(next);
        let survey = self.forms.create_survey(name)?;
        self.persist(&survey, true)?;
        Ok(survey)
    }

    fn set_response_destination(
        &mut self,
        survey: &SurveyHandle,
        spreadsheet_id: &str,
    ) -> Result<(), ServiceError> {
        self.forms.set_response_destination(survey, spreadsheet_id)?;
        self.persist(survey, false)
    }

    fn enable_response_summary(
        &mut self,
        survey: &SurveyHandle,
        enabled: bool,
    ) -> Result<(), ServiceError> {
        self.forms.enable_response_summary(survey, enabled)?;
        self.persist(survey, false)
    }

    fn add_header_section(
        &mut self,
        survey: &SurveyHandle,
        title: &str,
    ) -> Result<(), ServiceError> {
        self.forms.add_header_section(survey, title)?;
        self.persist(survey, false)
    }

    fn add_checkbox_question(
        &mut self,
        survey: &SurveyHandle,
        caption: &str,
        choices: &[String],
    ) -> Result<QuestionHandle, ServiceError> {
        let question = self.forms.add_checkbox_question(survey, caption, choices)?;
        self.persist(survey, false)?;
        Ok(question)
    }

    fn published_url(&self, survey: &SurveyHandle) -> Result<String, ServiceError> {
        self.forms.published_url(survey)
    }

    fn edit_url(&self, survey: &SurveyHandle) -> Result<String, ServiceError> {
        self.forms.edit_url(survey)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::setup::io_common::tests::scratch_dir;
    use serde_json::Value as JSValue;

    fn read_json(path: &Path) -> JSValue {
        serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
    }

    #[test]
    fn every_change_is_written() {
        let tmp = scratch_dir("every_change_is_written");
        let dir = tmp.path();
        let mut store = JsonFormStore::open(&dir.join("out"), Some("https://forms.test/d/")).unwrap();

        let survey = store.create_survey("Survey Response Voting").unwrap();
        let path = store.survey_path(&survey);
        assert_eq!(read_json(&path)["survey"]["items"], serde_json::json!([]));

        store.add_header_section(&survey, "MySheet @ 3:00:00 PM").unwrap();
        store
            .add_checkbox_question(&survey, "A?", &["x".to_string()])
            .unwrap();
        let js = read_json(&path);
        assert_eq!(js["id"], JSValue::String(survey.0.clone()));
        assert_eq!(
            js["survey"]["items"],
            serde_json::json!([
                {"type": "sectionHeader", "title": "MySheet @ 3:00:00 PM"},
                {"type": "checkbox", "title": "A?", "choices": ["x"]}
            ])
        );
        assert_eq!(
            js["publishedUrl"],
            JSValue::String(format!("https://forms.test/d/{}/viewform", survey.0))
        );
    }

    #[test]
    fn stores_sharing_a_directory_keep_their_surveys() {
        let tmp = scratch_dir("stores_sharing_a_directory");
        let dir = tmp.path();
        let mut first = JsonFormStore::open(dir, None).unwrap();
        let mut second = JsonFormStore::open(dir, None).unwrap();
        let a = first.create_survey("first").unwrap();
        let b = second.create_survey("second").unwrap();
        assert_ne!(a, b);

        assert_eq!(fs::read_dir(dir).unwrap().count(), 2);
        assert_eq!(read_json(&first.survey_path(&a))["survey"]["name"], "first");
        assert_eq!(read_json(&second.survey_path(&b))["survey"]["name"], "second");
    }

    #[test]
    fn existing_files_are_not_replaced() {
        let tmp = scratch_dir("existing_files_are_not_replaced");
        let dir = tmp.path();
        let mut store = JsonFormStore::open(dir, None).unwrap();
        let a = store.create_survey("a").unwrap();
        let taken = store
            .survey_path(&a)
            .with_file_name(format!("{}2.json", a.0.trim_end_matches('1')));
        fs::write(&taken, "{}").unwrap();

        let c = store.create_survey("c").unwrap();
        assert!(c.0.ends_with("-0003"));
        assert_eq!(fs::read_to_string(&taken).unwrap(), "{}");
        // A file appearing between the listing and the first write.
        assert!(store.persist(&a, true).is_err());
        assert_eq!(read_json(&store.survey_path(&a))["survey"]["name"], "a");
    }

    #[test]
    fn next_number_follows_existing_files() {
        let tmp = scratch_dir("next_number_follows_existing_files");
        let dir = tmp.path();
        for name in ["p-0002.json", "p-0010.json", "q-0040.json", "p-x.json", "p-0099.txt"] {
            fs::write(dir.join(name), "{}").unwrap();
        }
        assert_eq!(next_free_number(dir, "p").unwrap(), 11);
        assert_eq!(next_free_number(dir, "r").unwrap(), 1);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn failed_flush_is_reported() {
        let full = Path::new("/dev/full");
        if !full.exists() {
            return;
        }
        let file = OpenOptions::new().write(true).open(full).unwrap();
        assert!(write_json(file, full, &serde_json::json!({"a": 1})).is_err());
    }

    #[test]
    fn default_base_url_is_the_directory() {
        let tmp = scratch_dir("default_base_url_is_the_directory");
        let dir = tmp.path();
        let mut store = JsonFormStore::open(dir, None).unwrap();
        let survey = store.create_survey("s").unwrap();
        let url = store.edit_url(&survey).unwrap();
        assert!(url.starts_with("file://"));
        assert!(url.ends_with(&format!("{}/edit", survey.0)));
    }
}
