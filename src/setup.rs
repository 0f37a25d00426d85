use log::{debug, info};

use comment_survey::memory::{MemoryForms, MemorySpreadsheet};
use comment_survey::*;
use snafu::{prelude::*, Snafu};

use std::path::{Path, PathBuf};

use crate::args::Args;
use crate::setup::config_reader::*;
use crate::setup::form_store::JsonFormStore;

mod config_reader;
mod form_store;
mod io_common;
mod io_csv;
mod io_xlsx;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum SetupError {
    #[snafu(display("Error opening file {path}"))]
    OpeningExcel {
        source: calamine::XlsxError,
        path: String,
    },
    #[snafu(display("Error reading worksheet {sheet_name} in {path}"))]
    ReadingWorksheet {
        source: calamine::XlsxError,
        path: String,
        sheet_name: String,
    },
    #[snafu(display("Error opening file {path}"))]
    CsvOpen { source: csv::Error, path: String },
    #[snafu(display("Error reading line {lineno} of {path}"))]
    CsvLineParse {
        source: csv::Error,
        path: String,
        lineno: usize,
    },
    #[snafu(display("Error opening file {path}"))]
    OpeningJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing configuration file {path}"))]
    ParsingJson {
        source: serde_json::Error,
        path: String,
    },
    #[snafu(display("Invalid column {column:?}: expected letters (D) or a zero-based index (3)"))]
    InvalidColumn { column: String },
    #[snafu(display("Unknown input type {input_type:?}: expected xlsx or csv"))]
    UnknownInputType { input_type: String },
    #[snafu(display("No input file: use --input or the filePath option of the configuration"))]
    MissingInput {},
    #[snafu(display("Cannot create the output directory {path}"))]
    CreatingOutputDir {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error encoding the survey"))]
    EncodingSurvey { source: serde_json::Error },
    #[snafu(display("Cannot set up the survey"))]
    SettingUp { source: SurveyError },
}

pub type SetupResult<T> = Result<T, SetupError>;

#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum InputType {
    Xlsx,
    Csv,
}

impl InputType {
    fn parse(input_type: &str) -> SetupResult<InputType> {
        match input_type.to_lowercase().as_str() {
            "xlsx" | "excel" => Ok(InputType::Xlsx),
            "csv" => Ok(InputType::Csv),
            _ => UnknownInputTypeSnafu { input_type }.fail(),
        }
    }

    fn from_path(path: &Path) -> SetupResult<InputType> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default();
        InputType::parse(ext)
    }
}

/// The options of a run, once the configuration file and the command line are merged.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Settings {
    pub input_path: PathBuf,
    pub input_type: InputType,
    pub survey: SurveyConfig,
    pub out_dir: PathBuf,
    pub base_url: Option<String>,
    pub timestamp_label: Option<String>,
    pub dry_run: bool,
}

pub const DEFAULT_OUT_DIR: &str = "surveys";

pub fn resolve_settings(args: &Args) -> SetupResult<Settings> {
    // Relative paths of the configuration file are relative to its location.
    let (config, root) = match &args.config {
        Some(config_path) => {
            let root = Path::new(config_path)
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_default();
            (read_config(config_path)?, root)
        }
        None => (ResurveyConfig::default(), PathBuf::new()),
    };
    debug!("resolve_settings: config: {:?}", config);

    let input_path = match (&args.input, &config.source.file_path) {
        (Some(p), _) => PathBuf::from(p),
        (None, Some(p)) => root.join(p),
        (None, None) => return MissingInputSnafu {}.fail(),
    };
    let input_type = match args.input_type.as_ref().or(config.source.provider.as_ref()) {
        Some(t) => InputType::parse(t)?,
        None => InputType::from_path(&input_path)?,
    };

    let mut survey = SurveyConfig::default();
    if let Some(s) = args.sheet_name.as_ref().or(config.source.sheet_name.as_ref()) {
        survey.sheet_name = s.clone();
    }
    survey.column_a = match &args.column_a {
        Some(c) => parse_column(c)?,
        None => config.source.column_a()?.unwrap_or(survey.column_a),
    };
    survey.column_b = match &args.column_b {
        Some(c) => parse_column(c)?,
        None => config.source.column_b()?.unwrap_or(survey.column_b),
    };
    if let Some(s) = &config.survey.form_name {
        survey.form_name = s.clone();
    }
    if let Some(s) = &config.survey.question_a {
        survey.question_a = s.clone();
    }
    if let Some(s) = &config.survey.question_b {
        survey.question_b = s.clone();
    }
    if let Some(b) = config.survey.publishing_summary {
        survey.publishing_summary = b;
    }
    if args.allow_empty_columns {
        survey.empty_columns = EmptyColumnPolicy::Allow;
    } else if let Some(policy) = config.survey.empty_columns {
        survey.empty_columns = policy;
    }

    let out_dir = match (&args.out_dir, &config.output.directory) {
        (Some(p), _) => PathBuf::from(p),
        (None, Some(p)) => root.join(p),
        (None, None) => PathBuf::from(DEFAULT_OUT_DIR),
    };

    Ok(Settings {
        input_path,
        input_type,
        survey,
        out_dir,
        base_url: args.base_url.clone().or(config.output.base_url),
        timestamp_label: args.timestamp_label.clone(),
        dry_run: args.dry_run,
    })
}

fn read_spreadsheet(path: &Path, input_type: InputType) -> SetupResult<MemorySpreadsheet> {
    info!("Attempting to read {:?} file {:?}", input_type, path);
    match input_type {
        InputType::Xlsx => io_xlsx::read_xlsx_spreadsheet(path),
        InputType::Csv => io_csv::read_csv_spreadsheet(path),
    }
}

/// The local time, formatted as `3:00:00 PM`.
pub fn current_time_label() -> String {
    chrono::Local::now().format("%-I:%M:%S %p").to_string()
}

/// Runs the whole setup: reads the responses and creates the voting survey.
///
/// With `dry_run`, the survey is kept in memory and printed on the standard output.
pub fn run_setup(settings: &Settings) -> SetupResult<SurveyResult> {
    let spreadsheet = read_spreadsheet(&settings.input_path, settings.input_type)?;
    debug!("run_setup: sheets: {:?}", spreadsheet.sheet_names());
    let timestamp_label = settings
        .timestamp_label
        .clone()
        .unwrap_or_else(current_time_label);

    if settings.dry_run {
        let mut forms = MemoryForms::new();
        let res = set_up_survey(&spreadsheet, &mut forms, &settings.survey, &timestamp_label)
            .context(SettingUpSnafu {})?;
        for (_, doc) in forms.surveys() {
            let pretty = serde_json::to_string_pretty(doc).context(EncodingSurveySnafu {})?;
            println!("{}", pretty);
        }
        Ok(res)
    } else {
        let mut forms = JsonFormStore::open(&settings.out_dir, settings.base_url.as_deref())?;
        set_up_survey(&spreadsheet, &mut forms, &settings.survey, &timestamp_label)
            .context(SettingUpSnafu {})
    }
}
