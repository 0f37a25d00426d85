use clap::Parser;

/// Creates a survey to vote on the comments found in a form responses spreadsheet.
#[derive(Parser, Debug, Clone, Default)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path, optional) A JSON configuration file. The other options override what it contains.
    /// For more information about the file format, read the documentation of the `manual` module.
    #[clap(short, long, value_parser)]
    pub config: Option<String>,

    /// (file path) The spreadsheet with the form responses. Setting this option overrides the path
    /// that may be specified with the --config option.
    #[clap(short, long, value_parser)]
    pub input: Option<String>,

    /// (xlsx or csv) The type of the input. By default, it is deduced from the extension of the file.
    #[clap(long, value_parser)]
    pub input_type: Option<String>,

    /// (default 'Form Responses 1') The name of the sheet holding the responses.
    #[clap(long, value_parser)]
    pub sheet_name: Option<String>,

    /// (default D) The column of the comments for the first question, as letters (D) or
    /// as a zero-based index (3).
    #[clap(long, value_parser, allow_hyphen_values = true)]
    pub column_a: Option<String>,

    /// (default E) The column of the comments for the second question, as letters (E) or
    /// as a zero-based index (4).
    #[clap(long, value_parser, allow_hyphen_values = true)]
    pub column_b: Option<String>,

    /// (directory path) Where the created surveys are stored. Defaults to 'surveys'.
    #[clap(short, long, value_parser)]
    pub out_dir: Option<String>,

    /// The prefix of the URLs of the stored surveys. Defaults to the file URL of the output directory.
    #[clap(long, value_parser)]
    pub base_url: Option<String>,

    /// The time shown in the header of the survey. Defaults to the current local time.
    #[clap(long, value_parser)]
    pub timestamp_label: Option<String>,

    /// If passed as an argument, a comment column without any row yields a question without choices
    /// instead of an error.
    #[clap(long, takes_value = false)]
    pub allow_empty_columns: bool,

    /// If passed as an argument, the survey is printed to the standard output instead of being stored.
    #[clap(long, takes_value = false)]
    pub dry_run: bool,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
