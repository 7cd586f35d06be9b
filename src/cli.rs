use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(
    name = "nikud-regress",
    version,
    about = "Regression harnesses for Hebrew vowelization and search-index quality"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    Index(IndexArgs),
    Search(SearchArgs),
    Api(ApiArgs),
    Sample(SampleArgs),
}

#[derive(Args, Debug, Clone)]
pub struct IndexArgs {
    /// JSON-lines corpus: one {"doc_id", "doc_type", "text"} object per line
    pub corpus_path: PathBuf,

    #[arg(long, default_value = "nikud_index.sqlite")]
    pub index_path: PathBuf,

    #[arg(long, default_value_t = false)]
    pub replace: bool,
}

#[derive(Args, Debug, Clone)]
pub struct SearchArgs {
    /// csv file with the queries and their expected results
    pub input_path: PathBuf,

    /// file to write the query report into
    pub report_path: PathBuf,

    #[arg(long, default_value = "nikud_index.sqlite")]
    pub index_path: PathBuf,

    #[arg(long, default_value = "doc_id")]
    pub key_field: String,

    /// treat the first line of the input as data rather than a header
    #[arg(long, default_value_t = false)]
    pub no_header: bool,

    #[arg(long, default_value_t = 0.3)]
    pub precision_weight: f64,

    #[arg(long, default_value_t = 0.4)]
    pub recall_weight: f64,

    #[arg(long, default_value_t = 0.1)]
    pub order_weight: f64,

    #[arg(long, default_value_t = 0.3)]
    pub negatives_weight: f64,

    #[arg(long)]
    pub summary_path: Option<PathBuf>,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum ScoringMode {
    Exact,
    Words,
    WordsChars,
}

impl ScoringMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Exact => "exact",
            Self::Words => "words",
            Self::WordsChars => "words-chars",
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct ApiArgs {
    /// csv file with the submissions and their expected results
    pub input_path: PathBuf,

    /// file to write the submission report into
    pub report_path: PathBuf,

    /// command that reads {"data": <text>} on stdin and prints the
    /// vowelizer's JSON token list on stdout
    #[arg(long)]
    pub vowelizer_cmd: String,

    #[arg(long, value_enum, default_value_t = ScoringMode::Words)]
    pub mode: ScoringMode,

    /// treat the first line of the input as data rather than a header
    #[arg(long, default_value_t = false)]
    pub no_header: bool,

    #[arg(long)]
    pub summary_path: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct SampleArgs {
    /// utf-8 encoded vowelized source text
    pub input_path: PathBuf,

    /// csv file to generate the regression sample into
    pub output_path: PathBuf,

    #[arg(long, default_value_t = 140)]
    pub block_size: usize,
}
