use std::path::PathBuf;

use thiserror::Error;

/// Core failure taxonomy shared by the harnesses. Everything else is
/// contextualized `anyhow` at the command layer.
#[derive(Debug, Error)]
pub enum HarnessError {
    #[error(
        "line {line} in file '{}' is too short (must have at least {expected} fields, found {found})",
        file.display()
    )]
    MalformedRecord {
        file: PathBuf,
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("query '{query}' was not accompanied by positive or negative expected results")]
    MissingExpectations { query: String },

    #[error("no expected results given for submission '{submission}'")]
    MissingSubmissionExpectations { submission: String },
}
