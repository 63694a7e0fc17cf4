use std::fmt::{Display, Formatter};

use stopwatch_lib::ParseElapsedError;

/// Error type for everything the CLI can fail at.
#[derive(Debug)]
pub enum CliError {
    Io(std::io::Error),
    Json(serde_json::Error),
    Parse(ParseElapsedError),
    InvalidArgument(String),
}

impl Display for CliError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "io error: {}", err),
            Self::Json(err) => write!(f, "json error: {}", err),
            Self::Parse(err) => write!(f, "parse error: {}", err),
            Self::InvalidArgument(err) => write!(f, "invalid argument: {}", err),
        }
    }
}

impl std::error::Error for CliError {}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

impl From<ParseElapsedError> for CliError {
    fn from(value: ParseElapsedError) -> Self {
        Self::Parse(value)
    }
}
