use std::fmt::{Display, Formatter};

/// Error type for parsing `HH:MM:SS.mmm` strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseElapsedError {
    /// The text is not shaped like `HH:MM:SS.mmm`.
    Shape(String),
    /// A field has the wrong number of digits or a non-digit character.
    Digits { field: &'static str, value: String },
    /// Minutes or seconds are 60 or above.
    OutOfRange { field: &'static str, value: u64 },
    /// The total does not fit in a `u64` millisecond count.
    Overflow,
}

impl Display for ParseElapsedError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Shape(text) => write!(f, "expected HH:MM:SS.mmm, got {:?}", text),
            Self::Digits { field, value } => write!(f, "invalid {} field: {:?}", field, value),
            Self::OutOfRange { field, value } => {
                write!(f, "{} field out of range: {}", field, value)
            }
            Self::Overflow => write!(f, "elapsed time overflows a millisecond count"),
        }
    }
}

impl std::error::Error for ParseElapsedError {}
