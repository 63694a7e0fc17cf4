//! Fixed-shape `HH:MM:SS.mmm` rendering of millisecond counts.

mod error;

pub use error::ParseElapsedError;

const MS_PER_SECOND: u64 = 1_000;
const MS_PER_MINUTE: u64 = 60 * MS_PER_SECOND;
const MS_PER_HOUR: u64 = 60 * MS_PER_MINUTE;

/// Left-pad the decimal form of `value` with zeros to at least `width` digits.
///
/// Values that are already `width` digits or longer are returned in full.
pub fn pad_num(value: u64, width: usize) -> String {
    format!("{:0width$}", value, width = width)
}

/// Render a millisecond count as `HH:MM:SS.mmm`.
///
/// The hours field has no upper bound: `360_000_000` renders as
/// `"100:00:00.000"`.
pub fn format_elapsed(ms: u64) -> String {
    let millis = ms % 1000;
    let total_seconds = ms / 1000;
    let seconds = total_seconds % 60;
    let total_minutes = total_seconds / 60;
    let minutes = total_minutes % 60;
    let hours = total_minutes / 60;

    format!(
        "{}:{}:{}.{}",
        pad_num(hours, 2),
        pad_num(minutes, 2),
        pad_num(seconds, 2),
        pad_num(millis, 3)
    )
}

/// Parse a string produced by [`format_elapsed`] back into milliseconds.
///
/// Only the exact rendered shape is accepted: hours with at least two digits
/// and no extra leading zero, minutes and seconds with two digits below 60,
/// milliseconds with three digits.
///
/// # Errors
/// Returns [`ParseElapsedError`] describing the first field that is wrong.
pub fn parse_elapsed(text: &str) -> Result<u64, ParseElapsedError> {
    let fields: Vec<&str> = text.split(':').collect();
    let [hours, minutes, rest] = fields.as_slice() else {
        return Err(ParseElapsedError::Shape(text.to_string()));
    };
    let Some((seconds, millis)) = rest.split_once('.') else {
        return Err(ParseElapsedError::Shape(text.to_string()));
    };

    if hours.len() > 2 && hours.starts_with('0') {
        return Err(ParseElapsedError::Digits {
            field: "hours",
            value: hours.to_string(),
        });
    }
    let hours = parse_field("hours", hours, 2, usize::MAX)?;
    let minutes = parse_field("minutes", minutes, 2, 2)?;
    let seconds = parse_field("seconds", seconds, 2, 2)?;
    let millis = parse_field("milliseconds", millis, 3, 3)?;

    if minutes >= 60 {
        return Err(ParseElapsedError::OutOfRange {
            field: "minutes",
            value: minutes,
        });
    }
    if seconds >= 60 {
        return Err(ParseElapsedError::OutOfRange {
            field: "seconds",
            value: seconds,
        });
    }

    hours
        .checked_mul(MS_PER_HOUR)
        .and_then(|total| total.checked_add(minutes * MS_PER_MINUTE))
        .and_then(|total| total.checked_add(seconds * MS_PER_SECOND))
        .and_then(|total| total.checked_add(millis))
        .ok_or(ParseElapsedError::Overflow)
}

fn parse_field(
    field: &'static str,
    value: &str,
    min_len: usize,
    max_len: usize,
) -> Result<u64, ParseElapsedError> {
    let well_formed = value.len() >= min_len
        && value.len() <= max_len
        && value.bytes().all(|b| b.is_ascii_digit());
    if !well_formed {
        return Err(ParseElapsedError::Digits {
            field,
            value: value.to_string(),
        });
    }
    value.parse::<u64>().map_err(|_| ParseElapsedError::Overflow)
}
