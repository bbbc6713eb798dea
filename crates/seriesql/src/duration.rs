//! Duration literal parsing and formatting.
//!
//! Durations are a decimal integer with an optional unit suffix; a
//! missing suffix means microseconds. Formatting picks the largest unit
//! that divides the value evenly, falling back to a bare microsecond
//! count.

use std::time::Duration;

use thiserror::Error;

const MICROSECOND: u64 = 1;
const MILLISECOND: u64 = 1_000 * MICROSECOND;
const SECOND: u64 = 1_000 * MILLISECOND;
const MINUTE: u64 = 60 * SECOND;
const HOUR: u64 = 60 * MINUTE;
const DAY: u64 = 24 * HOUR;
const WEEK: u64 = 7 * DAY;

/// The error returned when a duration string cannot be parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("invalid duration")]
pub struct DurationError;

/// Parses a duration string such as `10h` or `15ms`.
///
/// The grammar is a decimal integer followed by an optional unit:
/// `u`/`µ` (microseconds), `ms`, `s`, `m`, `h`, `d`, or `w`. A missing
/// unit means microseconds. Fractional values are rejected.
///
/// # Errors
///
/// Returns [`DurationError`] for empty input, a missing integer part,
/// a fractional value, or an unknown unit.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use seriesql::parse_duration;
///
/// assert_eq!(parse_duration("10h").unwrap(), Duration::from_secs(36_000));
/// assert_eq!(parse_duration("3").unwrap(), Duration::from_micros(3));
/// assert!(parse_duration("1.2w").is_err());
/// ```
pub fn parse_duration(s: &str) -> Result<Duration, DurationError> {
    let digits_end = s
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map_or(s.len(), |(i, _)| i);
    let (digits, unit) = s.split_at(digits_end);
    if digits.is_empty() {
        return Err(DurationError);
    }

    let value: u64 = digits.parse().map_err(|_| DurationError)?;
    let scale = match unit {
        "" | "u" | "µ" => MICROSECOND,
        "ms" => MILLISECOND,
        "s" => SECOND,
        "m" => MINUTE,
        "h" => HOUR,
        "d" => DAY,
        "w" => WEEK,
        _ => return Err(DurationError),
    };

    let micros = value.checked_mul(scale).ok_or(DurationError)?;
    Ok(Duration::from_micros(micros))
}

/// Formats a duration with the largest unit that divides it evenly,
/// preferring weeks down to milliseconds; anything smaller renders as a
/// bare microsecond count.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use seriesql::format_duration;
///
/// assert_eq!(format_duration(Duration::from_secs(7200)), "2h");
/// assert_eq!(format_duration(Duration::from_micros(1001)), "1001");
/// ```
#[must_use]
pub fn format_duration(d: Duration) -> String {
    let micros = d.as_micros();
    if micros == 0 {
        return String::from("0");
    }
    for (unit, suffix) in [
        (u128::from(WEEK), "w"),
        (u128::from(DAY), "d"),
        (u128::from(HOUR), "h"),
        (u128::from(MINUTE), "m"),
        (u128::from(SECOND), "s"),
        (u128::from(MILLISECOND), "ms"),
    ] {
        if micros % unit == 0 {
            return format!("{}{}", micros / unit, suffix);
        }
    }
    micros.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_duration() {
        let cases = [
            ("3", 3 * MICROSECOND),
            ("1000", 1000 * MICROSECOND),
            ("10u", 10 * MICROSECOND),
            ("10µ", 10 * MICROSECOND),
            ("15ms", 15 * MILLISECOND),
            ("100s", 100 * SECOND),
            ("2m", 2 * MINUTE),
            ("2h", 2 * HOUR),
            ("2d", 2 * DAY),
            ("2w", 2 * WEEK),
        ];
        for (input, micros) in cases {
            assert_eq!(
                parse_duration(input),
                Ok(Duration::from_micros(micros)),
                "{input}"
            );
        }
    }

    #[test]
    fn test_parse_duration_invalid() {
        for input in ["", "w", "1.2w", "10x", "ms"] {
            assert_eq!(parse_duration(input), Err(DurationError), "{input}");
        }
    }

    #[test]
    fn test_format_duration() {
        let cases = [
            (3 * MICROSECOND, "3"),
            (1001 * MICROSECOND, "1001"),
            (15 * MILLISECOND, "15ms"),
            (100 * SECOND, "100s"),
            (2 * MINUTE, "2m"),
            (2 * HOUR, "2h"),
            (2 * DAY, "2d"),
            (2 * WEEK, "2w"),
        ];
        for (micros, expected) in cases {
            assert_eq!(format_duration(Duration::from_micros(micros)), expected);
        }
    }

    #[test]
    fn test_round_trip() {
        for s in ["3", "1001", "15ms", "100s", "2m", "2h", "2d", "2w"] {
            let d = parse_duration(s).unwrap();
            assert_eq!(format_duration(d), s);
        }
    }
}
