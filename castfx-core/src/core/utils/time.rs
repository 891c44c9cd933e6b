use serde::{Deserialize, Deserializer};
use std::time::Duration;

const SECONDS_PER_MINUTE: u64 = 60;
const SECONDS_PER_HOUR: u64 = 60 * SECONDS_PER_MINUTE;

/// Formats the given playback position, in seconds, into a time text.
///
/// Positions below one hour are formatted as `MM:SS`, longer positions as `HH:MM:SS`.
/// Every component is floored and rendered with exactly two digits.
/// Negative or NaN positions are formatted as `00:00`.
///
/// # Arguments
///
/// * `seconds` - The playback position in seconds.
///
/// # Returns
///
/// It returns the formatted time text.
pub fn format_duration(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds.floor() as u64
    } else {
        0
    };
    let hours = total / SECONDS_PER_HOUR;
    let minutes = (total / SECONDS_PER_MINUTE) % 60;
    let seconds = total % SECONDS_PER_MINUTE;

    if hours == 0 {
        format!("{}:{}", two_digits(minutes), two_digits(seconds))
    } else {
        format!(
            "{}:{}:{}",
            two_digits(hours),
            two_digits(minutes),
            two_digits(seconds)
        )
    }
}

/// Calculate the progress percentage of the given position within the given duration.
///
/// It returns [None] when either value is not a number, else the percentage clamped between `0` and `100`.
pub fn progress_percentage(current_time: f64, duration: f64) -> Option<f64> {
    if current_time.is_nan() || duration.is_nan() {
        return None;
    }
    if duration <= 0.0 || duration.is_infinite() {
        return Some(0.0);
    }

    Some((100.0 * (current_time / duration)).clamp(0.0, 100.0))
}

/// Deserialize a millisecond value into a [Duration].
pub fn deserialize_millis<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    u64::deserialize(deserializer).map(Duration::from_millis)
}

/// Deserialize an optional millisecond value into a [Duration].
/// An explicit `null` value results in [None].
pub fn deserialize_optional_millis<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<u64>::deserialize(deserializer).map(|e| e.map(Duration::from_millis))
}

fn two_digits(value: u64) -> String {
    format!("{:02}", value % 100)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration() {
        assert_eq!("00:00", format_duration(0.0));
        assert_eq!("00:09", format_duration(9.87));
        assert_eq!("02:05", format_duration(125.0));
        assert_eq!("59:59", format_duration(3599.9));
        assert_eq!("01:20:45", format_duration(4845.0));
    }

    #[test]
    fn test_format_duration_invalid_value() {
        assert_eq!("00:00", format_duration(-12.0));
        assert_eq!("00:00", format_duration(f64::NAN));
    }

    #[test]
    fn test_progress_percentage() {
        assert_eq!(Some(25.0), progress_percentage(15.0, 60.0));
        assert_eq!(Some(100.0), progress_percentage(61.0, 60.0));
        assert_eq!(Some(0.0), progress_percentage(10.0, 0.0));
        assert_eq!(Some(0.0), progress_percentage(10.0, f64::INFINITY));
    }

    #[test]
    fn test_progress_percentage_nan() {
        assert_eq!(None, progress_percentage(f64::NAN, 60.0));
        assert_eq!(None, progress_percentage(12.0, f64::NAN));
    }
}
