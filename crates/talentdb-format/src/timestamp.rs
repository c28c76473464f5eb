use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::warn;

/// Magnitudes at or above this are epoch milliseconds, below it epoch seconds.
pub const MILLIS_THRESHOLD: f64 = 1e12;

pub const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Render a stored creation timestamp as UTC `YYYY-MM-DD HH:MM:SS`.
///
/// Null yields `None` quietly; anything that cannot be read as an in-range
/// epoch value yields `None` with a warning.
pub fn render_created_at(value: &Value) -> Option<String> {
    if value.is_null() {
        return None;
    }
    let Some(raw) = value.as_f64() else {
        warn!(%value, "created_at is not numeric");
        return None;
    };
    match to_datetime(raw) {
        Some(dt) => Some(dt.format(DISPLAY_FORMAT).to_string()),
        None => {
            warn!(created_at = raw, "created_at out of range");
            None
        }
    }
}

#[allow(clippy::cast_possible_truncation)]
fn to_datetime(raw: f64) -> Option<DateTime<Utc>> {
    if !raw.is_finite() || raw.abs() >= i64::MAX as f64 {
        return None;
    }
    if raw.abs() < MILLIS_THRESHOLD {
        DateTime::from_timestamp(raw.floor() as i64, 0)
    } else {
        DateTime::from_timestamp_millis(raw.floor() as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn seconds_below_threshold() {
        assert_eq!(render_created_at(&json!(1_700_000_000)).as_deref(), Some("2023-11-14 22:13:20"));
        assert_eq!(render_created_at(&json!(1_700_000_000.75)).as_deref(), Some("2023-11-14 22:13:20"));
    }

    #[test]
    fn milliseconds_at_or_above_threshold() {
        assert_eq!(render_created_at(&json!(1_700_000_000_123_i64)).as_deref(), Some("2023-11-14 22:13:20"));
        assert_eq!(render_created_at(&json!(1_000_000_000_000_i64)).as_deref(), Some("2001-09-09 01:46:40"));
    }

    #[test]
    fn unreadable_values_become_none() {
        assert_eq!(render_created_at(&Value::Null), None);
        assert_eq!(render_created_at(&json!("yesterday")), None);
        assert_eq!(render_created_at(&json!(true)), None);
        assert_eq!(render_created_at(&json!(1e300)), None);
    }
}
