use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime};

const MILLIS_PER_DAY: i64 = 86_400_000;

/// Calendar-day addition. `None` when the result leaves the supported
/// calendar range.
pub fn add_days(date: NaiveDate, days: i64) -> Option<NaiveDate> {
    Duration::try_days(days).and_then(|delta| date.checked_add_signed(delta))
}

/// Signed whole-day difference `to - from`.
pub fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    (to - from).num_days()
}

/// Signed day difference between two instants, rounding partial days up
/// (toward the later date).
pub fn days_between_instants(from: NaiveDateTime, to: NaiveDateTime) -> i64 {
    let ms = (to - from).num_milliseconds();
    let days = ms / MILLIS_PER_DAY;
    if ms % MILLIS_PER_DAY > 0 {
        days + 1
    } else {
        days
    }
}

pub fn truncate_to_day(instant: NaiveDateTime) -> NaiveDate {
    instant.date()
}

/// Parse a stored date, discarding any time-of-day component.
///
/// Accepts `2024-05-01`, `2024-05-01T08:30:00`, `2024-05-01 08:30:00` and
/// RFC 3339 datetimes such as `2024-05-01T08:30:00.000Z`. The calendar date
/// is taken as written, without timezone conversion.
pub fn parse_day(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(d);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_local().date());
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(truncate_to_day)
}

/// Serde adapter for optional day-granularity dates.
///
/// Unparseable values read as `None`; output is always `YYYY-MM-DD`.
pub mod day {
    use super::parse_day;
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};
    use serde_json::Value;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(match value {
            Some(Value::String(s)) => parse_day(&s),
            _ => None,
        })
    }

    pub fn serialize<S>(value: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(d) => serializer.serialize_str(&d.format("%Y-%m-%d").to_string()),
            None => serializer.serialize_none(),
        }
    }
}
