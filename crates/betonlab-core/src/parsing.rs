use rust_decimal::Decimal;
use std::str::FromStr;

/// Parse a numeric value typed by an operator into a measurement.
///
/// Handles formats like:
/// - "600" -> Some(600)
/// - "12.5" -> Some(12.5)
/// - "12,5" -> Some(12.5) (French decimal comma)
/// - "1.2e3" -> Some(1200)
/// - "", "-", "—", "n.a." -> None
///
/// Anything that does not parse is treated as unset rather than an error.
pub fn parse_measurement(s: &str) -> Option<Decimal> {
    let s = s.trim();

    if s.is_empty() || s == "-" || s == "—" || s.eq_ignore_ascii_case("n.a.") {
        return None;
    }

    let normalized = s.replace(',', ".");
    Decimal::from_str(&normalized)
        .or_else(|_| Decimal::from_scientific(&normalized))
        .ok()
}

/// Serde adapter for optional numeric fields.
///
/// Reads a JSON number, a numeric string or anything else (which becomes
/// `None`). Writes a JSON number when the value survives the trip through
/// `f64` unchanged, and the exact decimal text otherwise, so a stored value
/// always reads back equal to what was written.
pub mod lenient {
    use super::parse_measurement;
    use rust_decimal::prelude::ToPrimitive;
    use rust_decimal::Decimal;
    use serde::{Deserialize, Deserializer, Serializer};
    use serde_json::Value;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(match value {
            Some(Value::Number(n)) => parse_measurement(&n.to_string()),
            Some(Value::String(s)) => parse_measurement(&s),
            _ => None,
        })
    }

    pub fn serialize<S>(value: &Option<Decimal>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let Some(d) = value else {
            return serializer.serialize_none();
        };
        match d.to_f64().filter(|f| parse_measurement(&f.to_string()) == Some(*d)) {
            Some(f) => serializer.serialize_f64(f),
            None => serializer.serialize_str(&d.to_string()),
        }
    }
}

/// Serde adapter for optional whole numbers such as ages.
///
/// `28`, `28.0` and `"28"` all read as 28; negative, fractional or
/// malformed values read as `None`.
pub mod lenient_u32 {
    use rust_decimal::prelude::ToPrimitive;
    use serde::{Deserializer, Serializer};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = super::lenient::deserialize(deserializer)?;
        Ok(value
            .filter(|d| d.fract().is_zero())
            .and_then(|d| d.to_u32()))
    }

    /// Same as [`deserialize`] with `0` for anything unusable.
    pub fn deserialize_or_default<'de, D>(deserializer: D) -> Result<u32, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(deserialize(deserializer)?.unwrap_or_default())
    }

    pub fn serialize<S>(value: &Option<u32>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(n) => serializer.serialize_u32(*n),
            None => serializer.serialize_none(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_integer() {
        assert_eq!(parse_measurement("600"), Some(dec!(600)));
    }

    #[test]
    fn test_decimal_point() {
        assert_eq!(parse_measurement("12.5"), Some(dec!(12.5)));
    }

    #[test]
    fn test_french_comma() {
        assert_eq!(parse_measurement("12,5"), Some(dec!(12.5)));
    }

    #[test]
    fn test_whitespace_trimming() {
        assert_eq!(parse_measurement("  8100  "), Some(dec!(8100)));
    }

    #[test]
    fn test_scientific() {
        assert_eq!(parse_measurement("1.2e3"), Some(dec!(1200)));
    }

    #[test]
    fn test_placeholders_are_absent() {
        assert_eq!(parse_measurement(""), None);
        assert_eq!(parse_measurement("-"), None);
        assert_eq!(parse_measurement("n.a."), None);
    }

    #[test]
    fn test_garbage_is_absent_not_error() {
        assert_eq!(parse_measurement("abc"), None);
        assert_eq!(parse_measurement("12kN"), None);
    }

    #[test]
    fn test_zero_is_a_value() {
        assert_eq!(parse_measurement("0"), Some(Decimal::ZERO));
    }

    #[derive(serde::Deserialize, serde::Serialize)]
    struct Row {
        #[serde(default, with = "lenient", skip_serializing_if = "Option::is_none")]
        force: Option<Decimal>,
    }

    #[test]
    fn test_lenient_field_accepts_number_and_string() {
        let a: Row = serde_json::from_str(r#"{"force": 600}"#).unwrap();
        let b: Row = serde_json::from_str(r#"{"force": "600"}"#).unwrap();
        assert_eq!(a.force, Some(dec!(600)));
        assert_eq!(b.force, Some(dec!(600)));
    }

    #[test]
    fn test_lenient_field_malformed_is_absent() {
        let row: Row = serde_json::from_str(r#"{"force": "broken"}"#).unwrap();
        assert!(row.force.is_none());
        let row: Row = serde_json::from_str(r#"{"force": null}"#).unwrap();
        assert!(row.force.is_none());
        let row: Row = serde_json::from_str(r#"{"force": [1, 2]}"#).unwrap();
        assert!(row.force.is_none());
        let row: Row = serde_json::from_str("{}").unwrap();
        assert!(row.force.is_none());
    }

    #[test]
    fn test_lenient_field_writes_number() {
        let row = Row {
            force: Some(dec!(612.5)),
        };
        assert_eq!(serde_json::to_string(&row).unwrap(), r#"{"force":612.5}"#);
    }

    #[test]
    fn test_lenient_field_keeps_full_precision() {
        let stress = dec!(600000) / dec!(22500);
        let row = Row {
            force: Some(stress),
        };
        let json = serde_json::to_string(&row).unwrap();
        let back: Row = serde_json::from_str(&json).unwrap();
        assert_eq!(back.force, Some(stress));
    }

    #[derive(serde::Deserialize)]
    struct Aged {
        #[serde(default, with = "lenient_u32")]
        age: Option<u32>,
    }

    #[test]
    fn test_lenient_u32() {
        let read = |json: &str| serde_json::from_str::<Aged>(json).unwrap().age;
        assert_eq!(read(r#"{"age": 28}"#), Some(28));
        assert_eq!(read(r#"{"age": "28"}"#), Some(28));
        assert_eq!(read(r#"{"age": 28.0}"#), Some(28));
        assert_eq!(read(r#"{"age": null}"#), None);
        assert_eq!(read(r#"{"age": -7}"#), None);
        assert_eq!(read(r#"{"age": 7.5}"#), None);
        assert_eq!(read(r#"{"age": "four weeks"}"#), None);
        assert_eq!(read("{}"), None);
    }
}
