//! Serde helpers for the backend's loosely-typed wire format.
//!
//! The backend stores several fields as free-form strings: enumerated values
//! may be absent, empty, or outside the current vocabulary (old imports), and
//! validity dates appear in more than one format. Deserialization is lenient
//! (anything unparseable becomes `None`); serialization always emits the
//! canonical form.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Deserialize an optional enumerated value, mapping null, empty strings, and
/// out-of-vocabulary values to `None`.
pub fn lenient_enum_opt<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: serde::de::DeserializeOwned,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(match raw {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) if s.trim().is_empty() => None,
        Some(v) => serde_json::from_value(v).ok(),
    })
}

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

pub fn parse_wire_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
        .or_else(|| {
            // Datetime-formatted values carry a time component the date
            // formats above reject; strip it.
            chrono::NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f")
                .ok()
                .map(|dt| dt.date())
        })
}

/// `Option<NaiveDate>` serialized as "YYYY-MM-DD"; deserialized leniently.
pub mod lenient_date {
    use super::*;
    use serde::Serializer;

    pub fn serialize<S>(value: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(date) => serializer.serialize_str(&date.format("%Y-%m-%d").to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.as_deref().and_then(parse_wire_date))
    }
}
