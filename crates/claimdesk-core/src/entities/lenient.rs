//! Tolerant field decoders.
//!
//! The server is loosely typed: ids arrive as numbers or numeric strings and
//! text fields occasionally as numbers. A field that cannot be coerced
//! decodes as `None` instead of failing the whole record.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::entity::coerce_text;

/// Record identity: a string, or a number rendered as text.
pub(crate) fn uuid<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let value = Value::deserialize(deserializer)?;
    coerce_text(&value)
        .filter(|uuid| !uuid.is_empty())
        .ok_or_else(|| D::Error::custom(format!("uuid must be a string or number, got {value}")))
}

/// Optional text; scalars are rendered, arrays and objects become `None`.
pub(crate) fn text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(coerce_text(&value))
}

/// Optional integer; numeric strings are parsed, anything else is `None`.
pub(crate) fn integer<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i64>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(match &value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    struct Fields {
        #[serde(deserialize_with = "super::uuid")]
        uuid: String,
        #[serde(default, deserialize_with = "super::text")]
        name: Option<String>,
        #[serde(default, deserialize_with = "super::integer")]
        id: Option<i64>,
    }

    fn decode(value: serde_json::Value) -> Fields {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn numbers_and_strings_are_coerced() {
        let record = decode(json!({"uuid": 7, "name": 123, "id": "42"}));
        assert_eq!(record.uuid, "7");
        assert_eq!(record.name.as_deref(), Some("123"));
        assert_eq!(record.id, Some(42));
    }

    #[test]
    fn uncoercible_values_become_none() {
        let record = decode(json!({"uuid": "a", "name": {"first": "Ana"}, "id": "n/a"}));
        assert_eq!(record.name, None);
        assert_eq!(record.id, None);
    }

    #[test]
    fn missing_and_null_fields_are_none() {
        let record = decode(json!({"uuid": "a", "name": null}));
        assert_eq!(record.name, None);
        assert_eq!(record.id, None);
    }

    #[test]
    fn uuid_must_be_present() {
        assert!(serde_json::from_value::<Fields>(json!({"uuid": null})).is_err());
        assert!(serde_json::from_value::<Fields>(json!({"uuid": ""})).is_err());
    }
}
