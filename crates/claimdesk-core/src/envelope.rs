//! Response envelope normalization.
//!
//! The backend is inconsistent across entities: lists always come as
//! `{success, data, message?}`, single-record endpoints return either the
//! record or the same envelope, and delete returns `{success, message?}`.
//! These functions turn a decoded JSON body into a typed result so every
//! transport normalizes the same way.

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::warn;

use crate::Result;
use crate::error::ShapeError;

/// The `{success, data, message}` wrapper.
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default)]
    pub message: Option<String>,
}

impl Envelope {
    fn parse(body: Value) -> Result<Self> {
        if !body.is_object() {
            return Err(ShapeError::Unsuccessful { message: None }.into());
        }
        serde_json::from_value(body).map_err(|e| {
            ShapeError::Decode {
                message: e.to_string(),
            }
            .into()
        })
    }

    fn ensure_success(&self) -> Result<()> {
        if self.success == Some(true) {
            Ok(())
        } else {
            Err(ShapeError::Unsuccessful {
                message: self.message.clone(),
            }
            .into())
        }
    }
}

fn decode<T: DeserializeOwned>(value: Value) -> Result<T> {
    serde_json::from_value(value).map_err(|e| {
        ShapeError::Decode {
            message: e.to_string(),
        }
        .into()
    })
}

/// Decode list entries one by one, skipping those that do not decode.
pub fn decode_records<T: DeserializeOwned>(records: Vec<Value>) -> Vec<T> {
    records
        .into_iter()
        .enumerate()
        .filter_map(|(index, record)| match decode(record) {
            Ok(item) => Some(item),
            Err(err) => {
                warn!(index, error = %err, "Skipping undecodable record");
                None
            }
        })
        .collect()
}

/// Accept only `success == true` with an array `data`.
///
/// Entries that do not decode are skipped; the rest of the list is kept.
pub fn list_from_value<T: DeserializeOwned>(body: Value) -> Result<Vec<T>> {
    let envelope = Envelope::parse(body)?;
    envelope.ensure_success()?;

    match envelope.data {
        Some(Value::Array(items)) => Ok(decode_records(items)),
        Some(_) => Err(ShapeError::NotAnArray.into()),
        None => Err(ShapeError::MissingData.into()),
    }
}

/// Decode a single record, unwrapping `{success, data}` when `unwrap` is set.
pub fn record_from_value<T: DeserializeOwned>(body: Value, unwrap: bool) -> Result<T> {
    if !unwrap {
        if body.is_null() {
            return Err(ShapeError::MissingData.into());
        }
        return decode(body);
    }

    let envelope = Envelope::parse(body)?;
    envelope.ensure_success()?;

    match envelope.data {
        Some(Value::Null) | None => Err(ShapeError::MissingData.into()),
        Some(data) => decode(data),
    }
}

/// Delete completes only on `success == true`.
pub fn deletion_from_value(body: Value) -> Result<()> {
    Envelope::parse(body)?.ensure_success()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use serde_json::json;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Item {
        uuid: String,
    }

    #[test]
    fn list_accepts_successful_array() {
        let items: Vec<Item> =
            list_from_value(json!({"success": true, "data": [{"uuid": "a"}, {"uuid": "b"}]}))
                .unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[1].uuid, "b");
    }

    #[test]
    fn list_skips_undecodable_records() {
        let items: Vec<Item> = list_from_value(json!({
            "success": true,
            "data": [{"uuid": "a"}, {"name": "no uuid"}, "junk", {"uuid": "b"}]
        }))
        .unwrap();
        assert_eq!(items, vec![Item { uuid: "a".into() }, Item { uuid: "b".into() }]);
    }

    #[test]
    fn list_rejects_unsuccessful() {
        let err = list_from_value::<Item>(json!({"success": false})).unwrap_err();
        assert!(matches!(
            err,
            Error::Shape(ShapeError::Unsuccessful { message: None })
        ));
    }

    #[test]
    fn list_rejects_missing_success_flag() {
        let err = list_from_value::<Item>(json!({"data": []})).unwrap_err();
        assert!(err.is_shape());
    }

    #[test]
    fn list_rejects_non_array_data() {
        let err = list_from_value::<Item>(json!({"success": true, "data": {"uuid": "a"}}))
            .unwrap_err();
        assert!(matches!(err, Error::Shape(ShapeError::NotAnArray)));
    }

    #[test]
    fn list_rejects_bare_array() {
        let err = list_from_value::<Item>(json!([{"uuid": "a"}])).unwrap_err();
        assert!(err.is_shape());
    }

    #[test]
    fn record_direct() {
        let item: Item = record_from_value(json!({"uuid": "a"}), false).unwrap();
        assert_eq!(item, Item { uuid: "a".into() });
    }

    #[test]
    fn record_wrapped() {
        let item: Item =
            record_from_value(json!({"success": true, "data": {"uuid": "a"}}), true).unwrap();
        assert_eq!(item.uuid, "a");
    }

    #[test]
    fn record_wrapped_without_data() {
        let err = record_from_value::<Item>(json!({"success": true, "data": null}), true)
            .unwrap_err();
        assert!(matches!(err, Error::Shape(ShapeError::MissingData)));
    }

    #[test]
    fn record_wrapped_failure_keeps_message() {
        let err = record_from_value::<Item>(
            json!({"success": false, "message": "Scope sheet not found"}),
            true,
        )
        .unwrap_err();
        assert_eq!(err.user_message("fallback"), "Scope sheet not found");
    }

    #[test]
    fn deletion_requires_success() {
        assert!(deletion_from_value(json!({"success": true, "message": "Deleted"})).is_ok());
        assert!(deletion_from_value(json!({"success": false})).is_err());
        assert!(deletion_from_value(json!({})).is_err());
    }
}
