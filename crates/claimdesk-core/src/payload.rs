//! Create/update request payloads.

use std::fmt;
use std::path::Path;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::Result;
use crate::error::{InvalidInputError, TransportError};

/// Multipart key used for scope-sheet presentation photos.
pub const PHOTO_FIELD: &str = "photo_path[]";

/// A file sent alongside a multipart payload.
#[derive(Clone)]
pub struct Attachment {
    /// Form key, e.g. `photo_path[]`.
    pub field: String,
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl Attachment {
    pub fn new(field: impl Into<String>, file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            field: field.into(),
            file_name: file_name.into(),
            content_type: None,
            bytes,
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Read an attachment from disk, using the file name as the part name.
    pub fn from_path(field: impl Into<String>, path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(TransportError::from)?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| InvalidInputError::Other {
                message: format!("attachment path has no file name: {}", path.display()),
            })?
            .to_string();
        Ok(Self::new(field, file_name, bytes))
    }
}

impl fmt::Debug for Attachment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Attachment")
            .field("field", &self.field)
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Field map plus attachments for a create or update call.
#[derive(Debug, Clone, Default)]
pub struct Payload {
    fields: Map<String, Value>,
    attachments: Vec<Attachment>,
}

impl Payload {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a JSON object.
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(fields) => Ok(Self {
                fields,
                attachments: Vec::new(),
            }),
            _ => Err(InvalidInputError::PayloadNotObject.into()),
        }
    }

    /// Build from any serializable struct that maps to a JSON object.
    pub fn from_serialize<S: Serialize>(data: &S) -> Result<Self> {
        let value = serde_json::to_value(data).map_err(|e| InvalidInputError::Other {
            message: e.to_string(),
        })?;
        Self::from_value(value)
    }

    pub fn field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    pub fn attach(mut self, attachment: Attachment) -> Self {
        self.attachments.push(attachment);
        self
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn attachments(&self) -> &[Attachment] {
        &self.attachments
    }

    pub fn has_attachments(&self) -> bool {
        !self.attachments.is_empty()
    }

    /// The JSON body for JSON-encoded requests.
    pub fn to_json(&self) -> Value {
        Value::Object(self.fields.clone())
    }

    /// Text parts for multipart encoding.
    ///
    /// Null fields are skipped. Arrays become repeated `key[]` parts, objects
    /// are sent as JSON text.
    pub fn form_fields(&self) -> Vec<(String, String)> {
        let mut parts = Vec::new();
        for (key, value) in &self.fields {
            match value {
                Value::Null => {}
                Value::String(s) => parts.push((key.clone(), s.clone())),
                Value::Bool(b) => parts.push((key.clone(), if *b { "1" } else { "0" }.to_string())),
                Value::Number(n) => parts.push((key.clone(), n.to_string())),
                Value::Array(items) => {
                    let array_key = if key.ends_with("[]") {
                        key.clone()
                    } else {
                        format!("{key}[]")
                    };
                    for item in items {
                        match item {
                            Value::Null => {}
                            Value::String(s) => parts.push((array_key.clone(), s.clone())),
                            other => parts.push((array_key.clone(), other.to_string())),
                        }
                    }
                }
                Value::Object(_) => parts.push((key.clone(), value.to_string())),
            }
        }
        parts
    }
}
