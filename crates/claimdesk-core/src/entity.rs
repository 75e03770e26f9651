//! The entity abstraction shared by every managed record type.
//!
//! An [`Entity`] is an opaque server record that the sync layer only
//! inspects through its `uuid` and `deleted_at`. Everything else that varies
//! per record type (endpoint path, envelope unwrapping, update verb, body
//! encoding, sort and search fields) is described by associated constants.

use std::fmt;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// HTTP verbs used by the resource routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        };
        f.write_str(s)
    }
}

/// Request body encoding for create/update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyEncoding {
    /// `application/json`.
    Json,
    /// `multipart/form-data`; used by file-bearing entities.
    Multipart,
}

/// Which single-record responses arrive wrapped as `{success, data}`.
///
/// `false` means the endpoint returns the record directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnwrapPolicy {
    pub get: bool,
    pub create: bool,
    pub update: bool,
    pub restore: bool,
}

impl UnwrapPolicy {
    /// Every single-record endpoint returns the record directly.
    pub const DIRECT: Self = Self {
        get: false,
        create: false,
        update: false,
        restore: false,
    };

    /// Every single-record endpoint wraps the record in an envelope.
    pub const WRAPPED: Self = Self {
        get: true,
        create: true,
        update: true,
        restore: true,
    };
}

/// Endpoint and encoding description for one entity type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceSpec {
    /// Human-readable singular name, used in logs and messages.
    pub name: &'static str,
    /// Path segment under `/api/`.
    pub path: &'static str,
    /// Envelope unwrapping per single-record operation.
    pub unwrap: UnwrapPolicy,
    /// Verb used by the update route.
    pub update_method: HttpMethod,
    /// Body encoding for create/update.
    pub encoding: BodyEncoding,
}

impl ResourceSpec {
    /// A JSON resource with direct single-record responses and PUT updates.
    pub const fn json(name: &'static str, path: &'static str) -> Self {
        Self {
            name,
            path,
            unwrap: UnwrapPolicy::DIRECT,
            update_method: HttpMethod::Put,
            encoding: BodyEncoding::Json,
        }
    }

    pub const fn with_unwrap(mut self, unwrap: UnwrapPolicy) -> Self {
        self.unwrap = unwrap;
        self
    }

    pub const fn with_update_method(mut self, method: HttpMethod) -> Self {
        self.update_method = method;
        self
    }

    pub const fn with_encoding(mut self, encoding: BodyEncoding) -> Self {
        self.encoding = encoding;
        self
    }
}

/// A resource route; resolves to a verb and path segments for a spec.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route<'a> {
    List,
    Get(&'a str),
    Create,
    Update(&'a str),
    Delete(&'a str),
    Restore(&'a str),
}

impl<'a> Route<'a> {
    /// Path segments below `/api/`.
    pub fn segments(&self, spec: &ResourceSpec) -> Vec<&'a str> {
        match *self {
            Route::List => vec![spec.path],
            Route::Get(uuid) => vec![spec.path, uuid],
            Route::Create => vec![spec.path, "store"],
            Route::Update(uuid) => vec![spec.path, "update", uuid],
            Route::Delete(uuid) => vec![spec.path, "delete", uuid],
            Route::Restore(uuid) => vec![spec.path, "restore", uuid],
        }
    }

    pub fn method(&self, spec: &ResourceSpec) -> HttpMethod {
        match self {
            Route::List | Route::Get(_) => HttpMethod::Get,
            Route::Create => HttpMethod::Post,
            Route::Update(_) => spec.update_method,
            Route::Delete(_) => HttpMethod::Delete,
            Route::Restore(_) => HttpMethod::Put,
        }
    }

    /// Whether the single-record response for this route is wrapped.
    pub fn unwraps(&self, spec: &ResourceSpec) -> bool {
        match self {
            Route::Get(_) => spec.unwrap.get,
            Route::Create => spec.unwrap.create,
            Route::Update(_) => spec.unwrap.update,
            Route::Restore(_) => spec.unwrap.restore,
            Route::List | Route::Delete(_) => true,
        }
    }

    /// Mutating routes need a CSRF token when one is configured.
    pub fn is_mutating(&self) -> bool {
        !matches!(self, Route::List | Route::Get(_))
    }
}

/// A server-defined record managed by the sync layer.
pub trait Entity:
    Clone + fmt::Debug + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// Endpoint and encoding configuration.
    const RESOURCE: ResourceSpec;

    /// Field the store sorts by after inserting.
    const DISPLAY_FIELD: &'static str;

    /// Fields matched by the store's search filter.
    const SEARCH_FIELDS: &'static [&'static str];

    /// Server-assigned identity.
    fn uuid(&self) -> &str;

    /// Soft-delete timestamp; `None` means active.
    fn deleted_at(&self) -> Option<&str>;

    fn set_deleted_at(&mut self, deleted_at: Option<String>);

    fn is_deleted(&self) -> bool {
        self.deleted_at().is_some()
    }

    /// Text value of a named field, if present and string-coercible.
    ///
    /// The default goes through the serialized JSON form, so flattened extra
    /// fields are reachable too.
    fn field_text(&self, field: &str) -> Option<String> {
        let value = serde_json::to_value(self).ok()?;
        value.get(field).and_then(coerce_text)
    }
}

/// Coerce a JSON scalar to text; null, arrays and objects yield `None`.
pub fn coerce_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Sort key for display ordering: case-insensitive first, then exact text.
///
/// Missing values sort as the empty string.
pub fn display_sort_key(text: Option<String>) -> (String, String) {
    let text = text.unwrap_or_default();
    (text.to_lowercase(), text)
}
