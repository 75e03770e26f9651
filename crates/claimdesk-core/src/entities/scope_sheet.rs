//! Scope sheets and their photo presentations and PDF exports.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::entity::{BodyEncoding, Entity, HttpMethod, ResourceSpec, UnwrapPolicy};

use super::lenient;

/// A scope sheet: the inspection summary attached to a claim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScopeSheet {
    #[serde(deserialize_with = "lenient::uuid")]
    pub uuid: String,
    #[serde(default, deserialize_with = "lenient::integer")]
    pub claim_id: Option<i64>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub scope_sheet_description: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub generated_by: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub created_at: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub deleted_at: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Entity for ScopeSheet {
    const RESOURCE: ResourceSpec = ResourceSpec::json("scope sheet", "scope-sheet").with_unwrap(
        UnwrapPolicy {
            get: true,
            ..UnwrapPolicy::DIRECT
        },
    );
    const DISPLAY_FIELD: &'static str = "scope_sheet_description";
    const SEARCH_FIELDS: &'static [&'static str] =
        &["scope_sheet_description", "generated_by", "claim_id"];

    entity_accessors!();
}

/// A generated PDF export of a scope sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScopeSheetExport {
    #[serde(deserialize_with = "lenient::uuid")]
    pub uuid: String,
    #[serde(default, deserialize_with = "lenient::integer")]
    pub scope_sheet_id: Option<i64>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub full_pdf_path: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub generated_by: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub created_at: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub deleted_at: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Entity for ScopeSheetExport {
    const RESOURCE: ResourceSpec = ResourceSpec::json("scope sheet export", "scope-sheet-export")
        .with_unwrap(UnwrapPolicy::WRAPPED);
    const DISPLAY_FIELD: &'static str = "full_pdf_path";
    const SEARCH_FIELDS: &'static [&'static str] = &["full_pdf_path", "generated_by"];

    entity_accessors!();
}

/// A photo slot in a scope sheet presentation.
///
/// Photos travel as multipart `photo_path[]` parts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScopeSheetPresentation {
    #[serde(deserialize_with = "lenient::uuid")]
    pub uuid: String,
    #[serde(default, deserialize_with = "lenient::integer")]
    pub scope_sheet_id: Option<i64>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub photo_type: Option<String>,
    #[serde(default, deserialize_with = "lenient::integer")]
    pub photo_order: Option<i64>,
    #[serde(default)]
    pub photo_path: Option<Value>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub deleted_at: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Entity for ScopeSheetPresentation {
    const RESOURCE: ResourceSpec =
        ResourceSpec::json("scope sheet presentation", "scope-sheet-presentation")
            .with_update_method(HttpMethod::Post)
            .with_encoding(BodyEncoding::Multipart);
    const DISPLAY_FIELD: &'static str = "photo_type";
    const SEARCH_FIELDS: &'static [&'static str] = &["photo_type", "photo_order"];

    entity_accessors!();
}
