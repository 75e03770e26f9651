//! W-9 taxpayer forms.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::entity::{Entity, HttpMethod, ResourceSpec, UnwrapPolicy};

use super::lenient;

/// A W-9 request-for-taxpayer-identification record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct W9Form {
    #[serde(deserialize_with = "lenient::uuid")]
    pub uuid: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub business_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub tax_classification: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub address: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub city: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub state: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub zip_code: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub deleted_at: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Entity for W9Form {
    const RESOURCE: ResourceSpec = ResourceSpec::json("W-9 form", "w9form")
        .with_unwrap(UnwrapPolicy {
            get: true,
            ..UnwrapPolicy::DIRECT
        })
        .with_update_method(HttpMethod::Patch);
    const DISPLAY_FIELD: &'static str = "name";
    const SEARCH_FIELDS: &'static [&'static str] =
        &["name", "business_name", "city", "state", "zip_code"];

    entity_accessors!();
}
