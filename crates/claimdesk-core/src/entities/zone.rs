//! Zones.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::entity::{Entity, ResourceSpec};

use super::lenient;

/// A geographic service zone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    #[serde(deserialize_with = "lenient::uuid")]
    pub uuid: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub zone_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub zone_type: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub code: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub created_at: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub updated_at: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub deleted_at: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Entity for Zone {
    const RESOURCE: ResourceSpec = ResourceSpec::json("zone", "zones");
    const DISPLAY_FIELD: &'static str = "zone_name";
    const SEARCH_FIELDS: &'static [&'static str] = &["zone_name", "zone_type", "code", "description"];

    entity_accessors!();
}
