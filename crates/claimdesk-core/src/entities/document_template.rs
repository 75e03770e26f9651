//! Alliance company document templates.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::entity::{BodyEncoding, Entity, HttpMethod, ResourceSpec};

use super::lenient;

/// A document template owned by an alliance company.
///
/// Created and updated with multipart bodies carrying the template file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentTemplateAlliance {
    #[serde(deserialize_with = "lenient::uuid")]
    pub uuid: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub template_name_alliance: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub template_description_alliance: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub template_type_alliance: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub template_path_alliance: Option<String>,
    #[serde(default, deserialize_with = "lenient::integer")]
    pub alliance_company_id: Option<i64>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub uploaded_by: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub deleted_at: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Entity for DocumentTemplateAlliance {
    const RESOURCE: ResourceSpec =
        ResourceSpec::json("document template alliance", "document-template-alliances")
            .with_update_method(HttpMethod::Post)
            .with_encoding(BodyEncoding::Multipart);
    const DISPLAY_FIELD: &'static str = "template_name_alliance";
    const SEARCH_FIELDS: &'static [&'static str] = &[
        "template_name_alliance",
        "template_description_alliance",
        "template_type_alliance",
    ];

    entity_accessors!();
}
