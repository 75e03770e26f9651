//! Claim-attached records.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::entity::{Entity, ResourceSpec, UnwrapPolicy};

use super::lenient;

/// A signed agreement between a claim and an alliance company.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClaimAgreementAlliance {
    #[serde(deserialize_with = "lenient::uuid")]
    pub uuid: String,
    #[serde(default, deserialize_with = "lenient::integer")]
    pub claim_id: Option<i64>,
    #[serde(default, deserialize_with = "lenient::integer")]
    pub alliance_company_id: Option<i64>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub claim_agreement_alliance_full_path: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub agreement_type: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub generated_by: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub deleted_at: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Entity for ClaimAgreementAlliance {
    const RESOURCE: ResourceSpec =
        ResourceSpec::json("claim agreement alliance", "claim-agreement-alliance")
            .with_unwrap(UnwrapPolicy::WRAPPED);
    const DISPLAY_FIELD: &'static str = "agreement_type";
    const SEARCH_FIELDS: &'static [&'static str] =
        &["agreement_type", "generated_by", "claim_id"];

    entity_accessors!();
}

/// A public adjuster assigned to a claim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClaimPublicAdjuster {
    #[serde(deserialize_with = "lenient::uuid")]
    pub uuid: String,
    #[serde(default, deserialize_with = "lenient::integer")]
    pub claim_id: Option<i64>,
    #[serde(default, deserialize_with = "lenient::integer")]
    pub public_adjuster_id: Option<i64>,
    #[serde(default, deserialize_with = "lenient::integer")]
    pub public_company_id: Option<i64>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub assignment_date: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub deleted_at: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Entity for ClaimPublicAdjuster {
    const RESOURCE: ResourceSpec =
        ResourceSpec::json("claim public adjuster", "claim-public-adjuster");
    const DISPLAY_FIELD: &'static str = "description";
    const SEARCH_FIELDS: &'static [&'static str] = &["description", "assignment_date", "claim_id"];

    entity_accessors!();
}
