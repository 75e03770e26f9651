//! Concrete record types managed by the admin application.
//!
//! Each record keeps the fields the application reads by name and collects
//! everything else the server sends into `extra`, so round-tripping a record
//! through the store never drops server-computed data.

/// Implements the identity and soft-delete accessors of
/// [`Entity`](crate::Entity) for a struct with `uuid: String` and
/// `deleted_at: Option<String>` fields.
///
/// Defined ahead of the entity modules so it is in textual scope there.
macro_rules! entity_accessors {
    () => {
        fn uuid(&self) -> &str {
            &self.uuid
        }

        fn deleted_at(&self) -> Option<&str> {
            self.deleted_at.as_deref()
        }

        fn set_deleted_at(&mut self, deleted_at: Option<String>) {
            self.deleted_at = deleted_at;
        }
    };
}

mod claim;
mod document_template;
mod lenient;
mod scope_sheet;
mod w9_form;
mod zone;

pub use claim::{ClaimAgreementAlliance, ClaimPublicAdjuster};
pub use document_template::DocumentTemplateAlliance;
pub use scope_sheet::{ScopeSheet, ScopeSheetExport, ScopeSheetPresentation};
pub use w9_form::W9Form;
pub use zone::Zone;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{BodyEncoding, Entity, HttpMethod};
    use serde_json::json;

    #[test]
    fn unknown_fields_survive_round_trip() {
        let value = json!({
            "uuid": "z-1",
            "zone_name": "North",
            "deleted_at": null,
            "created_by_user": {"name": "Ana"}
        });
        let zone: Zone = serde_json::from_value(value).unwrap();
        assert!(zone.extra.contains_key("created_by_user"));

        let back = serde_json::to_value(&zone).unwrap();
        assert_eq!(back["created_by_user"]["name"], "Ana");
    }

    #[test]
    fn field_text_coerces_numbers() {
        let sheet: ScopeSheet = serde_json::from_value(json!({
            "uuid": "s-1",
            "claim_id": 1042,
            "scope_sheet_description": "Roof"
        }))
        .unwrap();
        assert_eq!(sheet.field_text("claim_id").as_deref(), Some("1042"));
        assert_eq!(sheet.field_text("generated_by"), None);
    }

    #[test]
    fn file_bearing_entities_use_multipart() {
        assert_eq!(
            ScopeSheetPresentation::RESOURCE.encoding,
            BodyEncoding::Multipart
        );
        assert_eq!(
            DocumentTemplateAlliance::RESOURCE.encoding,
            BodyEncoding::Multipart
        );
        assert_eq!(Zone::RESOURCE.encoding, BodyEncoding::Json);
        assert_eq!(W9Form::RESOURCE.update_method, HttpMethod::Patch);
    }

    #[test]
    fn soft_delete_accessors() {
        let mut zone: Zone = serde_json::from_value(json!({"uuid": "z"})).unwrap();
        assert!(!zone.is_deleted());
        zone.set_deleted_at(Some("2024-05-01T10:00:00.000Z".to_string()));
        assert_eq!(zone.deleted_at(), Some("2024-05-01T10:00:00.000Z"));
    }

    #[test]
    fn loosely_typed_fields_still_decode() {
        let zone: Zone = serde_json::from_value(json!({"uuid": "z", "zone_name": 123})).unwrap();
        assert_eq!(zone.zone_name.as_deref(), Some("123"));

        let agreement: ClaimAgreementAlliance = serde_json::from_value(json!({
            "uuid": "c-1",
            "claim_id": 1042,
            "alliance_company_id": "12",
            "agreement_type": ["not", "text"]
        }))
        .unwrap();
        assert_eq!(agreement.claim_id, Some(1042));
        assert_eq!(agreement.alliance_company_id, Some(12));
        assert_eq!(agreement.agreement_type, None);
    }
}
