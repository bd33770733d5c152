use crate::domain::requests::ServiceDetails;
use crate::model::Entry;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tracing::warn;
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EntryResponse {
    pub id: String,
    pub customer_name: String,
    pub customer_phone: String,
    pub customer_email: String,
    pub delivery_address: String,
    pub item_description: String,
    pub shoe_condition: String,
    pub shoe_service: Option<String>,
    pub waiver_signed: bool,
    pub waiver_url: Option<String>,
    pub before_photos: Vec<String>,
    pub assigned_to: Option<String>,
    pub needs_reglue: Option<bool>,
    pub needs_paint: Option<bool>,
    pub status: String,
    pub service_details: Option<ServiceDetails>,
    pub after_photos: Vec<String>,
    pub billing: Option<f64>,
    pub additional_billing: Option<f64>,
    pub delivery_option: Option<String>,
    pub marked_as: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

fn parse_photos(raw: &str, which: &str, public_id: &str) -> Vec<String> {
    match serde_json::from_str(raw) {
        Ok(photos) => photos,
        Err(e) => {
            warn!("⚠️ Corrupt {which} blob on entry {public_id}: {e}");
            Vec::new()
        }
    }
}

fn parse_details(raw: &str, public_id: &str) -> Option<ServiceDetails> {
    match serde_json::from_str(raw) {
        Ok(details) => Some(details),
        Err(e) => {
            warn!("⚠️ Corrupt service_details blob on entry {public_id}: {e}");
            None
        }
    }
}

impl From<Entry> for EntryResponse {
    fn from(value: Entry) -> Self {
        let before_photos = parse_photos(&value.before_photos, "before_photos", &value.public_id);
        let after_photos = parse_photos(&value.after_photos, "after_photos", &value.public_id);
        let service_details = value
            .service_details
            .as_deref()
            .and_then(|raw| parse_details(raw, &value.public_id));

        EntryResponse {
            id: value.public_id,
            customer_name: value.customer_name,
            customer_phone: value.customer_phone,
            customer_email: value.customer_email,
            delivery_address: value.delivery_address,
            item_description: value.item_description,
            shoe_condition: value.shoe_condition,
            shoe_service: value.shoe_service,
            waiver_signed: value.waiver_signed,
            waiver_url: value.waiver_url,
            before_photos,
            assigned_to: value.assigned_to,
            needs_reglue: value.needs_reglue,
            needs_paint: value.needs_paint,
            status: value.status,
            service_details,
            after_photos,
            billing: value.billing,
            additional_billing: value.additional_billing,
            delivery_option: value.delivery_option,
            marked_as: value.marked_as,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DeleteEntryResponse {
    pub deleted: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn sample_entry() -> Entry {
        let ts = NaiveDate::from_ymd_opt(2025, 9, 14)
            .unwrap()
            .and_hms_opt(8, 30, 0)
            .unwrap();

        Entry {
            entry_id: 1,
            public_id: "3f2a77c0d5e64b3f9d1a2b3c4d5e6f70".into(),
            customer_name: "Ana Cruz".into(),
            customer_phone: "09171234567".into(),
            customer_email: "ana@example.com".into(),
            delivery_address: "12 Mabini St".into(),
            item_description: "Leather boots".into(),
            shoe_condition: "scuffed".into(),
            shoe_service: Some("full restoration".into()),
            waiver_signed: true,
            waiver_url: Some("https://storage.example.com/waivers/x.pdf".into()),
            before_photos: r#"["before1.jpg","before2.jpg"]"#.into(),
            assigned_to: Some("Mara".into()),
            needs_reglue: Some(true),
            needs_paint: None,
            status: "in_progress".into(),
            service_details: Some(r#"{"qcPassed":false,"receivedBy":"Mara"}"#.into()),
            after_photos: "[]".into(),
            billing: Some(1500.0),
            additional_billing: None,
            delivery_option: Some("pickup".into()),
            marked_as: None,
            created_at: ts,
            updated_at: ts,
        }
    }

    #[test]
    fn response_deserializes_blobs_and_renames_fields() {
        let response = EntryResponse::from(sample_entry());

        assert_eq!(response.id, "3f2a77c0d5e64b3f9d1a2b3c4d5e6f70");
        assert_eq!(response.before_photos, vec!["before1.jpg", "before2.jpg"]);
        assert!(response.after_photos.is_empty());

        let details = response.service_details.as_ref().unwrap();
        assert_eq!(details.qc_passed, Some(false));
        assert_eq!(details.received_by.as_deref(), Some("Mara"));

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["customerName"], "Ana Cruz");
        assert_eq!(json["waiverSigned"], true);
        assert_eq!(json["serviceDetails"]["qcPassed"], false);
        assert!(json["createdAt"].as_str().unwrap().starts_with("2025-09-14T08:30:00"));
    }

    #[test]
    fn corrupt_blobs_degrade_to_empty_instead_of_failing() {
        let mut entry = sample_entry();
        entry.before_photos = "not json".into();
        entry.service_details = Some("{broken".into());

        let response = EntryResponse::from(entry);
        assert!(response.before_photos.is_empty());
        assert!(response.service_details.is_none());
    }
}
