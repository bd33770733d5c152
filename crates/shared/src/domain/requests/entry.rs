use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Structured view of the `service_details` blob. Every field is
/// optional; the workshop fills them in as the job progresses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ServiceDetails {
    pub is_shoe_clean: Option<String>,
    pub service_type: Option<String>,
    pub needs_reglue: Option<bool>,
    pub needs_paint: Option<bool>,
    pub qc_passed: Option<bool>,
    pub basic_cleaning: Option<String>,
    pub received_by: Option<String>,
}

fn default_status() -> String {
    "pending".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateEntryRequest {
    #[serde(default)]
    pub customer_name: String,

    #[validate(length(min = 1, message = "Customer phone is required"))]
    pub customer_phone: String,

    #[serde(default)]
    pub customer_email: String,

    #[validate(length(min = 1, message = "Delivery address is required"))]
    pub delivery_address: String,

    #[serde(default)]
    pub item_description: String,

    #[serde(default)]
    pub shoe_condition: String,

    pub shoe_service: Option<String>,

    #[serde(default)]
    pub waiver_signed: bool,

    pub waiver_url: Option<String>,

    #[serde(default)]
    pub before_photos: Vec<String>,

    pub assigned_to: Option<String>,

    pub needs_reglue: Option<bool>,

    pub needs_paint: Option<bool>,

    #[serde(default = "default_status")]
    pub status: String,

    pub service_details: Option<ServiceDetails>,

    #[serde(default)]
    pub after_photos: Vec<String>,

    pub billing: Option<f64>,

    pub additional_billing: Option<f64>,

    pub delivery_option: Option<String>,

    pub marked_as: Option<String>,
}

/// PATCH /entries/{id} body. Absent fields keep their stored value;
/// `serviceDetails` replaces the whole blob when present.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEntryRequest {
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
    pub customer_email: Option<String>,
    pub delivery_address: Option<String>,
    pub item_description: Option<String>,
    pub shoe_condition: Option<String>,
    pub shoe_service: Option<String>,
    pub waiver_signed: Option<bool>,
    pub waiver_url: Option<String>,
    pub before_photos: Option<Vec<String>>,
    pub assigned_to: Option<String>,
    pub needs_reglue: Option<bool>,
    pub needs_paint: Option<bool>,
    pub status: Option<String>,
    pub service_details: Option<ServiceDetails>,
    pub after_photos: Option<Vec<String>>,
    pub billing: Option<f64>,
    pub additional_billing: Option<f64>,
    pub delivery_option: Option<String>,
    pub marked_as: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema, IntoParams)]
pub struct FindAllEntries {
    #[serde(default = "default_page")]
    pub page: i32,

    #[serde(default = "default_page_size")]
    pub page_size: i32,

    #[serde(default)]
    pub search: String,
}

fn default_page() -> i32 {
    1
}

fn default_page_size() -> i32 {
    50
}

/// Fully resolved row the repository inserts. Photo lists and service
/// details arrive here already serialized.
#[derive(Debug, Clone)]
pub struct NewEntry {
    pub public_id: String,
    pub customer_name: String,
    pub customer_phone: String,
    pub customer_email: String,
    pub delivery_address: String,
    pub item_description: String,
    pub shoe_condition: String,
    pub shoe_service: Option<String>,
    pub waiver_signed: bool,
    pub waiver_url: Option<String>,
    pub before_photos: String,
    pub assigned_to: Option<String>,
    pub needs_reglue: Option<bool>,
    pub needs_paint: Option<bool>,
    pub status: String,
    pub service_details: Option<String>,
    pub after_photos: String,
    pub billing: Option<f64>,
    pub additional_billing: Option<f64>,
    pub delivery_option: Option<String>,
    pub marked_as: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_request_uses_camel_case_and_defaults() {
        let req: CreateEntryRequest = serde_json::from_str(
            r#"{
                "customerPhone": "09171234567",
                "deliveryAddress": "12 Mabini St",
                "beforePhotos": ["a.jpg", "b.jpg"],
                "needsReglue": true
            }"#,
        )
        .unwrap();

        assert_eq!(req.customer_phone, "09171234567");
        assert_eq!(req.customer_name, "");
        assert_eq!(req.status, "pending");
        assert_eq!(req.before_photos, vec!["a.jpg", "b.jpg"]);
        assert_eq!(req.needs_reglue, Some(true));
        assert!(!req.waiver_signed);
        assert!(req.after_photos.is_empty());
    }

    #[test]
    fn create_request_without_phone_is_rejected_by_serde() {
        let result = serde_json::from_str::<CreateEntryRequest>(
            r#"{ "deliveryAddress": "12 Mabini St" }"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn service_details_round_trips_camel_case() {
        let details = ServiceDetails {
            is_shoe_clean: Some("yes".into()),
            service_type: Some("deep clean".into()),
            needs_reglue: None,
            needs_paint: Some(false),
            qc_passed: None,
            basic_cleaning: Some("done".into()),
            received_by: Some("Mara".into()),
        };

        let json = serde_json::to_value(&details).unwrap();
        assert_eq!(json["isShoeClean"], "yes");
        assert_eq!(json["serviceType"], "deep clean");
        assert_eq!(json["qcPassed"], serde_json::Value::Null);

        let back: ServiceDetails = serde_json::from_value(json).unwrap();
        assert_eq!(back, details);
    }

    #[test]
    fn update_request_leaves_absent_fields_as_none() {
        let req: UpdateEntryRequest =
            serde_json::from_str(r#"{ "status": "in_progress", "waiverSigned": true }"#).unwrap();

        assert_eq!(req.status.as_deref(), Some("in_progress"));
        assert_eq!(req.waiver_signed, Some(true));
        assert!(req.customer_name.is_none());
        assert!(req.before_photos.is_none());
    }

    #[test]
    fn list_params_default_to_first_page() {
        let params: FindAllEntries = serde_json::from_str("{}").unwrap();
        assert_eq!(params.page, 1);
        assert_eq!(params.page_size, 50);
        assert_eq!(params.search, "");
    }
}
