use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One shoe-repair job. `before_photos`, `after_photos` and
/// `service_details` are stored as serialized JSON text and only
/// deserialized at the API boundary.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Entry {
    pub entry_id: i32,
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
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}
