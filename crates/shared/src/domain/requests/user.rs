use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// PATCH /me body. `None` leaves the field untouched.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate)]
pub struct UpdateProfileRequest {
    pub first_name: Option<String>,

    pub last_name: Option<String>,

    pub phone: Option<String>,
}

/// Row the credential store inserts on registration. Built by the
/// register service after hashing; never accepted from the wire.
#[derive(Debug, Clone)]
pub struct CreateUserRecord {
    pub email: String,
    pub password_hash: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub pending_verification_token: String,
    pub verification_expires_at: NaiveDateTime,
}
