use crate::model::User;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Client-facing profile. The password hash and any pending verification
/// token never leave the service layer.
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct UserResponse {
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub verified: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl From<User> for UserResponse {
    fn from(value: User) -> Self {
        UserResponse {
            email: value.email,
            first_name: value.first_name,
            last_name: value.last_name,
            phone: value.phone,
            verified: value.verified,
            created_at: value.created_at.to_string(),
            updated_at: value.updated_at.to_string(),
        }
    }
}
