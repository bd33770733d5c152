use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct WaiverUploadResponse {
    pub url: String,
    pub path: String,
    pub expires_in: i64,
}
