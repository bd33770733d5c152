use crate::{
    domain::responses::{ApiResponse, WaiverUploadResponse},
    errors::ServiceError,
};
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

pub type DynWaiverService = Arc<dyn WaiverServiceTrait + Send + Sync>;

#[async_trait]
pub trait WaiverServiceTrait {
    async fn upload_waiver(
        &self,
        file_name: Option<&str>,
        content_type: Option<&str>,
        bytes: Vec<u8>,
    ) -> Result<ApiResponse<WaiverUploadResponse>, ServiceError>;
}
