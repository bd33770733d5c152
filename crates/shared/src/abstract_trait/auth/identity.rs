use crate::{
    domain::{
        requests::UpdateProfileRequest,
        responses::{ApiResponse, UserResponse},
    },
    errors::ServiceError,
};
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

pub type DynIdentityService = Arc<dyn IdentityServiceTrait + Send + Sync>;

/// Profile reads and writes for the authenticated caller.
#[async_trait]
pub trait IdentityServiceTrait {
    async fn get_me(&self, email: &str) -> Result<ApiResponse<UserResponse>, ServiceError>;

    async fn update_me(
        &self,
        email: &str,
        req: &UpdateProfileRequest,
    ) -> Result<ApiResponse<UserResponse>, ServiceError>;
}
