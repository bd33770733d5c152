use crate::{
    domain::{
        requests::VerifyEmailParams,
        responses::{ApiResponse, VerifiedResponse},
    },
    errors::ServiceError,
};
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

pub type DynVerifyService = Arc<dyn VerifyServiceTrait + Send + Sync>;

#[async_trait]
pub trait VerifyServiceTrait {
    async fn redeem(
        &self,
        params: &VerifyEmailParams,
    ) -> Result<ApiResponse<VerifiedResponse>, ServiceError>;
}
