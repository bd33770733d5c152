use crate::errors::ServiceError;
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

pub type DynJwtService = Arc<dyn JwtServiceTrait + Send + Sync>;

/// Issues and validates access tokens. The subject is the account email.
#[async_trait]
pub trait JwtServiceTrait: Send + Sync + std::fmt::Debug {
    fn generate_token(&self, subject: &str) -> Result<String, ServiceError>;
    fn verify_token(&self, token: &str) -> Result<String, ServiceError>;
}
