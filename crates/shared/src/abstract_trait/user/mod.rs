use crate::{
    domain::requests::{CreateUserRecord, UpdateProfileRequest},
    errors::RepositoryError,
    model::User as UserModel,
};
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

pub type DynUserQueryRepository = Arc<dyn UserQueryRepositoryTrait + Send + Sync>;
pub type DynUserCommandRepository = Arc<dyn UserCommandRepositoryTrait + Send + Sync>;

#[async_trait]
pub trait UserQueryRepositoryTrait {
    async fn find_by_email(&self, email: &str) -> Result<Option<UserModel>, RepositoryError>;
}

#[async_trait]
pub trait UserCommandRepositoryTrait {
    async fn create_user(&self, record: &CreateUserRecord) -> Result<UserModel, RepositoryError>;

    /// Compare-and-set redemption: flips `verified` and clears the pending
    /// token in one statement. `Ok(None)` means the stored token no longer
    /// matches.
    async fn mark_verified(
        &self,
        email: &str,
        token: &str,
    ) -> Result<Option<UserModel>, RepositoryError>;

    async fn update_profile(
        &self,
        email: &str,
        req: &UpdateProfileRequest,
    ) -> Result<UserModel, RepositoryError>;
}
