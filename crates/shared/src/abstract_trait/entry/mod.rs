use crate::{
    domain::{
        requests::{CreateEntryRequest, FindAllEntries, NewEntry, UpdateEntryRequest},
        responses::{
            ApiResponse, ApiResponsePagination, DeleteEntryResponse, EntryResponse,
        },
    },
    errors::{RepositoryError, ServiceError},
    model::Entry as EntryModel,
};
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

pub type DynEntryQueryRepository = Arc<dyn EntryQueryRepositoryTrait + Send + Sync>;
pub type DynEntryCommandRepository = Arc<dyn EntryCommandRepositoryTrait + Send + Sync>;
pub type DynEntryQueryService = Arc<dyn EntryQueryServiceTrait + Send + Sync>;
pub type DynEntryCommandService = Arc<dyn EntryCommandServiceTrait + Send + Sync>;

#[async_trait]
pub trait EntryQueryRepositoryTrait {
    async fn find_all(
        &self,
        req: &FindAllEntries,
    ) -> Result<(Vec<EntryModel>, i64), RepositoryError>;
    async fn find_by_public_id(
        &self,
        public_id: &str,
    ) -> Result<Option<EntryModel>, RepositoryError>;
}

#[async_trait]
pub trait EntryCommandRepositoryTrait {
    async fn create(&self, row: &NewEntry) -> Result<EntryModel, RepositoryError>;

    /// Full-row update keyed on `public_id`; refreshes `updated_at`.
    async fn update(&self, entry: &EntryModel) -> Result<EntryModel, RepositoryError>;

    async fn delete(&self, public_id: &str) -> Result<bool, RepositoryError>;
}

#[async_trait]
pub trait EntryQueryServiceTrait {
    async fn find_all(
        &self,
        req: &FindAllEntries,
    ) -> Result<ApiResponsePagination<Vec<EntryResponse>>, ServiceError>;
}

#[async_trait]
pub trait EntryCommandServiceTrait {
    async fn create(
        &self,
        req: &CreateEntryRequest,
    ) -> Result<ApiResponse<EntryResponse>, ServiceError>;

    async fn update(
        &self,
        actor_email: &str,
        public_id: &str,
        req: &UpdateEntryRequest,
    ) -> Result<ApiResponse<EntryResponse>, ServiceError>;

    async fn delete(
        &self,
        actor_email: &str,
        public_id: &str,
    ) -> Result<ApiResponse<DeleteEntryResponse>, ServiceError>;
}
