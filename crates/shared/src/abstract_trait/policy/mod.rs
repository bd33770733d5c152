use crate::{errors::ServiceError, model::Entry};
use async_trait::async_trait;
use std::sync::Arc;

pub type DynEntryPolicy = Arc<dyn EntryPolicyTrait + Send + Sync>;

/// Capability check between authentication and entry mutation. The actor
/// has already presented a valid token; implementations decide whether
/// that identity may change the given entry.
#[async_trait]
pub trait EntryPolicyTrait {
    async fn authorize_mutation(
        &self,
        actor_email: &str,
        entry: &Entry,
    ) -> Result<(), ServiceError>;
}
