mod command;
mod query;

use self::command::{EntryCommandService, EntryCommandServiceDeps};
use self::query::EntryQueryService;
use crate::{
    abstract_trait::{
        DynEntryCommandRepository, DynEntryCommandService, DynEntryPolicy, DynEntryQueryRepository,
        DynEntryQueryService,
    },
    utils::Metrics,
};
use anyhow::Result;
use prometheus_client::registry::Registry;
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct EntryService {
    pub query: DynEntryQueryService,
    pub command: DynEntryCommandService,
}

#[derive(Clone)]
pub struct EntryServiceDeps {
    pub query_repo: DynEntryQueryRepository,
    pub command_repo: DynEntryCommandRepository,
    pub policy: DynEntryPolicy,
    pub metrics: Arc<Mutex<Metrics>>,
    pub registry: Arc<Mutex<Registry>>,
}

impl EntryService {
    pub async fn new(deps: EntryServiceDeps) -> Result<Self> {
        let query = Arc::new(
            EntryQueryService::new(
                deps.query_repo.clone(),
                deps.metrics.clone(),
                deps.registry.clone(),
            )
            .await,
        ) as DynEntryQueryService;

        let command_deps = EntryCommandServiceDeps {
            query: deps.query_repo.clone(),
            command: deps.command_repo.clone(),
            policy: deps.policy.clone(),
            metrics: deps.metrics.clone(),
            registry: deps.registry.clone(),
        };

        let command =
            Arc::new(EntryCommandService::new(command_deps).await) as DynEntryCommandService;

        Ok(Self { query, command })
    }
}
