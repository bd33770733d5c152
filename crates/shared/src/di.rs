use crate::{
    abstract_trait::{
        DynEmailService, DynEntryPolicy, DynHashing, DynJwtService, DynStorageService,
        DynWaiverService,
    },
    config::{ConnectionPool, VerificationConfig},
    repository::{EntryRepository, UserRepository},
    service::{
        AuthService, AuthServiceDeps, EntryService, EntryServiceDeps, SharedStaffPolicy,
        WaiverService,
    },
    utils::Metrics,
};
use anyhow::Result;
use prometheus_client::registry::Registry;
use std::{fmt, sync::Arc};
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct DependenciesInject {
    pub auth_service: AuthService,
    pub entry_service: EntryService,
    pub waiver_service: DynWaiverService,
}

impl fmt::Debug for DependenciesInject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DependenciesInject")
            .field("auth_service", &"<AuthService>")
            .field("entry_service", &"<EntryService>")
            .field("waiver_service", &"<WaiverService>")
            .finish()
    }
}

#[derive(Clone)]
pub struct DependenciesInjectDeps {
    pub pool: ConnectionPool,
    pub hash: DynHashing,
    pub jwt_config: DynJwtService,
    pub mailer: DynEmailService,
    pub storage: DynStorageService,
    pub verification: VerificationConfig,
    pub metrics: Arc<Mutex<Metrics>>,
    pub registry: Arc<Mutex<Registry>>,
}

impl DependenciesInject {
    pub async fn new(deps: DependenciesInjectDeps) -> Result<Self> {
        let DependenciesInjectDeps {
            pool,
            hash,
            jwt_config,
            mailer,
            storage,
            verification,
            metrics,
            registry,
        } = deps;

        let user_repository = UserRepository::new(pool.clone());
        let entry_repository = EntryRepository::new(pool.clone());

        let auth_deps = AuthServiceDeps {
            hash,
            jwt: jwt_config,
            mailer,
            user_query: user_repository.query,
            user_command: user_repository.command,
            verification,
            metrics: metrics.clone(),
            registry: registry.clone(),
        };

        let auth_service = AuthService::new(auth_deps).await?;

        let policy = Arc::new(SharedStaffPolicy) as DynEntryPolicy;

        let entry_deps = EntryServiceDeps {
            query_repo: entry_repository.query.clone(),
            command_repo: entry_repository.command.clone(),
            policy,
            metrics: metrics.clone(),
            registry: registry.clone(),
        };

        let entry_service = EntryService::new(entry_deps).await?;

        let waiver_service =
            Arc::new(WaiverService::new(storage, metrics.clone(), registry.clone()).await)
                as DynWaiverService;

        Ok(Self {
            auth_service,
            entry_service,
            waiver_service,
        })
    }
}
