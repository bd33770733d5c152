use anyhow::{Context, Result};
use prometheus_client::registry::Registry;
use shared::{
    abstract_trait::{DynEmailService, DynHashing, DynJwtService, DynStorageService},
    config::{Config, ConnectionPool, EmailService, Hashing, JwtConfig, StorageClient},
    di::{DependenciesInject, DependenciesInjectDeps},
    utils::{Metrics, SystemMetrics, run_metrics_collector},
};
use std::{fmt, sync::Arc};
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct AppState {
    pub di_container: DependenciesInject,
    pub jwt_config: DynJwtService,
    pub registry: Arc<Mutex<Registry>>,
    pub metrics: Arc<Mutex<Metrics>>,
    pub system_metrics: Arc<SystemMetrics>,
    pub cors_allowed_origins: Vec<String>,
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("di_container", &self.di_container)
            .field("jwt_config", &"<dyn JwtService>")
            .finish()
    }
}

impl AppState {
    pub async fn new(pool: ConnectionPool, config: Config) -> Result<Self> {
        let jwt_config = Arc::new(JwtConfig::new(
            &config.jwt_secret,
            config.access_token_ttl_minutes,
        )) as DynJwtService;
        let hashing = Arc::new(Hashing::new()) as DynHashing;

        let mailer = Arc::new(
            EmailService::new(&config.email)
                .await
                .context("Failed to build SMTP transport")?,
        ) as DynEmailService;

        let storage = Arc::new(
            StorageClient::new(config.storage.clone()).context("Failed to build storage client")?,
        ) as DynStorageService;

        let registry = Arc::new(Mutex::new(Registry::default()));
        let metrics = Arc::new(Mutex::new(Metrics::new()));
        let system_metrics = Arc::new(SystemMetrics::new());

        let deps = DependenciesInjectDeps {
            pool: pool.clone(),
            hash: hashing.clone(),
            jwt_config: jwt_config.clone(),
            mailer,
            storage,
            verification: config.verification.clone(),
            metrics: metrics.clone(),
            registry: registry.clone(),
        };

        let di_container = DependenciesInject::new(deps)
            .await
            .context("Failed to initialize dependency injection container")?;

        system_metrics.register(&mut *registry.lock().await);

        tokio::spawn(run_metrics_collector(system_metrics.clone()));

        Ok(Self {
            di_container,
            jwt_config,
            registry,
            metrics,
            system_metrics,
            cors_allowed_origins: config.cors_allowed_origins,
        })
    }
}
