mod identity;
mod login;
mod register;
mod verify;

use self::identity::{IdentityService, IdentityServiceDeps};
use self::login::{LoginService, LoginServiceDeps};
use self::register::{RegisterService, RegisterServiceDeps};
use self::verify::{VerifyService, VerifyServiceDeps};
use crate::{
    abstract_trait::{
        DynEmailService, DynHashing, DynIdentityService, DynJwtService, DynLoginService,
        DynRegisterService, DynUserCommandRepository, DynUserQueryRepository, DynVerifyService,
    },
    config::VerificationConfig,
    utils::Metrics,
};
use anyhow::Result;
use prometheus_client::registry::Registry;
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct AuthService {
    pub register: DynRegisterService,
    pub login: DynLoginService,
    pub verify: DynVerifyService,
    pub identity: DynIdentityService,
}

#[derive(Clone)]
pub struct AuthServiceDeps {
    pub hash: DynHashing,
    pub jwt: DynJwtService,
    pub mailer: DynEmailService,
    pub user_query: DynUserQueryRepository,
    pub user_command: DynUserCommandRepository,
    pub verification: VerificationConfig,
    pub metrics: Arc<Mutex<Metrics>>,
    pub registry: Arc<Mutex<Registry>>,
}

impl AuthService {
    pub async fn new(deps: AuthServiceDeps) -> Result<Self> {
        let register_deps = RegisterServiceDeps {
            query: deps.user_query.clone(),
            command: deps.user_command.clone(),
            hash: deps.hash.clone(),
            mailer: deps.mailer.clone(),
            verification: deps.verification.clone(),
            metrics: deps.metrics.clone(),
            registry: deps.registry.clone(),
        };

        let register = Arc::new(RegisterService::new(register_deps).await) as DynRegisterService;

        let login_deps = LoginServiceDeps {
            query: deps.user_query.clone(),
            hash: deps.hash.clone(),
            jwt: deps.jwt.clone(),
            metrics: deps.metrics.clone(),
            registry: deps.registry.clone(),
        };

        let login = Arc::new(LoginService::new(login_deps).await) as DynLoginService;

        let verify_deps = VerifyServiceDeps {
            query: deps.user_query.clone(),
            command: deps.user_command.clone(),
            metrics: deps.metrics.clone(),
            registry: deps.registry.clone(),
        };

        let verify = Arc::new(VerifyService::new(verify_deps).await) as DynVerifyService;

        let identity_deps = IdentityServiceDeps {
            query: deps.user_query.clone(),
            command: deps.user_command.clone(),
            metrics: deps.metrics.clone(),
            registry: deps.registry.clone(),
        };

        let identity = Arc::new(IdentityService::new(identity_deps).await) as DynIdentityService;

        Ok(Self {
            register,
            login,
            verify,
            identity,
        })
    }
}
