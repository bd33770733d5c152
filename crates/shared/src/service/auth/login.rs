use crate::{
    abstract_trait::{DynHashing, DynJwtService, DynUserQueryRepository, LoginServiceTrait},
    domain::{
        requests::LoginRequest,
        responses::{ApiResponse, TokenResponse},
    },
    errors::ServiceError,
    utils::{Method, Metrics, Status as StatusUtils, TracingContext},
};
use async_trait::async_trait;
use opentelemetry::{
    Context, KeyValue,
    global::{self, BoxedTracer},
    trace::{Span, SpanKind, TraceContextExt, Tracer},
};
use prometheus_client::registry::Registry;
use std::sync::Arc;
use tokio::{sync::Mutex, time::Instant};
use tracing::{error, info};

pub struct LoginService {
    query: DynUserQueryRepository,
    hash: DynHashing,
    jwt: DynJwtService,
    metrics: Arc<Mutex<Metrics>>,
}

pub struct LoginServiceDeps {
    pub query: DynUserQueryRepository,
    pub hash: DynHashing,
    pub jwt: DynJwtService,
    pub metrics: Arc<Mutex<Metrics>>,
    pub registry: Arc<Mutex<Registry>>,
}

impl LoginService {
    pub async fn new(deps: LoginServiceDeps) -> Self {
        let LoginServiceDeps {
            query,
            hash,
            jwt,
            metrics,
            registry,
        } = deps;

        registry.lock().await.register(
            "login_service_request_counter",
            "Total number of requests to the LoginService",
            metrics.lock().await.request_counter.clone(),
        );
        registry.lock().await.register(
            "login_service_request_duration",
            "Histogram of request durations for the LoginService",
            metrics.lock().await.request_duration.clone(),
        );

        Self {
            query,
            hash,
            jwt,
            metrics,
        }
    }

    fn get_tracer(&self) -> BoxedTracer {
        global::tracer("login-service")
    }

    fn start_tracing(&self, operation_name: &str, attributes: Vec<KeyValue>) -> TracingContext {
        let start_time = Instant::now();
        let tracer = self.get_tracer();
        let mut span = tracer
            .span_builder(operation_name.to_string())
            .with_kind(SpanKind::Server)
            .with_attributes(attributes)
            .start(&tracer);

        info!("Starting operation: {operation_name}");

        span.add_event(
            "Operation started",
            vec![
                KeyValue::new("operation", operation_name.to_string()),
                KeyValue::new("timestamp", start_time.elapsed().as_secs_f64().to_string()),
            ],
        );

        let cx = Context::current_with_span(span);
        TracingContext { cx, start_time }
    }

    async fn complete_tracing_success(
        &self,
        tracing_ctx: &TracingContext,
        method: Method,
        message: &str,
    ) {
        self.complete_tracing_internal(tracing_ctx, method, true, message)
            .await;
    }

    async fn complete_tracing_error(
        &self,
        tracing_ctx: &TracingContext,
        method: Method,
        error_message: &str,
    ) {
        self.complete_tracing_internal(tracing_ctx, method, false, error_message)
            .await;
    }

    async fn complete_tracing_internal(
        &self,
        tracing_ctx: &TracingContext,
        method: Method,
        is_success: bool,
        message: &str,
    ) {
        let status_str = if is_success { "SUCCESS" } else { "ERROR" };
        let status = if is_success {
            StatusUtils::Success
        } else {
            StatusUtils::Error
        };
        let elapsed = tracing_ctx.start_time.elapsed().as_secs_f64();

        tracing_ctx.cx.span().add_event(
            "Operation completed",
            vec![
                KeyValue::new("status", status_str),
                KeyValue::new("duration_secs", elapsed.to_string()),
                KeyValue::new("message", message.to_string()),
            ],
        );

        if is_success {
            info!("✅ Operation completed successfully: {message}");
        } else {
            error!("❌ Operation failed: {message}");
        }

        self.metrics.lock().await.record(method, status, elapsed);

        tracing_ctx.cx.span().end();
    }
}

#[async_trait]
impl LoginServiceTrait for LoginService {
    async fn login(
        &self,
        request: &LoginRequest,
    ) -> Result<ApiResponse<TokenResponse>, ServiceError> {
        let email = &request.email;

        info!("🔐 Attempting login for email: {email}");

        let method = Method::Post;
        let tracing_ctx = self.start_tracing(
            "Login",
            vec![
                KeyValue::new("component", "auth"),
                KeyValue::new("user.email", email.to_string()),
            ],
        );

        // Unknown email and wrong password answer identically so the
        // endpoint cannot be used to enumerate accounts.
        let user = match self.query.find_by_email(email).await {
            Ok(Some(user)) => user,
            Ok(None) => {
                error!("❌ User not found: {email}");
                self.complete_tracing_error(&tracing_ctx, method, "Invalid credentials")
                    .await;
                return Err(ServiceError::InvalidCredentials);
            }
            Err(e) => {
                error!("❌ Failed to query user: {:?}", e);
                self.complete_tracing_error(&tracing_ctx, method.clone(), "Database error")
                    .await;
                return Err(ServiceError::Repo(e));
            }
        };

        if self
            .hash
            .compare_password(&user.password_hash, &request.password)
            .await
            .is_err()
        {
            error!("❌ Invalid password for user: {email}");
            self.complete_tracing_error(&tracing_ctx, method, "Invalid credentials")
                .await;
            return Err(ServiceError::InvalidCredentials);
        }

        if !user.verified {
            error!("❌ Account not verified: {email}");
            self.complete_tracing_error(&tracing_ctx, method, "Account not verified")
                .await;
            return Err(ServiceError::NotVerified);
        }

        let access_token = match self.jwt.generate_token(&user.email) {
            Ok(token) => token,
            Err(e) => {
                error!("❌ Failed to generate access token: {:?}", e);
                self.complete_tracing_error(
                    &tracing_ctx,
                    method.clone(),
                    "Failed to generate access token",
                )
                .await;
                return Err(e);
            }
        };

        info!("✅ Login successful for email: {email}");

        self.complete_tracing_success(&tracing_ctx, method, "Login successful")
            .await;

        Ok(ApiResponse {
            status: "success".to_string(),
            message: "Login successful".to_string(),
            data: TokenResponse::bearer(access_token),
        })
    }
}
