use crate::{
    abstract_trait::{DynUserCommandRepository, DynUserQueryRepository, IdentityServiceTrait},
    domain::{
        requests::UpdateProfileRequest,
        responses::{ApiResponse, UserResponse},
    },
    errors::{RepositoryError, ServiceError},
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

pub struct IdentityService {
    query: DynUserQueryRepository,
    command: DynUserCommandRepository,
    metrics: Arc<Mutex<Metrics>>,
}

pub struct IdentityServiceDeps {
    pub query: DynUserQueryRepository,
    pub command: DynUserCommandRepository,
    pub metrics: Arc<Mutex<Metrics>>,
    pub registry: Arc<Mutex<Registry>>,
}

impl IdentityService {
    pub async fn new(deps: IdentityServiceDeps) -> Self {
        let IdentityServiceDeps {
            query,
            command,
            metrics,
            registry,
        } = deps;

        registry.lock().await.register(
            "identity_service_request_counter",
            "Total number of requests to the IdentityService",
            metrics.lock().await.request_counter.clone(),
        );
        registry.lock().await.register(
            "identity_service_request_duration",
            "Histogram of request durations for the IdentityService",
            metrics.lock().await.request_duration.clone(),
        );

        Self {
            query,
            command,
            metrics,
        }
    }

    fn get_tracer(&self) -> BoxedTracer {
        global::tracer("identity-service")
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
impl IdentityServiceTrait for IdentityService {
    async fn get_me(&self, email: &str) -> Result<ApiResponse<UserResponse>, ServiceError> {
        info!("👤 Fetching profile for: {email}");

        let method = Method::Get;
        let tracing_ctx = self.start_tracing(
            "GetProfile",
            vec![
                KeyValue::new("component", "auth"),
                KeyValue::new("user.email", email.to_string()),
            ],
        );

        let user = match self.query.find_by_email(email).await {
            Ok(Some(user)) => user,
            // The gate resolved this email from a valid token, so the row
            // must have been deleted since issuance.
            Ok(None) => {
                error!("❌ Authenticated user missing from store: {email}");
                self.complete_tracing_error(&tracing_ctx, method, "User not found")
                    .await;
                return Err(ServiceError::Repo(RepositoryError::NotFound));
            }
            Err(e) => {
                error!("❌ Failed to query user: {:?}", e);
                self.complete_tracing_error(&tracing_ctx, method.clone(), "Database error")
                    .await;
                return Err(ServiceError::Repo(e));
            }
        };

        self.complete_tracing_success(&tracing_ctx, method, "Profile fetched")
            .await;

        Ok(ApiResponse {
            status: "success".to_string(),
            message: "Profile fetched successfully".to_string(),
            data: UserResponse::from(user),
        })
    }

    async fn update_me(
        &self,
        email: &str,
        req: &UpdateProfileRequest,
    ) -> Result<ApiResponse<UserResponse>, ServiceError> {
        info!("📝 Updating profile for: {email}");

        let method = Method::Patch;
        let tracing_ctx = self.start_tracing(
            "UpdateProfile",
            vec![
                KeyValue::new("component", "auth"),
                KeyValue::new("user.email", email.to_string()),
            ],
        );

        let user = match self.command.update_profile(email, req).await {
            Ok(user) => user,
            Err(RepositoryError::NotFound) => {
                error!("❌ Authenticated user missing from store: {email}");
                self.complete_tracing_error(&tracing_ctx, method, "User not found")
                    .await;
                return Err(ServiceError::Repo(RepositoryError::NotFound));
            }
            Err(e) => {
                error!("❌ Failed to update profile: {:?}", e);
                self.complete_tracing_error(&tracing_ctx, method.clone(), "Database error")
                    .await;
                return Err(ServiceError::Repo(e));
            }
        };

        info!("✅ Profile updated for: {email}");

        self.complete_tracing_success(&tracing_ctx, method, "Profile updated")
            .await;

        Ok(ApiResponse {
            status: "success".to_string(),
            message: "Profile updated successfully".to_string(),
            data: UserResponse::from(user),
        })
    }
}
