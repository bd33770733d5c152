use crate::{
    abstract_trait::{DynUserCommandRepository, DynUserQueryRepository, VerifyServiceTrait},
    domain::{
        requests::VerifyEmailParams,
        responses::{ApiResponse, VerifiedResponse},
    },
    errors::{RepositoryError, ServiceError},
    utils::{Method, Metrics, Status as StatusUtils, TracingContext},
};
use async_trait::async_trait;
use chrono::Utc;
use opentelemetry::{
    Context, KeyValue,
    global::{self, BoxedTracer},
    trace::{Span, SpanKind, TraceContextExt, Tracer},
};
use prometheus_client::registry::Registry;
use std::sync::Arc;
use tokio::{sync::Mutex, time::Instant};
use tracing::{error, info};

pub struct VerifyService {
    query: DynUserQueryRepository,
    command: DynUserCommandRepository,
    metrics: Arc<Mutex<Metrics>>,
}

pub struct VerifyServiceDeps {
    pub query: DynUserQueryRepository,
    pub command: DynUserCommandRepository,
    pub metrics: Arc<Mutex<Metrics>>,
    pub registry: Arc<Mutex<Registry>>,
}

impl VerifyService {
    pub async fn new(deps: VerifyServiceDeps) -> Self {
        let VerifyServiceDeps {
            query,
            command,
            metrics,
            registry,
        } = deps;

        registry.lock().await.register(
            "verify_service_request_counter",
            "Total number of requests to the VerifyService",
            metrics.lock().await.request_counter.clone(),
        );
        registry.lock().await.register(
            "verify_service_request_duration",
            "Histogram of request durations for the VerifyService",
            metrics.lock().await.request_duration.clone(),
        );

        Self {
            query,
            command,
            metrics,
        }
    }

    fn get_tracer(&self) -> BoxedTracer {
        global::tracer("verify-service")
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
impl VerifyServiceTrait for VerifyService {
    async fn redeem(
        &self,
        params: &VerifyEmailParams,
    ) -> Result<ApiResponse<VerifiedResponse>, ServiceError> {
        info!("✉️ Redeeming verification token for: {}", params.email);

        let method = Method::Get;
        let tracing_ctx = self.start_tracing(
            "VerifyEmail",
            vec![
                KeyValue::new("component", "auth"),
                KeyValue::new("user.email", params.email.clone()),
            ],
        );

        let user = match self.query.find_by_email(&params.email).await {
            Ok(Some(user)) => user,
            Ok(None) => {
                error!("❌ No account for email: {}", params.email);
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

        // A verified account has no pending token, so re-redemption lands
        // here as well.
        let stored = match user.pending_verification_token.as_deref() {
            Some(stored) if stored == params.token => stored,
            _ => {
                error!("❌ Verification token mismatch for: {}", params.email);
                self.complete_tracing_error(&tracing_ctx, method, "Invalid verification token")
                    .await;
                return Err(ServiceError::InvalidVerification);
            }
        };

        if let Some(expires_at) = user.verification_expires_at
            && expires_at < Utc::now().naive_utc()
        {
            error!("❌ Verification token expired for: {}", params.email);
            self.complete_tracing_error(&tracing_ctx, method, "Verification token expired")
                .await;
            return Err(ServiceError::VerificationExpired);
        }

        match self.command.mark_verified(&params.email, stored).await {
            Ok(Some(_)) => {}
            // The compare-and-set lost a race with another redemption or a
            // re-issue; the stored token is gone.
            Ok(None) => {
                error!("❌ Verification token no longer valid for: {}", params.email);
                self.complete_tracing_error(&tracing_ctx, method, "Invalid verification token")
                    .await;
                return Err(ServiceError::InvalidVerification);
            }
            Err(e) => {
                error!("❌ Failed to mark user verified: {:?}", e);
                self.complete_tracing_error(&tracing_ctx, method.clone(), "Database error")
                    .await;
                return Err(ServiceError::Repo(e));
            }
        }

        info!("✅ Email verified: {}", params.email);

        self.complete_tracing_success(&tracing_ctx, method, "Email verified")
            .await;

        Ok(ApiResponse {
            status: "success".to_string(),
            message: "Email verified successfully".to_string(),
            data: VerifiedResponse { verified: true },
        })
    }
}
