use crate::{
    abstract_trait::{
        DynEmailService, DynHashing, DynUserCommandRepository, DynUserQueryRepository,
        RegisterServiceTrait,
    },
    config::VerificationConfig,
    domain::{
        requests::{CreateUserRecord, EmailRequest, RegisterRequest},
        responses::{ApiResponse, UserResponse},
    },
    errors::{RepositoryError, ServiceError},
    utils::{
        EmailTemplateData, Method, Metrics, Status as StatusUtils, TracingContext,
        generate_random_string,
    },
};
use async_trait::async_trait;
use chrono::{Duration, Utc};
use opentelemetry::{
    Context, KeyValue,
    global::{self, BoxedTracer},
    trace::{Span, SpanKind, TraceContextExt, Tracer},
};
use prometheus_client::registry::Registry;
use std::sync::Arc;
use tokio::{sync::Mutex, time::Instant};
use tracing::{error, info, warn};

pub struct RegisterService {
    query: DynUserQueryRepository,
    command: DynUserCommandRepository,
    hash: DynHashing,
    mailer: DynEmailService,
    verification: VerificationConfig,
    metrics: Arc<Mutex<Metrics>>,
}

pub struct RegisterServiceDeps {
    pub query: DynUserQueryRepository,
    pub command: DynUserCommandRepository,
    pub hash: DynHashing,
    pub mailer: DynEmailService,
    pub verification: VerificationConfig,
    pub metrics: Arc<Mutex<Metrics>>,
    pub registry: Arc<Mutex<Registry>>,
}

impl RegisterService {
    pub async fn new(deps: RegisterServiceDeps) -> Self {
        let RegisterServiceDeps {
            query,
            command,
            hash,
            mailer,
            verification,
            metrics,
            registry,
        } = deps;

        registry.lock().await.register(
            "register_service_request_counter",
            "Total number of requests to the RegisterService",
            metrics.lock().await.request_counter.clone(),
        );
        registry.lock().await.register(
            "register_service_request_duration",
            "Histogram of request durations for the RegisterService",
            metrics.lock().await.request_duration.clone(),
        );

        Self {
            query,
            command,
            hash,
            mailer,
            verification,
            metrics,
        }
    }

    fn get_tracer(&self) -> BoxedTracer {
        global::tracer("register-service")
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

    fn verification_link(&self, email: &str, token: &str) -> String {
        format!(
            "{}/auth/verify?token={}&email={}",
            self.verification.public_url.trim_end_matches('/'),
            token,
            urlencoding::encode(email)
        )
    }
}

#[async_trait]
impl RegisterServiceTrait for RegisterService {
    async fn register(
        &self,
        req: &RegisterRequest,
    ) -> Result<ApiResponse<UserResponse>, ServiceError> {
        info!(
            "📝 [REGISTER] Starting user registration | Email: {}",
            req.email
        );

        let method = Method::Post;
        let tracing_ctx = self.start_tracing(
            "RegisterUser",
            vec![
                KeyValue::new("component", "auth"),
                KeyValue::new("user.email", req.email.clone()),
            ],
        );

        let existing_user = match self.query.find_by_email(&req.email).await {
            Ok(user) => user,
            Err(e) => {
                error!("❌ Failed to check email in DB: {:?}", e);
                self.complete_tracing_error(&tracing_ctx, method.clone(), "Database error")
                    .await;
                return Err(ServiceError::Repo(e));
            }
        };

        if existing_user.is_some() {
            error!("❌ [REGISTER] Email already taken | Email: {}", req.email);
            self.complete_tracing_error(&tracing_ctx, method, "Email already exists")
                .await;
            return Err(ServiceError::DuplicateEmail);
        }

        let password_hash = match self.hash.hash_password(&req.password).await {
            Ok(hash) => hash,
            Err(e) => {
                error!("❌ Failed to hash password: {:?}", e);
                self.complete_tracing_error(&tracing_ctx, method.clone(), "Failed to hash password")
                    .await;
                return Err(e);
            }
        };

        let token = match generate_random_string(32) {
            Ok(token) => token,
            Err(e) => {
                error!("❌ Failed to generate verification token: {:?}", e);
                self.complete_tracing_error(
                    &tracing_ctx,
                    method.clone(),
                    "Failed to generate token",
                )
                .await;
                return Err(ServiceError::Internal(
                    "Failed to generate verification token".into(),
                ));
            }
        };

        let expires_at =
            (Utc::now() + Duration::hours(self.verification.ttl_hours)).naive_utc();

        let record = CreateUserRecord {
            email: req.email.clone(),
            password_hash,
            first_name: req.first_name.clone(),
            last_name: req.last_name.clone(),
            phone: req.phone.clone(),
            pending_verification_token: token.clone(),
            verification_expires_at: expires_at,
        };

        let new_user = match self.command.create_user(&record).await {
            Ok(user) => user,
            // Losing the insert race to a concurrent registration is the
            // same outcome as the pre-check catching it.
            Err(RepositoryError::AlreadyExists(_)) => {
                error!("❌ [REGISTER] Email already taken | Email: {}", req.email);
                self.complete_tracing_error(&tracing_ctx, method, "Email already exists")
                    .await;
                return Err(ServiceError::DuplicateEmail);
            }
            Err(e) => {
                error!("❌ Failed to create user: {:?}", e);
                self.complete_tracing_error(&tracing_ctx, method.clone(), "Failed to create user")
                    .await;
                return Err(ServiceError::Repo(e));
            }
        };

        let template = EmailTemplateData {
            title: "Verify your email".to_string(),
            message: "Your account has been created. Confirm your email address to start using it."
                .to_string(),
            button: "Verify Email".to_string(),
            link: self.verification_link(&new_user.email, &token),
        };

        let email_request = EmailRequest {
            to: new_user.email.clone(),
            subject: "Verify your email".into(),
            data: template,
        };

        // Dispatch failures are logged and swallowed; the caller receives
        // the same acknowledgment either way.
        if let Err(e) = self.mailer.send(&email_request).await {
            warn!(
                "📧 Failed to send verification email to {}: {:?}",
                new_user.email, e
            );
        }

        let user_response = UserResponse::from(new_user);

        info!("✅ User registered successfully: {}", user_response.email);

        self.complete_tracing_success(&tracing_ctx, method, "User registered successfully")
            .await;

        Ok(ApiResponse {
            status: "success".to_string(),
            message: "User registered successfully. Check your email to verify the account."
                .to_string(),
            data: user_response,
        })
    }
}
