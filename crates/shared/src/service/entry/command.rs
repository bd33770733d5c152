use crate::{
    abstract_trait::{
        DynEntryCommandRepository, DynEntryPolicy, DynEntryQueryRepository,
        EntryCommandServiceTrait,
    },
    domain::{
        requests::{CreateEntryRequest, NewEntry, UpdateEntryRequest},
        responses::{ApiResponse, DeleteEntryResponse, EntryResponse},
    },
    errors::{RepositoryError, ServiceError},
    model::Entry as EntryModel,
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
use uuid::Uuid;

pub struct EntryCommandService {
    query: DynEntryQueryRepository,
    command: DynEntryCommandRepository,
    policy: DynEntryPolicy,
    metrics: Arc<Mutex<Metrics>>,
}

pub struct EntryCommandServiceDeps {
    pub query: DynEntryQueryRepository,
    pub command: DynEntryCommandRepository,
    pub policy: DynEntryPolicy,
    pub metrics: Arc<Mutex<Metrics>>,
    pub registry: Arc<Mutex<Registry>>,
}

impl EntryCommandService {
    pub async fn new(deps: EntryCommandServiceDeps) -> Self {
        let EntryCommandServiceDeps {
            query,
            command,
            policy,
            metrics,
            registry,
        } = deps;

        registry.lock().await.register(
            "entry_command_service_request_counter",
            "Total number of requests to the EntryCommandService",
            metrics.lock().await.request_counter.clone(),
        );
        registry.lock().await.register(
            "entry_command_service_request_duration",
            "Histogram of request durations for the EntryCommandService",
            metrics.lock().await.request_duration.clone(),
        );

        Self {
            query,
            command,
            policy,
            metrics,
        }
    }

    fn get_tracer(&self) -> BoxedTracer {
        global::tracer("entry-command-service")
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

    /// Copies the fields present in the request onto the stored row.
    /// Absent fields keep their value; photo lists and service details
    /// are re-serialized to their text form.
    fn apply_update(
        entry: &mut EntryModel,
        req: &UpdateEntryRequest,
    ) -> Result<(), ServiceError> {
        if let Some(v) = &req.customer_name {
            entry.customer_name = v.clone();
        }
        if let Some(v) = &req.customer_phone {
            entry.customer_phone = v.clone();
        }
        if let Some(v) = &req.customer_email {
            entry.customer_email = v.clone();
        }
        if let Some(v) = &req.delivery_address {
            entry.delivery_address = v.clone();
        }
        if let Some(v) = &req.item_description {
            entry.item_description = v.clone();
        }
        if let Some(v) = &req.shoe_condition {
            entry.shoe_condition = v.clone();
        }
        if let Some(v) = &req.shoe_service {
            entry.shoe_service = Some(v.clone());
        }
        if let Some(v) = req.waiver_signed {
            entry.waiver_signed = v;
        }
        if let Some(v) = &req.waiver_url {
            entry.waiver_url = Some(v.clone());
        }
        if let Some(v) = &req.before_photos {
            entry.before_photos = serde_json::to_string(v)
                .map_err(|e| ServiceError::Internal(format!("Failed to serialize photos: {e}")))?;
        }
        if let Some(v) = &req.assigned_to {
            entry.assigned_to = Some(v.clone());
        }
        if let Some(v) = req.needs_reglue {
            entry.needs_reglue = Some(v);
        }
        if let Some(v) = req.needs_paint {
            entry.needs_paint = Some(v);
        }
        if let Some(v) = &req.status {
            entry.status = v.clone();
        }
        if let Some(v) = &req.service_details {
            entry.service_details = Some(serde_json::to_string(v).map_err(|e| {
                ServiceError::Internal(format!("Failed to serialize service details: {e}"))
            })?);
        }
        if let Some(v) = &req.after_photos {
            entry.after_photos = serde_json::to_string(v)
                .map_err(|e| ServiceError::Internal(format!("Failed to serialize photos: {e}")))?;
        }
        if let Some(v) = req.billing {
            entry.billing = Some(v);
        }
        if let Some(v) = req.additional_billing {
            entry.additional_billing = Some(v);
        }
        if let Some(v) = &req.delivery_option {
            entry.delivery_option = Some(v.clone());
        }
        if let Some(v) = &req.marked_as {
            entry.marked_as = Some(v.clone());
        }

        Ok(())
    }
}

#[async_trait]
impl EntryCommandServiceTrait for EntryCommandService {
    async fn create(
        &self,
        req: &CreateEntryRequest,
    ) -> Result<ApiResponse<EntryResponse>, ServiceError> {
        info!("🛠️ Creating entry for customer: {}", req.customer_name);

        let method = Method::Post;
        let tracing_ctx = self.start_tracing(
            "CreateEntry",
            vec![
                KeyValue::new("component", "entry"),
                KeyValue::new("entry.customer", req.customer_name.clone()),
            ],
        );

        let before_photos = serde_json::to_string(&req.before_photos)
            .map_err(|e| ServiceError::Internal(format!("Failed to serialize photos: {e}")))?;
        let after_photos = serde_json::to_string(&req.after_photos)
            .map_err(|e| ServiceError::Internal(format!("Failed to serialize photos: {e}")))?;
        let service_details = match &req.service_details {
            Some(details) => Some(serde_json::to_string(details).map_err(|e| {
                ServiceError::Internal(format!("Failed to serialize service details: {e}"))
            })?),
            None => None,
        };

        let row = NewEntry {
            public_id: Uuid::new_v4().to_string(),
            customer_name: req.customer_name.clone(),
            customer_phone: req.customer_phone.clone(),
            customer_email: req.customer_email.clone(),
            delivery_address: req.delivery_address.clone(),
            item_description: req.item_description.clone(),
            shoe_condition: req.shoe_condition.clone(),
            shoe_service: req.shoe_service.clone(),
            waiver_signed: req.waiver_signed,
            waiver_url: req.waiver_url.clone(),
            before_photos,
            assigned_to: req.assigned_to.clone(),
            needs_reglue: req.needs_reglue,
            needs_paint: req.needs_paint,
            status: req.status.clone(),
            service_details,
            after_photos,
            billing: req.billing,
            additional_billing: req.additional_billing,
            delivery_option: req.delivery_option.clone(),
            marked_as: req.marked_as.clone(),
        };

        let entry = match self.command.create(&row).await {
            Ok(entry) => entry,
            Err(e) => {
                error!("❌ Failed to create entry: {:?}", e);
                self.complete_tracing_error(&tracing_ctx, method.clone(), "Failed to create entry")
                    .await;
                return Err(ServiceError::Repo(e));
            }
        };

        info!("✅ Entry created: {}", entry.public_id);

        self.complete_tracing_success(&tracing_ctx, method, "Entry created")
            .await;

        Ok(ApiResponse {
            status: "success".to_string(),
            message: "Entry created successfully".to_string(),
            data: EntryResponse::from(entry),
        })
    }

    async fn update(
        &self,
        actor_email: &str,
        public_id: &str,
        req: &UpdateEntryRequest,
    ) -> Result<ApiResponse<EntryResponse>, ServiceError> {
        info!("🛠️ Updating entry: {public_id}");

        let method = Method::Patch;
        let tracing_ctx = self.start_tracing(
            "UpdateEntry",
            vec![
                KeyValue::new("component", "entry"),
                KeyValue::new("entry.public_id", public_id.to_string()),
            ],
        );

        let mut entry = match self.query.find_by_public_id(public_id).await {
            Ok(Some(entry)) => entry,
            Ok(None) => {
                error!("❌ Entry not found: {public_id}");
                self.complete_tracing_error(&tracing_ctx, method, "Entry not found")
                    .await;
                return Err(ServiceError::Repo(RepositoryError::NotFound));
            }
            Err(e) => {
                error!("❌ Failed to fetch entry: {:?}", e);
                self.complete_tracing_error(&tracing_ctx, method.clone(), "Database error")
                    .await;
                return Err(ServiceError::Repo(e));
            }
        };

        if let Err(e) = self.policy.authorize_mutation(actor_email, &entry).await {
            error!("❌ Mutation denied for {actor_email} on {public_id}");
            self.complete_tracing_error(&tracing_ctx, method, "Mutation denied")
                .await;
            return Err(e);
        }

        Self::apply_update(&mut entry, req)?;

        let updated = match self.command.update(&entry).await {
            Ok(updated) => updated,
            Err(RepositoryError::NotFound) => {
                error!("❌ Entry vanished during update: {public_id}");
                self.complete_tracing_error(&tracing_ctx, method, "Entry not found")
                    .await;
                return Err(ServiceError::Repo(RepositoryError::NotFound));
            }
            Err(e) => {
                error!("❌ Failed to update entry: {:?}", e);
                self.complete_tracing_error(&tracing_ctx, method.clone(), "Failed to update entry")
                    .await;
                return Err(ServiceError::Repo(e));
            }
        };

        info!("✅ Entry updated: {public_id}");

        self.complete_tracing_success(&tracing_ctx, method, "Entry updated")
            .await;

        Ok(ApiResponse {
            status: "success".to_string(),
            message: "Entry updated successfully".to_string(),
            data: EntryResponse::from(updated),
        })
    }

    async fn delete(
        &self,
        actor_email: &str,
        public_id: &str,
    ) -> Result<ApiResponse<DeleteEntryResponse>, ServiceError> {
        info!("🗑️ Deleting entry: {public_id}");

        let method = Method::Delete;
        let tracing_ctx = self.start_tracing(
            "DeleteEntry",
            vec![
                KeyValue::new("component", "entry"),
                KeyValue::new("entry.public_id", public_id.to_string()),
            ],
        );

        let entry = match self.query.find_by_public_id(public_id).await {
            Ok(Some(entry)) => entry,
            Ok(None) => {
                error!("❌ Entry not found: {public_id}");
                self.complete_tracing_error(&tracing_ctx, method, "Entry not found")
                    .await;
                return Err(ServiceError::Repo(RepositoryError::NotFound));
            }
            Err(e) => {
                error!("❌ Failed to fetch entry: {:?}", e);
                self.complete_tracing_error(&tracing_ctx, method.clone(), "Database error")
                    .await;
                return Err(ServiceError::Repo(e));
            }
        };

        if let Err(e) = self.policy.authorize_mutation(actor_email, &entry).await {
            error!("❌ Mutation denied for {actor_email} on {public_id}");
            self.complete_tracing_error(&tracing_ctx, method, "Mutation denied")
                .await;
            return Err(e);
        }

        let deleted = match self.command.delete(public_id).await {
            Ok(deleted) => deleted,
            Err(e) => {
                error!("❌ Failed to delete entry: {:?}", e);
                self.complete_tracing_error(&tracing_ctx, method.clone(), "Failed to delete entry")
                    .await;
                return Err(ServiceError::Repo(e));
            }
        };

        if !deleted {
            error!("❌ Entry vanished during delete: {public_id}");
            self.complete_tracing_error(&tracing_ctx, method, "Entry not found")
                .await;
            return Err(ServiceError::Repo(RepositoryError::NotFound));
        }

        info!("✅ Entry deleted: {public_id}");

        self.complete_tracing_success(&tracing_ctx, method, "Entry deleted")
            .await;

        Ok(ApiResponse {
            status: "success".to_string(),
            message: "Entry deleted successfully".to_string(),
            data: DeleteEntryResponse { deleted: true },
        })
    }
}
