use crate::{
    abstract_trait::{DynEntryQueryRepository, EntryQueryServiceTrait},
    domain::{
        requests::FindAllEntries,
        responses::{ApiResponsePagination, EntryResponse, Pagination},
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

pub struct EntryQueryService {
    query: DynEntryQueryRepository,
    metrics: Arc<Mutex<Metrics>>,
}

impl EntryQueryService {
    pub async fn new(
        query: DynEntryQueryRepository,
        metrics: Arc<Mutex<Metrics>>,
        registry: Arc<Mutex<Registry>>,
    ) -> Self {
        registry.lock().await.register(
            "entry_query_service_request_counter",
            "Total number of requests to the EntryQueryService",
            metrics.lock().await.request_counter.clone(),
        );
        registry.lock().await.register(
            "entry_query_service_request_duration",
            "Histogram of request durations for the EntryQueryService",
            metrics.lock().await.request_duration.clone(),
        );

        Self { query, metrics }
    }

    fn get_tracer(&self) -> BoxedTracer {
        global::tracer("entry-query-service")
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
impl EntryQueryServiceTrait for EntryQueryService {
    async fn find_all(
        &self,
        req: &FindAllEntries,
    ) -> Result<ApiResponsePagination<Vec<EntryResponse>>, ServiceError> {
        info!(
            "📄 Fetching entries | page: {} page_size: {} search: {:?}",
            req.page, req.page_size, req.search
        );

        let method = Method::Get;
        let tracing_ctx = self.start_tracing(
            "FindAllEntries",
            vec![
                KeyValue::new("component", "entry"),
                KeyValue::new("page", req.page.to_string()),
                KeyValue::new("page_size", req.page_size.to_string()),
            ],
        );

        let page = req.page.max(1);
        let page_size = req.page_size.max(1);

        let normalized = FindAllEntries {
            page,
            page_size,
            search: req.search.clone(),
        };

        let (entries, total) = match self.query.find_all(&normalized).await {
            Ok(result) => result,
            Err(e) => {
                error!("❌ Failed to fetch entries: {:?}", e);
                self.complete_tracing_error(&tracing_ctx, method.clone(), "Database error")
                    .await;
                return Err(ServiceError::Repo(e));
            }
        };

        let data: Vec<EntryResponse> = entries.into_iter().map(EntryResponse::from).collect();
        let total_pages = ((total - 1) / page_size as i64) + 1;

        let pagination = Pagination {
            page,
            page_size,
            total_items: total as i32,
            total_pages: total_pages as i32,
        };

        self.complete_tracing_success(&tracing_ctx, method, "Entries fetched")
            .await;

        Ok(ApiResponsePagination {
            status: "success".to_string(),
            message: "Entries fetched successfully".to_string(),
            data,
            pagination,
        })
    }
}
