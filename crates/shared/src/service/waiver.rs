use crate::{
    abstract_trait::{DynStorageService, WaiverServiceTrait},
    domain::responses::{ApiResponse, WaiverUploadResponse},
    errors::{ServiceError, StorageError},
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

// 7 days, matching the retention promised on the upload receipt.
const SIGNED_URL_TTL_SECS: i64 = 604_800;

pub struct WaiverService {
    storage: DynStorageService,
    metrics: Arc<Mutex<Metrics>>,
}

impl WaiverService {
    pub async fn new(
        storage: DynStorageService,
        metrics: Arc<Mutex<Metrics>>,
        registry: Arc<Mutex<Registry>>,
    ) -> Self {
        registry.lock().await.register(
            "waiver_service_request_counter",
            "Total number of requests to the WaiverService",
            metrics.lock().await.request_counter.clone(),
        );
        registry.lock().await.register(
            "waiver_service_request_duration",
            "Histogram of request durations for the WaiverService",
            metrics.lock().await.request_duration.clone(),
        );

        Self { storage, metrics }
    }

    fn get_tracer(&self) -> BoxedTracer {
        global::tracer("waiver-service")
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

    fn is_pdf(file_name: Option<&str>, content_type: Option<&str>) -> bool {
        if content_type.is_some_and(|ct| ct.eq_ignore_ascii_case("application/pdf")) {
            return true;
        }
        file_name.is_some_and(|name| name.to_ascii_lowercase().ends_with(".pdf"))
    }
}

#[async_trait]
impl WaiverServiceTrait for WaiverService {
    async fn upload_waiver(
        &self,
        file_name: Option<&str>,
        content_type: Option<&str>,
        bytes: Vec<u8>,
    ) -> Result<ApiResponse<WaiverUploadResponse>, ServiceError> {
        info!(
            "📄 Uploading waiver | file: {:?} size: {} bytes",
            file_name,
            bytes.len()
        );

        let method = Method::Post;
        let tracing_ctx = self.start_tracing(
            "UploadWaiver",
            vec![
                KeyValue::new("component", "waiver"),
                KeyValue::new("upload.size_bytes", bytes.len().to_string()),
            ],
        );

        if !Self::is_pdf(file_name, content_type) {
            error!(
                "❌ Rejected waiver upload | file: {:?} content_type: {:?}",
                file_name, content_type
            );
            self.complete_tracing_error(&tracing_ctx, method, "Not a PDF")
                .await;
            return Err(ServiceError::Validation(vec![
                "Waiver must be a PDF file".to_string(),
            ]));
        }

        if bytes.is_empty() {
            error!("❌ Rejected empty waiver upload | file: {:?}", file_name);
            self.complete_tracing_error(&tracing_ctx, method, "Empty file")
                .await;
            return Err(ServiceError::Validation(vec![
                "Waiver file is empty".to_string(),
            ]));
        }

        let path = format!("waivers/{}.pdf", Uuid::new_v4());

        match self
            .storage
            .upload(&path, "application/pdf", bytes.clone())
            .await
        {
            Ok(()) => {}
            // First upload against a fresh project: create the bucket and
            // retry exactly once.
            Err(StorageError::BucketNotFound) => {
                info!("🪣 Waiver bucket missing, creating it and retrying");

                if let Err(e) = self.storage.create_bucket().await {
                    error!("❌ Failed to create waiver bucket: {:?}", e);
                    self.complete_tracing_error(&tracing_ctx, method, "Storage unavailable")
                        .await;
                    return Err(ServiceError::Storage(e));
                }

                if let Err(e) = self.storage.upload(&path, "application/pdf", bytes).await {
                    error!("❌ Waiver upload failed after bucket creation: {:?}", e);
                    self.complete_tracing_error(&tracing_ctx, method, "Storage unavailable")
                        .await;
                    return Err(ServiceError::Storage(e));
                }
            }
            Err(e) => {
                error!("❌ Waiver upload failed: {:?}", e);
                self.complete_tracing_error(&tracing_ctx, method.clone(), "Storage unavailable")
                    .await;
                return Err(ServiceError::Storage(e));
            }
        }

        let url = match self
            .storage
            .create_signed_url(&path, SIGNED_URL_TTL_SECS)
            .await
        {
            Ok(url) => url,
            Err(e) => {
                error!("❌ Failed to sign waiver URL: {:?}", e);
                self.complete_tracing_error(&tracing_ctx, method.clone(), "Storage unavailable")
                    .await;
                return Err(ServiceError::Storage(e));
            }
        };

        info!("✅ Waiver stored at: {path}");

        self.complete_tracing_success(&tracing_ctx, method, "Waiver uploaded")
            .await;

        Ok(ApiResponse {
            status: "success".to_string(),
            message: "Waiver uploaded successfully".to_string(),
            data: WaiverUploadResponse {
                url,
                path,
                expires_in: SIGNED_URL_TTL_SECS,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::abstract_trait::StorageServiceTrait;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    #[derive(Default)]
    struct FakeStorage {
        bucket_exists: AtomicBool,
        uploads: Mutex<Vec<String>>,
        upload_attempts: AtomicUsize,
    }

    impl FakeStorage {
        fn with_bucket() -> Self {
            let storage = Self::default();
            storage.bucket_exists.store(true, Ordering::SeqCst);
            storage
        }
    }

    #[async_trait]
    impl StorageServiceTrait for FakeStorage {
        async fn upload(
            &self,
            path: &str,
            _content_type: &str,
            _bytes: Vec<u8>,
        ) -> Result<(), StorageError> {
            self.upload_attempts.fetch_add(1, Ordering::SeqCst);
            if !self.bucket_exists.load(Ordering::SeqCst) {
                return Err(StorageError::BucketNotFound);
            }
            self.uploads.lock().await.push(path.to_string());
            Ok(())
        }

        async fn create_bucket(&self) -> Result<(), StorageError> {
            self.bucket_exists.store(true, Ordering::SeqCst);
            Ok(())
        }

        async fn create_signed_url(
            &self,
            path: &str,
            expires_in_secs: i64,
        ) -> Result<String, StorageError> {
            Ok(format!("https://storage.test/{path}?expires={expires_in_secs}"))
        }
    }

    async fn service(storage: Arc<FakeStorage>) -> WaiverService {
        let metrics = Arc::new(Mutex::new(Metrics::new()));
        let registry = Arc::new(Mutex::new(Registry::default()));
        WaiverService::new(storage as DynStorageService, metrics, registry).await
    }

    #[tokio::test]
    async fn non_pdf_upload_is_rejected_before_storage() {
        let storage = Arc::new(FakeStorage::with_bucket());
        let svc = service(storage.clone()).await;

        let err = svc
            .upload_waiver(Some("notes.txt"), Some("text/plain"), b"hello".to_vec())
            .await
            .unwrap_err();

        assert!(matches!(err, ServiceError::Validation(_)));
        assert_eq!(storage.upload_attempts.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn empty_file_is_rejected() {
        let storage = Arc::new(FakeStorage::with_bucket());
        let svc = service(storage.clone()).await;

        let err = svc
            .upload_waiver(Some("waiver.pdf"), Some("application/pdf"), Vec::new())
            .await
            .unwrap_err();

        assert!(matches!(err, ServiceError::Validation(_)));
        assert_eq!(storage.upload_attempts.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn missing_bucket_is_created_and_upload_retried_once() {
        let storage = Arc::new(FakeStorage::default());
        let svc = service(storage.clone()).await;

        let response = svc
            .upload_waiver(Some("waiver.pdf"), Some("application/pdf"), b"%PDF-1.4".to_vec())
            .await
            .unwrap();

        assert_eq!(storage.upload_attempts.load(Ordering::SeqCst), 2);
        assert!(storage.bucket_exists.load(Ordering::SeqCst));

        let uploads = storage.uploads.lock().await;
        assert_eq!(uploads.len(), 1);
        assert!(uploads[0].starts_with("waivers/"));
        assert!(uploads[0].ends_with(".pdf"));

        assert_eq!(response.data.path, uploads[0]);
        assert!(response.data.url.contains(&uploads[0]));
        assert_eq!(response.data.expires_in, SIGNED_URL_TTL_SECS);
    }

    #[tokio::test]
    async fn pdf_extension_alone_is_accepted() {
        let storage = Arc::new(FakeStorage::with_bucket());
        let svc = service(storage.clone()).await;

        let response = svc
            .upload_waiver(Some("Signed-Waiver.PDF"), None, b"%PDF-1.4".to_vec())
            .await
            .unwrap();

        assert_eq!(response.status, "success");
        assert_eq!(storage.upload_attempts.load(Ordering::SeqCst), 1);
    }
}
