use std::sync::{Mutex, OnceLock};

use anyhow::Result;
use opentelemetry::{Context, global};
use opentelemetry_otlp::{LogExporter, MetricExporter, SpanExporter, WithExportConfig};
use opentelemetry_sdk::{
    Resource, logs::SdkLoggerProvider, metrics::SdkMeterProvider, trace::SdkTracerProvider,
};
use tokio::time::Instant;

pub struct TracingContext {
    pub cx: Context,
    pub start_time: Instant,
}

/// Builds and owns the OTLP providers so `shutdown` can flush the
/// instances that actually exported data.
pub struct Telemetry {
    service_name: String,
    otel_endpoint: String,
    tracer_provider: Mutex<Option<SdkTracerProvider>>,
    meter_provider: Mutex<Option<SdkMeterProvider>>,
    logger_provider: Mutex<Option<SdkLoggerProvider>>,
}

impl Telemetry {
    pub fn new(service_name: impl Into<String>, otel_endpoint: String) -> Self {
        Self {
            service_name: service_name.into(),
            otel_endpoint,
            tracer_provider: Mutex::new(None),
            meter_provider: Mutex::new(None),
            logger_provider: Mutex::new(None),
        }
    }

    fn get_resource(&self) -> Resource {
        static RESOURCE: OnceLock<Resource> = OnceLock::new();
        RESOURCE
            .get_or_init(|| {
                Resource::builder()
                    .with_service_name(self.service_name.clone())
                    .build()
            })
            .clone()
    }

    pub fn init_tracer(&self) -> SdkTracerProvider {
        let exporter = SpanExporter::builder()
            .with_tonic()
            .with_endpoint(self.otel_endpoint.clone())
            .build()
            .expect("Failed to create span exporter");

        let provider = SdkTracerProvider::builder()
            .with_resource(self.get_resource())
            .with_batch_exporter(exporter)
            .build();

        global::set_tracer_provider(provider.clone());

        if let Ok(mut slot) = self.tracer_provider.lock() {
            *slot = Some(provider.clone());
        }

        provider
    }

    pub fn init_meter(&self) -> SdkMeterProvider {
        let exporter = MetricExporter::builder()
            .with_tonic()
            .with_endpoint(self.otel_endpoint.clone())
            .build()
            .expect("Failed to create metric exporter");

        let provider = SdkMeterProvider::builder()
            .with_resource(self.get_resource())
            .with_periodic_exporter(exporter)
            .build();

        global::set_meter_provider(provider.clone());

        if let Ok(mut slot) = self.meter_provider.lock() {
            *slot = Some(provider.clone());
        }

        provider
    }

    pub fn init_logger(&self) -> SdkLoggerProvider {
        let exporter = LogExporter::builder()
            .with_tonic()
            .with_endpoint(self.otel_endpoint.clone())
            .build()
            .expect("Failed to create log exporter");

        let provider = SdkLoggerProvider::builder()
            .with_resource(self.get_resource())
            .with_batch_exporter(exporter)
            .build();

        if let Ok(mut slot) = self.logger_provider.lock() {
            *slot = Some(provider.clone());
        }

        provider
    }

    pub async fn shutdown(self) -> Result<()> {
        let mut errors = Vec::new();

        if let Some(provider) = self.tracer_provider.lock().ok().and_then(|mut p| p.take())
            && let Err(e) = provider.shutdown()
        {
            errors.push(format!("tracer provider: {e}"));
        }

        if let Some(provider) = self.meter_provider.lock().ok().and_then(|mut p| p.take())
            && let Err(e) = provider.shutdown()
        {
            errors.push(format!("meter provider: {e}"));
        }

        if let Some(provider) = self.logger_provider.lock().ok().and_then(|mut p| p.take())
            && let Err(e) = provider.shutdown()
        {
            errors.push(format!("logger provider: {e}"));
        }

        if !errors.is_empty() {
            anyhow::bail!("Failed to shutdown providers:\n{}", errors.join("\n"));
        }

        Ok(())
    }
}
