mod gracefullshutdown;
mod logs;
mod metrics;
mod otel;
mod random_string;
mod template;

pub use self::gracefullshutdown::shutdown_signal;
pub use self::logs::init_logger;
pub use self::metrics::{Method, Metrics, Status, SystemMetrics, run_metrics_collector};
pub use self::otel::{Telemetry, TracingContext};
pub use self::random_string::generate_random_string;
pub use self::template::{EmailTemplate, EmailTemplateData, render_email};
