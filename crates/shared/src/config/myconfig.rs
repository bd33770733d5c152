use anyhow::{Context, Result, anyhow};

#[derive(Debug, Clone)]
pub struct EmailConfig {
    pub smtp_host: String,
    pub smtp_port: u16,
    pub smtp_user: String,
    pub smtp_pass: String,
    pub smtp_from: String,
}

impl EmailConfig {
    pub fn init() -> Result<Self> {
        let smtp_host =
            std::env::var("SMTP_HOST").context("Missing environment variable: SMTP_HOST")?;
        let smtp_user = std::env::var("SMTP_USERNAME")
            .context("Missing environment variable: SMTP_USERNAME")?;
        let smtp_pass = std::env::var("SMTP_PASSWORD")
            .context("Missing environment variable: SMTP_PASSWORD")?;
        let smtp_from =
            std::env::var("SMTP_FROM").context("Missing environment variable: SMTP_FROM")?;
        let smtp_port: u16 = std::env::var("SMTP_PORT")
            .unwrap_or_else(|_| "587".to_string())
            .parse()
            .context("SMTP_PORT must be a valid u16 integer")?;

        Ok(Self {
            smtp_host,
            smtp_port,
            smtp_user,
            smtp_pass,
            smtp_from,
        })
    }
}

#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub url: String,
    pub service_key: String,
    pub bucket: String,
}

impl StorageConfig {
    pub fn init() -> Result<Self> {
        let url =
            std::env::var("SUPABASE_URL").context("Missing environment variable: SUPABASE_URL")?;
        let service_key = std::env::var("SUPABASE_SERVICE_KEY")
            .context("Missing environment variable: SUPABASE_SERVICE_KEY")?;
        let bucket =
            std::env::var("WAIVER_BUCKET").unwrap_or_else(|_| "waivers".to_string());

        Ok(Self {
            url,
            service_key,
            bucket,
        })
    }
}

/// Where verification links point and how long their tokens stay
/// redeemable.
#[derive(Debug, Clone)]
pub struct VerificationConfig {
    pub public_url: String,
    pub ttl_hours: i64,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub access_token_ttl_minutes: i64,
    pub run_migrations: bool,
    pub port: u16,
    pub cors_allowed_origins: Vec<String>,
    pub otel_endpoint: String,
    pub verification: VerificationConfig,
    pub email: EmailConfig,
    pub storage: StorageConfig,
}

impl Config {
    /// Every secret is required. A missing variable fails startup instead
    /// of falling back to a compiled-in value.
    pub fn init() -> Result<Self> {
        let database_url =
            std::env::var("DATABASE_URL").context("Missing environment variable: DATABASE_URL")?;
        let jwt_secret =
            std::env::var("JWT_SECRET").context("Missing environment variable: JWT_SECRET")?;
        let run_migrations_str = std::env::var("RUN_MIGRATIONS")
            .context("Missing environment variable: RUN_MIGRATIONS")?;
        let port_str = std::env::var("PORT").context("Missing environment variable: PORT")?;
        let public_url =
            std::env::var("PUBLIC_URL").context("Missing environment variable: PUBLIC_URL")?;

        let run_migrations = match run_migrations_str.as_str() {
            "true" => true,
            "false" => false,
            other => {
                return Err(anyhow!(
                    "RUN_MIGRATIONS must be 'true' or 'false', got '{}'",
                    other
                ));
            }
        };

        let port = port_str
            .parse::<u16>()
            .context("PORT must be a valid u16 integer")?;

        let access_token_ttl_minutes = std::env::var("ACCESS_TOKEN_TTL_MINUTES")
            .unwrap_or_else(|_| "720".to_string())
            .parse::<i64>()
            .context("ACCESS_TOKEN_TTL_MINUTES must be a valid integer")?;

        let verification_ttl_hours = std::env::var("VERIFICATION_TTL_HOURS")
            .unwrap_or_else(|_| "48".to_string())
            .parse::<i64>()
            .context("VERIFICATION_TTL_HOURS must be a valid integer")?;

        let cors_allowed_origins = std::env::var("CORS_ALLOWED_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:3000,http://127.0.0.1:3000".to_string())
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        let otel_endpoint = std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT")
            .unwrap_or_else(|_| "http://otel-collector:4317".to_string());

        let email = EmailConfig::init().context("Failed to load SMTP configuration")?;
        let storage = StorageConfig::init().context("Failed to load storage configuration")?;

        Ok(Self {
            database_url,
            jwt_secret,
            access_token_ttl_minutes,
            run_migrations,
            port,
            cors_allowed_origins,
            otel_endpoint,
            verification: VerificationConfig {
                public_url,
                ttl_hours: verification_ttl_hours,
            },
            email,
            storage,
        })
    }
}
