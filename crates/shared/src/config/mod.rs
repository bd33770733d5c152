mod database;
mod hashing;
mod jwt;
mod mailer;
mod myconfig;
mod storage;

pub use self::database::{ConnectionManager, ConnectionPool};
pub use self::hashing::Hashing;
pub use self::jwt::JwtConfig;
pub use self::mailer::EmailService;
pub use self::myconfig::{Config, EmailConfig, StorageConfig, VerificationConfig};
pub use self::storage::StorageClient;
