mod auth;
mod email;
mod entry;
mod user;

pub use self::auth::{LoginRequest, RegisterRequest, VerifyEmailParams};
pub use self::email::EmailRequest;
pub use self::entry::{
    CreateEntryRequest, FindAllEntries, NewEntry, ServiceDetails, UpdateEntryRequest,
};
pub use self::user::{CreateUserRecord, UpdateProfileRequest};
