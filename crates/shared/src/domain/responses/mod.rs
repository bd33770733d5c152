mod api;
mod entry;
mod pagination;
mod token;
mod user;
mod verify;
mod waiver;

pub use self::api::{ApiResponse, ApiResponsePagination};
pub use self::entry::{DeleteEntryResponse, EntryResponse};
pub use self::pagination::Pagination;
pub use self::token::TokenResponse;
pub use self::user::UserResponse;
pub use self::verify::VerifiedResponse;
pub use self::waiver::WaiverUploadResponse;
