mod auth;
mod entry;
mod policy;
mod waiver;

pub use self::auth::{AuthService, AuthServiceDeps};
pub use self::entry::{EntryService, EntryServiceDeps};
pub use self::policy::SharedStaffPolicy;
pub use self::waiver::WaiverService;
