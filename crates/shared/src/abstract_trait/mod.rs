mod auth;
mod email;
mod entry;
mod hashing;
mod jwt;
mod policy;
mod storage;
mod user;
mod waiver;

pub use self::auth::{
    DynIdentityService, DynLoginService, DynRegisterService, DynVerifyService,
    IdentityServiceTrait, LoginServiceTrait, RegisterServiceTrait, VerifyServiceTrait,
};
pub use self::email::{DynEmailService, EmailServiceTrait};
pub use self::entry::{
    DynEntryCommandRepository, DynEntryCommandService, DynEntryQueryRepository,
    DynEntryQueryService, EntryCommandRepositoryTrait, EntryCommandServiceTrait,
    EntryQueryRepositoryTrait, EntryQueryServiceTrait,
};
pub use self::hashing::{DynHashing, HashingTrait};
pub use self::jwt::{DynJwtService, JwtServiceTrait};
pub use self::policy::{DynEntryPolicy, EntryPolicyTrait};
pub use self::storage::{DynStorageService, StorageServiceTrait};
pub use self::user::{
    DynUserCommandRepository, DynUserQueryRepository, UserCommandRepositoryTrait,
    UserQueryRepositoryTrait,
};
pub use self::waiver::{DynWaiverService, WaiverServiceTrait};
