mod identity;
mod login;
mod register;
mod verify;

pub use self::identity::{DynIdentityService, IdentityServiceTrait};
pub use self::login::{DynLoginService, LoginServiceTrait};
pub use self::register::{DynRegisterService, RegisterServiceTrait};
pub use self::verify::{DynVerifyService, VerifyServiceTrait};
