mod entry;
mod user;

pub use self::entry::Entry;
pub use self::user::User;
