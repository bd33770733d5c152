mod entry;
mod user;

pub use self::entry::EntryRepository;
pub use self::user::UserRepository;
