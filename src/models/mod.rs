//! Data models for RefTrack

pub mod locale;
pub mod referrer;
pub mod user;

pub use locale::Locale;
pub use referrer::ReferrerArg;
pub use user::User;
