//! Repository implementations
//!
//! Repositories own the SQL for one table each and implement the store
//! traits the workflow consumes.

pub mod user;

pub use user::UserRepository;
