//! Database module
//!
//! This module handles database connections and operations

pub mod connection;
pub mod repositories;
pub mod store;

// Re-export commonly used database components
pub use connection::{create_pool, health_check, run_migrations, DatabasePool};
pub use repositories::UserRepository;
pub use store::UserStore;
