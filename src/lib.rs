//! RefTrack Telegram Bot
//!
//! A Telegram bot that gates onboarding behind channel membership and tracks
//! referrals credited through `/start` deep-link parameters. The decision core
//! (membership gating, referral attribution, locale toggling) is independent of
//! the Telegram transport and the Postgres store behind it.

pub mod config;
pub mod database;
pub mod handlers;
pub mod i18n;
pub mod models;
pub mod services;
pub mod utils;
pub mod workflow;

// Re-export commonly used types
pub use config::Settings;
pub use utils::errors::{RefTrackError, Result};

// Re-export main components for easy access
pub use database::{UserRepository, UserStore};
pub use services::membership::{MembershipOracle, MembershipStatus};
pub use workflow::ReferralWorkflow;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
