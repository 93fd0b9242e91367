//! Logging configuration and setup
//!
//! This module provides logging initialization and structured logging utilities
//! for the RefTrack application.

use tracing::{debug, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::LoggingConfig;
use crate::services::membership::MembershipStatus;
use crate::utils::errors::Result;

/// Initialize logging based on configuration.
///
/// The returned guard must be kept alive for the lifetime of the process so
/// buffered file output is flushed on shutdown.
pub fn init_logging(config: &LoggingConfig) -> Result<WorkerGuard> {
    let file_appender = tracing_appender::rolling::daily(&config.file_path, "reftrack.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.level))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stdout))
        .with(tracing_subscriber::fmt::layer().with_writer(non_blocking))
        .init();

    info!("Logging initialized with level: {}", config.level);
    Ok(guard)
}

/// Log user actions with structured data
pub fn log_user_action(user_id: i64, action: &str, details: Option<&str>) {
    info!(
        user_id = user_id,
        action = action,
        details = details,
        "User action performed"
    );
}

/// Log membership oracle results, keeping NotMember and Unavailable
/// distinguishable even though both gate the user out.
pub fn log_membership_check(user_id: i64, status: MembershipStatus) {
    match status {
        MembershipStatus::Member => {
            debug!(user_id = user_id, "Membership check: user is a member");
        }
        MembershipStatus::NotMember => {
            debug!(user_id = user_id, "Membership check: user is not a member");
        }
        MembershipStatus::Unavailable => {
            warn!(
                user_id = user_id,
                "Membership check unavailable, treating as not a member"
            );
        }
    }
}

/// Log referral credit events
pub fn log_referral_credit(referrer_id: i64, referee_id: i64) {
    info!(
        referrer_id = referrer_id,
        referee_id = referee_id,
        "Referral credited"
    );
}
