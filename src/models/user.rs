//! User model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Locale;

/// One record per distinct participant who completed the membership gate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Telegram user id, immutable, assigned by the transport.
    pub user_id: i64,
    /// Last-seen first name, used only for greeting text.
    pub first_name: String,
    /// Number of other users whose first registration named this user as
    /// referrer. Never decreases.
    pub referral_count: i64,
    pub language: Locale,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
