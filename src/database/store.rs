//! Durable per-user state contract
//!
//! The workflow talks to storage exclusively through this trait so the
//! decision core can be exercised against an in-memory store in tests while
//! production runs on Postgres.
//!
//! Implementations must commit every mutation durably before returning; a
//! crash after a returned success never loses a credited referral.

use async_trait::async_trait;

use crate::models::{Locale, User};
use crate::utils::errors::Result;

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Create the user record if it does not exist yet, returning the record
    /// and whether this call created it.
    ///
    /// Idempotent: a second call for the same id leaves `referral_count` and
    /// `language` untouched (the display name may be refreshed). The
    /// `created` flag must be computed atomically with the insert so two
    /// concurrent first visits yield exactly one `true`.
    async fn ensure_user(
        &self,
        user_id: i64,
        display_name: &str,
        default_locale: Locale,
    ) -> Result<(User, bool)>;

    async fn get_user(&self, user_id: i64) -> Result<Option<User>>;

    /// Increment the referral count of an existing user. Atomic with respect
    /// to concurrent credits for the same id. `UserNotFound` if absent.
    async fn credit_referral(&self, referrer_id: i64) -> Result<()>;

    /// Update the locale of an existing user. `UserNotFound` if absent.
    async fn set_locale(&self, user_id: i64, locale: Locale) -> Result<()>;

    /// Stored locale, or the system default for users not registered yet
    /// (lookups before creation are expected, e.g. for the join prompt).
    async fn get_locale(&self, user_id: i64) -> Result<Locale>;

    /// Current referral count, 0 for unknown users.
    async fn referral_count(&self, user_id: i64) -> Result<i64>;
}
