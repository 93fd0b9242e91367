//! Test infrastructure for exercising the workflow without Telegram or
//! Postgres: an in-memory `UserStore` and a scriptable membership oracle.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;

use reftrack::models::{Locale, User};
use reftrack::services::membership::{MembershipOracle, MembershipStatus};
use reftrack::utils::errors::{RefTrackError, Result};
use reftrack::workflow::ReferralWorkflow;
use reftrack::UserStore;

/// In-memory store honoring the `UserStore` contract, including the
/// idempotent ensure semantics, the configured-default locale fallback for
/// absent rows, and not-found signaling.
pub struct MemoryUserStore {
    users: Mutex<HashMap<i64, User>>,
    default_locale: Locale,
}

impl MemoryUserStore {
    pub fn new(default_locale: Locale) -> Self {
        Self {
            users: Mutex::new(HashMap::new()),
            default_locale,
        }
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn ensure_user(
        &self,
        user_id: i64,
        display_name: &str,
        default_locale: Locale,
    ) -> Result<(User, bool)> {
        let mut users = self.users.lock().await;

        if let Some(existing) = users.get_mut(&user_id) {
            existing.first_name = display_name.to_string();
            existing.updated_at = Utc::now();
            return Ok((existing.clone(), false));
        }

        let now = Utc::now();
        let user = User {
            user_id,
            first_name: display_name.to_string(),
            referral_count: 0,
            language: default_locale,
            created_at: now,
            updated_at: now,
        };
        users.insert(user_id, user.clone());
        Ok((user, true))
    }

    async fn get_user(&self, user_id: i64) -> Result<Option<User>> {
        Ok(self.users.lock().await.get(&user_id).cloned())
    }

    async fn credit_referral(&self, referrer_id: i64) -> Result<()> {
        let mut users = self.users.lock().await;
        let user = users
            .get_mut(&referrer_id)
            .ok_or(RefTrackError::UserNotFound {
                user_id: referrer_id,
            })?;
        user.referral_count += 1;
        user.updated_at = Utc::now();
        Ok(())
    }

    async fn set_locale(&self, user_id: i64, locale: Locale) -> Result<()> {
        let mut users = self.users.lock().await;
        let user = users
            .get_mut(&user_id)
            .ok_or(RefTrackError::UserNotFound { user_id })?;
        user.language = locale;
        user.updated_at = Utc::now();
        Ok(())
    }

    async fn get_locale(&self, user_id: i64) -> Result<Locale> {
        Ok(self
            .users
            .lock()
            .await
            .get(&user_id)
            .map(|u| u.language)
            .unwrap_or(self.default_locale))
    }

    async fn referral_count(&self, user_id: i64) -> Result<i64> {
        Ok(self
            .users
            .lock()
            .await
            .get(&user_id)
            .map(|u| u.referral_count)
            .unwrap_or(0))
    }
}

/// Oracle returning a scriptable status, so tests can flip membership
/// between events.
pub struct StubOracle {
    status: std::sync::Mutex<MembershipStatus>,
}

impl StubOracle {
    pub fn with_status(status: MembershipStatus) -> Arc<Self> {
        Arc::new(Self {
            status: std::sync::Mutex::new(status),
        })
    }

    pub fn member() -> Arc<Self> {
        Self::with_status(MembershipStatus::Member)
    }

    pub fn not_member() -> Arc<Self> {
        Self::with_status(MembershipStatus::NotMember)
    }

    pub fn unavailable() -> Arc<Self> {
        Self::with_status(MembershipStatus::Unavailable)
    }

    pub fn set(&self, status: MembershipStatus) {
        *self.status.lock().unwrap() = status;
    }
}

#[async_trait]
impl MembershipOracle for StubOracle {
    async fn check(&self, _user_id: i64) -> MembershipStatus {
        *self.status.lock().unwrap()
    }
}

pub const TEST_BOT_USERNAME: &str = "reftrack_bot";
pub const TEST_INVITE_LINK: &str = "https://t.me/reftrack_channel";

/// Workflow wired to an in-memory store and the given oracle.
pub fn test_workflow(
    oracle: Arc<StubOracle>,
) -> ReferralWorkflow<MemoryUserStore, Arc<StubOracle>> {
    test_workflow_with_default(oracle, Locale::Ar)
}

/// Workflow with an explicit system default locale; the store shares it, as
/// production wiring does.
pub fn test_workflow_with_default(
    oracle: Arc<StubOracle>,
    default_locale: Locale,
) -> ReferralWorkflow<MemoryUserStore, Arc<StubOracle>> {
    ReferralWorkflow::new(
        MemoryUserStore::new(default_locale),
        oracle,
        default_locale,
        TEST_BOT_USERNAME,
        TEST_INVITE_LINK,
    )
}
