//! Channel membership oracle
//!
//! Wraps the Telegram `getChatMember` call behind a trait the workflow can
//! consume. Transport failures never cross this boundary: any error or
//! timeout collapses to `Unavailable`, which the workflow treats the same as
//! `NotMember` (fail-closed) while logging keeps the two distinguishable.

use std::time::Duration;

use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::{ChatId, UserId};
use tracing::{debug, warn};

/// Outcome of a membership check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MembershipStatus {
    Member,
    NotMember,
    /// The check could not be completed (network error, timeout, unknown
    /// user). Gates the user out like `NotMember`.
    Unavailable,
}

impl MembershipStatus {
    pub fn is_member(self) -> bool {
        matches!(self, MembershipStatus::Member)
    }
}

#[async_trait]
pub trait MembershipOracle: Send + Sync {
    /// Check whether the user belongs to the required channel. Must not
    /// error: uncertainty is reported as `Unavailable`.
    async fn check(&self, user_id: i64) -> MembershipStatus;
}

#[async_trait]
impl<T: MembershipOracle + ?Sized> MembershipOracle for std::sync::Arc<T> {
    async fn check(&self, user_id: i64) -> MembershipStatus {
        (**self).check(user_id).await
    }
}

/// Production oracle backed by the Telegram Bot API.
#[derive(Debug, Clone)]
pub struct ChannelMembershipService {
    bot: Bot,
    channel_id: ChatId,
    timeout: Duration,
}

impl ChannelMembershipService {
    pub fn new(bot: Bot, channel_id: i64, timeout_seconds: u64) -> Self {
        Self {
            bot,
            channel_id: ChatId(channel_id),
            timeout: Duration::from_secs(timeout_seconds),
        }
    }
}

#[async_trait]
impl MembershipOracle for ChannelMembershipService {
    async fn check(&self, user_id: i64) -> MembershipStatus {
        let request = self
            .bot
            .get_chat_member(self.channel_id, UserId(user_id as u64));

        match tokio::time::timeout(self.timeout, request.send()).await {
            Ok(Ok(member)) => {
                let kind = &member.kind;
                if kind.is_owner() || kind.is_administrator() || kind.is_member() {
                    MembershipStatus::Member
                } else {
                    debug!(user_id = user_id, status = ?kind, "User is not a channel member");
                    MembershipStatus::NotMember
                }
            }
            Ok(Err(e)) => {
                warn!(user_id = user_id, error = %e, "Membership check failed");
                MembershipStatus::Unavailable
            }
            Err(_) => {
                warn!(user_id = user_id, "Membership check timed out");
                MembershipStatus::Unavailable
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_member_passes_the_gate() {
        assert!(MembershipStatus::Member.is_member());
        assert!(!MembershipStatus::NotMember.is_member());
        assert!(!MembershipStatus::Unavailable.is_member());
    }
}
