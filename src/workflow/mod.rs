//! Referral workflow
//!
//! The decision core of the bot. Each incoming event is handled to
//! completion against the membership oracle and the user store, and the
//! result is returned as an outcome value describing what the transport
//! should render. No Telegram types appear here, which keeps the gating and
//! attribution rules testable without a network.

use tracing::{debug, error, info};

use crate::database::UserStore;
use crate::i18n;
use crate::models::{Locale, ReferrerArg};
use crate::services::membership::MembershipOracle;
use crate::utils::errors::{RefTrackError, Result};
use crate::utils::logging;

/// Response to a `/start` command (or a successful join recheck).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartOutcome {
    /// The user has not joined the required channel. No state was mutated.
    JoinPrompt {
        text: String,
        join_url: String,
        join_button: String,
        check_button: String,
        /// Referrer id carried from the deep link, so the recheck button can
        /// replay it once the user joins.
        referrer: Option<i64>,
    },
    /// The user is registered; show the welcome with stats and share link.
    Welcome {
        text: String,
        language_button: String,
    },
}

/// Response to the locale-toggle button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToggleOutcome {
    pub locale: Locale,
    /// Confirmation text in the newly selected locale.
    pub text: String,
}

/// Response to the join-recheck button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckJoinOutcome {
    /// Membership now confirmed; the prompt should be deleted and the start
    /// flow outcome rendered fresh.
    Joined(StartOutcome),
    /// Still gated; show a transient alert and mutate nothing.
    StillNotMember { alert: String },
}

/// Per-event state machine over the membership oracle and the user store.
pub struct ReferralWorkflow<S, O> {
    store: S,
    oracle: O,
    default_locale: Locale,
    bot_username: String,
    channel_invite_link: String,
}

impl<S: UserStore, O: MembershipOracle> ReferralWorkflow<S, O> {
    pub fn new(
        store: S,
        oracle: O,
        default_locale: Locale,
        bot_username: impl Into<String>,
        channel_invite_link: impl Into<String>,
    ) -> Self {
        Self {
            store,
            oracle,
            default_locale,
            bot_username: bot_username.into(),
            channel_invite_link: channel_invite_link.into(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Handle `/start [referrer_id]`.
    ///
    /// Membership gates everything: an unconfirmed user gets the join prompt
    /// and no record is created. A referral is credited exactly once, at the
    /// moment the referee's row is first inserted.
    pub async fn handle_start(
        &self,
        user_id: i64,
        display_name: &str,
        raw_arg: Option<&str>,
    ) -> Result<StartOutcome> {
        let locale = self.store.get_locale(user_id).await?;
        let referrer = ReferrerArg::parse(raw_arg, user_id);

        let status = self.oracle.check(user_id).await;
        logging::log_membership_check(user_id, status);

        if !status.is_member() {
            let msgs = i18n::messages(locale);
            return Ok(StartOutcome::JoinPrompt {
                text: msgs.join_prompt.to_string(),
                join_url: self.channel_invite_link.clone(),
                join_button: msgs.join_button.to_string(),
                check_button: msgs.check_button.to_string(),
                referrer: referrer.valid_id(),
            });
        }

        let (_, created) = self
            .store
            .ensure_user(user_id, display_name, self.default_locale)
            .await?;

        if created {
            logging::log_user_action(user_id, "registered", None);
            if let Some(referrer_id) = referrer.valid_id() {
                self.credit_referrer(referrer_id, user_id).await?;
            }
        } else {
            debug!(user_id = user_id, "Returning user, no referral processed");
        }

        // Re-read after crediting so the welcome reflects the latest count.
        let count = self.store.referral_count(user_id).await?;

        let msgs = i18n::messages(locale);
        let link = i18n::share_link(&self.bot_username, user_id);
        // Link templates may embed either the prebuilt link or the raw id.
        let text = format!(
            "{}\n\n{}\n\n{}",
            i18n::format(msgs.welcome, &[("name", display_name)]),
            i18n::format(msgs.referral, &[("count", &count.to_string())]),
            i18n::format(msgs.link, &[("link", &link), ("user_id", &user_id.to_string())]),
        );

        Ok(StartOutcome::Welcome {
            text,
            language_button: msgs.language_button.to_string(),
        })
    }

    /// Credit the referrer of a freshly inserted referee. A missing referrer
    /// forfeits the credit silently; the referee's onboarding still succeeds.
    async fn credit_referrer(&self, referrer_id: i64, referee_id: i64) -> Result<()> {
        match self.store.credit_referral(referrer_id).await {
            Ok(()) => {
                logging::log_referral_credit(referrer_id, referee_id);
                Ok(())
            }
            Err(RefTrackError::UserNotFound { .. }) => {
                debug!(
                    referrer_id = referrer_id,
                    referee_id = referee_id,
                    "Referrer not registered, credit forfeited"
                );
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    /// Handle the locale-toggle button: flip between the two locales and
    /// persist the choice.
    pub async fn handle_toggle_language(&self, user_id: i64) -> Result<ToggleOutcome> {
        let current = self.store.get_locale(user_id).await?;
        let next = current.toggled();

        if let Err(e) = self.store.set_locale(user_id, next).await {
            // The toggle button only exists on a welcome message, which is
            // only sent to registered users; an absent row here is a broken
            // invariant, not a user mistake.
            if matches!(e, RefTrackError::UserNotFound { .. }) {
                error!(
                    user_id = user_id,
                    "Locale toggle for unregistered user, invariant violated"
                );
            }
            return Err(e);
        }

        info!(user_id = user_id, locale = %next, "Locale changed");

        Ok(ToggleOutcome {
            locale: next,
            text: i18n::messages(next).language_changed.to_string(),
        })
    }

    /// Handle the join-recheck button. On success the full start flow runs
    /// again, including referral crediting if this is still the user's first
    /// completed pass.
    pub async fn handle_check_join(
        &self,
        user_id: i64,
        display_name: &str,
        raw_arg: Option<&str>,
    ) -> Result<CheckJoinOutcome> {
        let status = self.oracle.check(user_id).await;
        logging::log_membership_check(user_id, status);

        if status.is_member() {
            let outcome = self.handle_start(user_id, display_name, raw_arg).await?;
            return Ok(CheckJoinOutcome::Joined(outcome));
        }

        let locale = self.store.get_locale(user_id).await?;
        Ok(CheckJoinOutcome::StillNotMember {
            alert: i18n::messages(locale).still_not_subscribed.to_string(),
        })
    }
}
