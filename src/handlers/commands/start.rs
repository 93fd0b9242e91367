//! Start command handler
//!
//! Decodes `/start [referrer_id]` messages and renders the workflow outcome
//! back to Telegram.

use std::sync::Arc;

use teloxide::prelude::*;
use teloxide::types::{ChatId, InlineKeyboardButton, InlineKeyboardMarkup, Message};
use tracing::debug;
use url::Url;

use crate::handlers::AppWorkflow;
use crate::utils::errors::{RefTrackError, Result};
use crate::workflow::StartOutcome;

/// Callback data for the locale-toggle button.
pub const TOGGLE_LANG: &str = "toggle_lang";
/// Callback data prefix for the join-recheck button.
pub const CHECK_JOIN: &str = "check_join";

/// Handle the /start command
pub async fn handle_start(bot: Bot, msg: Message, workflow: Arc<AppWorkflow>) -> Result<()> {
    let user = msg
        .from
        .as_ref()
        .ok_or_else(|| RefTrackError::InvalidInput("No user in message".to_string()))?;

    let user_id = user.id.0 as i64;
    let chat_id = msg.chat.id;

    // Onboarding only makes sense in a private chat.
    if !chat_id.is_user() {
        debug!(user_id = user_id, chat_id = ?chat_id, "Ignoring /start outside private chat");
        return Ok(());
    }

    let raw_arg = msg.text().and_then(|text| text.split_whitespace().nth(1));
    debug!(user_id = user_id, raw_arg = ?raw_arg, "Processing /start command");

    let outcome = workflow
        .handle_start(user_id, &user.first_name, raw_arg)
        .await?;

    send_start_outcome(&bot, chat_id, &outcome).await
}

/// Render a start outcome: either the gated join prompt or the welcome with
/// the locale-toggle button. Shared with the join-recheck callback path.
pub(crate) async fn send_start_outcome(
    bot: &Bot,
    chat_id: ChatId,
    outcome: &StartOutcome,
) -> Result<()> {
    match outcome {
        StartOutcome::JoinPrompt {
            text,
            join_url,
            join_button,
            check_button,
            referrer,
        } => {
            // The recheck button carries the deep-link referrer forward so a
            // referral survives the join-then-recheck path.
            let check_data = match referrer {
                Some(id) => format!("{CHECK_JOIN}:{id}"),
                None => CHECK_JOIN.to_string(),
            };

            let keyboard = InlineKeyboardMarkup::new(vec![
                vec![InlineKeyboardButton::url(
                    join_button.clone(),
                    Url::parse(join_url)?,
                )],
                vec![InlineKeyboardButton::callback(
                    check_button.clone(),
                    check_data,
                )],
            ]);

            bot.send_message(chat_id, text.clone())
                .reply_markup(keyboard)
                .await?;
        }
        StartOutcome::Welcome {
            text,
            language_button,
        } => {
            let keyboard = InlineKeyboardMarkup::new(vec![vec![InlineKeyboardButton::callback(
                language_button.clone(),
                TOGGLE_LANG,
            )]]);

            bot.send_message(chat_id, text.clone())
                .reply_markup(keyboard)
                .await?;
        }
    }

    Ok(())
}
