//! Callback query handlers module
//!
//! Decodes inline keyboard button presses and routes them to the workflow.

use std::sync::Arc;

use teloxide::prelude::*;
use teloxide::types::{CallbackQuery, ChatId, MaybeInaccessibleMessage, Message};
use tracing::{debug, warn};

use crate::handlers::commands::start::{send_start_outcome, CHECK_JOIN, TOGGLE_LANG};
use crate::handlers::AppWorkflow;
use crate::utils::errors::Result;
use crate::workflow::CheckJoinOutcome;

fn regular_message(query: &CallbackQuery) -> Option<&Message> {
    query.message.as_ref().and_then(|msg| match msg {
        MaybeInaccessibleMessage::Inaccessible(_) => None,
        MaybeInaccessibleMessage::Regular(message) => Some(message.as_ref()),
    })
}

/// Main callback query dispatcher
pub async fn handle_callback_query(
    bot: Bot,
    query: CallbackQuery,
    workflow: Arc<AppWorkflow>,
) -> Result<()> {
    let user_id = query.from.id.0 as i64;

    let Some(data) = query.data.as_deref() else {
        debug!(user_id = user_id, "Callback query without data, ignoring");
        return Ok(());
    };

    let message = regular_message(&query);
    let chat_id = message.map(|m| m.chat.id).unwrap_or(ChatId(user_id));

    debug!(user_id = user_id, data = %data, "Processing callback query");

    let parts: Vec<&str> = data.split(':').collect();
    match parts[0] {
        TOGGLE_LANG => {
            // Acknowledge before anything else so the client spinner clears
            // even if the toggle itself fails.
            bot.answer_callback_query(query.id.clone()).await?;

            let outcome = workflow.handle_toggle_language(user_id).await?;

            // Replace the welcome in place with the confirmation, no buttons.
            if let Some(message) = message {
                bot.edit_message_text(message.chat.id, message.id, outcome.text)
                    .await?;
            }
        }
        CHECK_JOIN => {
            // A referrer id embedded at prompt time rides along in the data.
            let raw_arg = parts.get(1).copied();

            match workflow
                .handle_check_join(user_id, &query.from.first_name, raw_arg)
                .await?
            {
                CheckJoinOutcome::Joined(outcome) => {
                    bot.answer_callback_query(query.id.clone()).await?;

                    if let Some(message) = message {
                        bot.delete_message(message.chat.id, message.id).await?;
                    }

                    send_start_outcome(&bot, chat_id, &outcome).await?;
                }
                CheckJoinOutcome::StillNotMember { alert } => {
                    bot.answer_callback_query(query.id.clone())
                        .text(alert)
                        .show_alert(true)
                        .await?;
                }
            }
        }
        other => {
            warn!(user_id = user_id, action = %other, "Unknown callback action");
            bot.answer_callback_query(query.id.clone()).await?;
        }
    }

    Ok(())
}
