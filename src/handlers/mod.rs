//! Telegram transport handlers
//!
//! Thin glue between teloxide updates and the workflow core: handlers decode
//! events, call the workflow, and render its outcomes as messages, edits and
//! callback answers.

pub mod callbacks;
pub mod commands;

use crate::database::UserRepository;
use crate::services::membership::ChannelMembershipService;
use crate::workflow::ReferralWorkflow;

/// The workflow as wired in production.
pub type AppWorkflow = ReferralWorkflow<UserRepository, ChannelMembershipService>;
