//! External service adapters
//!
//! Adapters that convert outside-world collaborators into the narrow
//! interfaces the workflow consumes.

pub mod membership;

pub use membership::{ChannelMembershipService, MembershipOracle, MembershipStatus};
