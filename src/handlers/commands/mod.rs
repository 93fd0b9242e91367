//! Command handlers module

pub mod start;

pub use start::handle_start;
