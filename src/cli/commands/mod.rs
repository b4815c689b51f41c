//! Command implementations.

pub mod compare;
pub mod completions;
pub mod config;
pub mod dispatcher;
pub mod locate;
pub mod query;
pub mod suite;

pub use dispatcher::{Command, CommandDispatcher, CommandResult};
