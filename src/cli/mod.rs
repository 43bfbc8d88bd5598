//! CLI module
//!
//! Command-line interface for the incident API.
//!
//! # Commands
//!
//! - `search` - Stream incidents matching a filter
//! - `get` - Show one incident
//! - `create` - Create an incident
//! - `update` - Change incident fields
//! - `close` - Close an incident
//! - `delete` - Delete an incident

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat};
pub use runner::Runner;
