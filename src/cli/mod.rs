//! CLI module
//!
//! Command-line interface for driving an infinite list.
//!
//! # Commands
//!
//! - `simulate` - Scroll a simulated viewport over an in-memory source
//! - `fetch` - Page through a JSON API described by a config file

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat};
pub use runner::{Runner, SimulateOptions};
