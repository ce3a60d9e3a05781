//! CLI module
//!
//! Command-line interface for walking paginated APIs.
//!
//! # Commands
//!
//! - `walk` - Follow `next`/`previous` links from a URL and print what they return
//! - `show-config` - Print the effective client configuration

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputMode};
pub use runner::Runner;
