//! CLI commands and argument parsing

use clap::{Parser, Subcommand};
use std::num::NonZeroUsize;
use std::path::PathBuf;

/// Walk link-paginated JSON APIs
#[derive(Parser, Debug)]
#[command(name = "link-pager")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Client configuration file (YAML or JSON)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Extra request header, e.g. "Authorization: Bearer ..." (repeatable)
    #[arg(short = 'H', long = "header", global = true)]
    pub headers: Vec<String>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch a URL and follow its pagination links
    Walk {
        /// URL of the first page
        url: String,

        /// Follow `previous` links instead of `next`
        #[arg(long)]
        backward: bool,

        /// What to print
        #[arg(short, long, default_value = "items")]
        output: OutputMode,

        /// Stop after this many pages (including the first)
        #[arg(long)]
        max_pages: Option<NonZeroUsize>,

        /// Use the blocking client instead of the async one
        #[arg(long)]
        blocking: bool,
    },

    /// Print the effective client configuration
    ShowConfig,
}

/// What `walk` prints
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputMode {
    /// One JSON line per item
    Items,
    /// One JSON summary line per page
    Pages,
}
