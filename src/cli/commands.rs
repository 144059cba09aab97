//! CLI commands and argument parsing

use crate::types::{LogLevel, PageNumber};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Infinite scroll pagination driver
#[derive(Parser, Debug)]
#[command(name = "infinite-pager")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Log level (overridden by RUST_LOG)
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: LogLevel,

    /// Verbose output (same as --log-level debug)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Effective log level after applying `--verbose`
    pub fn effective_log_level(&self) -> LogLevel {
        if self.verbose {
            LogLevel::Debug
        } else {
            self.log_level
        }
    }
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Scroll a simulated viewport over an in-memory page source
    Simulate {
        /// Total number of pages the source serves
        #[arg(long, default_value = "5")]
        pages: PageNumber,

        /// Items per page
        #[arg(long, default_value = "10")]
        per_page: u32,

        /// Page whose first fetch fails
        #[arg(long)]
        fail_page: Option<PageNumber>,

        /// Viewport height
        #[arg(long, default_value = "400")]
        viewport: f64,

        /// Height of one rendered row
        #[arg(long, default_value = "20")]
        row_height: f64,

        /// Distance scrolled per step
        #[arg(long, default_value = "100")]
        step: f64,

        /// Simulated fetch latency in milliseconds
        #[arg(long, default_value = "0")]
        latency_ms: u64,
    },

    /// Page through a JSON API
    Fetch {
        /// Pager configuration file (YAML or JSON)
        #[arg(short, long)]
        config: PathBuf,

        /// Stop after this many pages
        #[arg(long)]
        max_pages: Option<PageNumber>,
    },
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output (one message per line)
    Json,
    /// Human-readable output
    Pretty,
}
