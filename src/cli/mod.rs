//! Command-line interface

pub mod commands;
pub mod formatters;
pub mod output;

use std::path::PathBuf;

use clap::Parser;

pub use commands::Commands;
pub use output::OutputFormat;

/// lb - block-producer uptime leaderboard
#[derive(Parser, Debug)]
#[command(name = "lb", version, about, long_about = None)]
pub struct Cli {
    /// Machine-readable JSON output (implies --format json)
    #[arg(long, global = true)]
    pub robot: bool,

    /// Output format for command results
    #[arg(long, value_enum, global = true, default_value_t = OutputFormat::Human)]
    pub format: OutputFormat,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress log output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Explicit config file (skips global and project config)
    #[arg(long, global = true, env = "LB_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Effective output format; `--robot` forces JSON.
    #[must_use]
    pub const fn output_format(&self) -> OutputFormat {
        if self.robot {
            OutputFormat::Json
        } else {
            self.format
        }
    }
}
