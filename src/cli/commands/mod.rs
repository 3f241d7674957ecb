//! CLI command implementations
//!
//! Each subcommand has its own module with:
//! - Args struct for command-line arguments
//! - run() function to execute the command

use clap::Subcommand;

pub mod browse;
pub mod config;
pub mod init;
pub mod page;
pub mod serve;
pub mod stats;

use crate::app::AppContext;
use crate::error::Result;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create the data root, default config and database schemas
    Init(init::InitArgs),

    /// Show totals, max score and last update per source
    Stats(stats::StatsArgs),

    /// Compute one page of a leaderboard
    Page(page::PageArgs),

    /// Browse both leaderboards interactively from stdin
    Browse(browse::BrowseArgs),

    /// Serve the leaderboard over HTTP
    Serve(serve::ServeArgs),

    /// Show the effective configuration
    Config(config::ConfigArgs),
}

/// Dispatch a command to its handler
pub fn run(ctx: &AppContext, command: &Commands) -> Result<()> {
    match command {
        Commands::Init(args) => init::run(ctx, args),
        Commands::Stats(args) => stats::run(ctx, args),
        Commands::Page(args) => page::run(ctx, args),
        Commands::Browse(args) => browse::run(ctx, args),
        Commands::Serve(args) => serve::run(ctx, args),
        Commands::Config(args) => config::run(ctx, args),
    }
}
