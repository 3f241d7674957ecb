//! lb init - Create the data root, default config and database schemas

use std::path::{Path, PathBuf};

use clap::Args;
use serde::Serialize;
use tracing::info;

use crate::app::{AppContext, ROOT_DIR_NAME};
use crate::cli::output::{HumanLayout, emit_human, emit_robot, robot_ok};
use crate::config::Config;
use crate::core::Source;
use crate::error::{LbError, Result};
use crate::storage::Stores;

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Initialize in the per-user data directory instead of ./.leaderboard
    #[arg(long)]
    pub global: bool,

    /// Overwrite an existing config.toml with defaults
    #[arg(long, short)]
    pub force: bool,
}

#[derive(Debug, Serialize)]
struct InitReport {
    root: PathBuf,
    config_path: PathBuf,
    config_written: bool,
    databases: Vec<PathBuf>,
}

/// Init runs before a context exists because the root may not exist yet.
pub fn run_without_context(robot: bool, args: &InitArgs) -> Result<()> {
    let root = target_root(args.global)?;
    let report = initialize(&root, args.force)?;
    emit(robot, &report)
}

/// Re-initialize an already discovered root.
pub fn run(ctx: &AppContext, args: &InitArgs) -> Result<()> {
    let report = initialize(&ctx.root, args.force)?;
    emit(ctx.robot_mode, &report)
}

fn target_root(global: bool) -> Result<PathBuf> {
    if let Ok(root) = std::env::var("LB_ROOT") {
        return Ok(PathBuf::from(root));
    }
    if global {
        let data_dir = dirs::data_dir()
            .ok_or_else(|| LbError::MissingConfig("data directory not found".to_string()))?;
        return Ok(data_dir.join("leaderboard"));
    }
    Ok(std::env::current_dir()?.join(ROOT_DIR_NAME))
}

fn initialize(root: &Path, force: bool) -> Result<InitReport> {
    std::fs::create_dir_all(root)?;

    let config_path = root.join("config.toml");
    let config_written = force || !config_path.exists();
    if config_written {
        let rendered = toml::to_string_pretty(&Config::default())
            .map_err(|err| LbError::Serialization(err.to_string()))?;
        std::fs::write(&config_path, rendered)?;
    }

    let config = Config::load(Some(&config_path), root)?;
    Stores::open(&config, root)?;
    let databases = Source::ALL
        .iter()
        .map(|&source| config.database.path_for(source, root))
        .collect();

    info!(target: "init", root = %root.display(), config_written, "initialized leaderboard root");

    Ok(InitReport {
        root: root.to_path_buf(),
        config_path,
        config_written,
        databases,
    })
}

fn emit(robot: bool, report: &InitReport) -> Result<()> {
    if robot {
        return emit_robot(&robot_ok(report));
    }
    let mut layout = HumanLayout::new();
    layout
        .title("Leaderboard initialized")
        .kv("Root", &report.root.display().to_string())
        .kv(
            "Config",
            &format!(
                "{}{}",
                report.config_path.display(),
                if report.config_written { "" } else { " (kept)" }
            ),
        );
    for db in &report.databases {
        layout.bullet(&db.display().to_string());
    }
    emit_human(&layout);
    Ok(())
}
