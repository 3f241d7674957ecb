use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::cli::OutputFormat;
use crate::config::Config;
use crate::core::Paginator;
use crate::error::{LbError, Result};
use crate::storage::Stores;

/// Directory name searched for upwards from the working directory.
pub const ROOT_DIR_NAME: &str = ".leaderboard";

pub struct AppContext {
    pub root: PathBuf,
    pub config_path: PathBuf,
    pub config: Config,
    pub stores: Arc<Stores>,
    pub paginator: Paginator,
    pub robot_mode: bool,
    pub output_format: OutputFormat,
    pub verbosity: u8,
}

impl AppContext {
    pub fn from_cli(cli: &crate::cli::Cli) -> Result<Self> {
        let root = find_root()?;
        let config_path = cli
            .config
            .clone()
            .unwrap_or_else(|| default_config_path(&root));
        let config = Config::load(cli.config.as_deref(), &root)?;
        let stores = Arc::new(Stores::open(&config, &root)?);

        Ok(Self {
            root,
            config_path,
            paginator: Paginator::new(config.display.clone()),
            config,
            stores,
            robot_mode: cli.robot,
            output_format: cli.output_format(),
            verbosity: cli.verbose,
        })
    }
}

/// `LB_ROOT`, else a `.leaderboard` directory above the cwd, else the
/// per-user data directory.
pub fn find_root() -> Result<PathBuf> {
    if let Ok(root) = std::env::var("LB_ROOT") {
        return Ok(PathBuf::from(root));
    }
    let cwd = std::env::current_dir()?;
    if let Some(found) = find_upwards(&cwd, ROOT_DIR_NAME) {
        return Ok(found);
    }

    let data_dir = dirs::data_dir()
        .ok_or_else(|| LbError::MissingConfig("data directory not found".to_string()))?;
    Ok(data_dir.join("leaderboard"))
}

pub fn default_config_path(root: &Path) -> PathBuf {
    if root.ends_with(ROOT_DIR_NAME) || std::env::var_os("LB_ROOT").is_some() {
        root.join("config.toml")
    } else {
        dirs::config_dir()
            .unwrap_or_else(|| root.to_path_buf())
            .join("leaderboard/config.toml")
    }
}

fn find_upwards(start: &Path, name: &str) -> Option<PathBuf> {
    start
        .ancestors()
        .map(|dir| dir.join(name))
        .find(|candidate| candidate.is_dir())
}
