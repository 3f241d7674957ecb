//! lb serve - Serve the leaderboard over HTTP

use std::sync::Arc;

use clap::Args;
use tracing::info;

use crate::app::AppContext;
use crate::error::Result;
use crate::server::{self, ServerState};

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Address to bind (default: server.bind)
    #[arg(long)]
    pub bind: Option<String>,
}

pub fn run(ctx: &AppContext, args: &ServeArgs) -> Result<()> {
    let bind = args.bind.clone().unwrap_or_else(|| ctx.config.server.bind.clone());
    let state = Arc::new(ServerState::new(&ctx.config, ctx.stores.clone()));
    info!(
        target: "server",
        %bind,
        cache = state.cache.is_enabled(),
        maintenance = ctx.config.display.maintenance_mode,
        "starting leaderboard server"
    );

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    runtime.block_on(server::serve(state, &bind))
}
