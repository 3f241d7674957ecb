//! lb config - Show the effective configuration

use clap::Args;

use crate::app::AppContext;
use crate::cli::output::{HumanLayout, OutputFormat, emit_human, emit_json, emit_robot, robot_ok};
use crate::core::Source;
use crate::error::{LbError, Result};

#[derive(Args, Debug)]
pub struct ConfigArgs {
    /// Print the config file path instead of its contents
    #[arg(long)]
    pub path: bool,
}

pub fn run(ctx: &AppContext, args: &ConfigArgs) -> Result<()> {
    if args.path {
        if ctx.robot_mode {
            return emit_robot(&robot_ok(serde_json::json!({ "path": ctx.config_path })));
        }
        println!("{}", ctx.config_path.display());
        return Ok(());
    }

    if ctx.robot_mode {
        return emit_robot(&robot_ok(&ctx.config));
    }
    match ctx.output_format {
        OutputFormat::Human => {
            let config = &ctx.config;
            let mut layout = HumanLayout::new();
            layout
                .title("Effective configuration")
                .kv("Root", &ctx.root.display().to_string())
                .kv("Config file", &ctx.config_path.display().to_string())
                .blank()
                .section("display")
                .kv("show_score_column", &config.display.show_score_column.to_string())
                .kv("maintenance_mode", &config.display.maintenance_mode.to_string())
                .kv("external_link_url", &config.display.external_link_url)
                .blank()
                .section("database");
            for source in Source::ALL {
                layout.kv(
                    source.as_str(),
                    &config.database.path_for(source, &ctx.root).display().to_string(),
                );
            }
            layout
                .kv("busy_timeout_ms", &config.database.busy_timeout_ms.to_string())
                .blank()
                .section("scoring")
                .kv("window_days", &config.scoring.window_days.to_string())
                .blank()
                .section("pagination")
                .kv("default_page_size", &config.pagination.default_page_size.to_string())
                .kv("page_size_options", &format!("{:?}", config.pagination.page_size_options))
                .blank()
                .section("cache")
                .kv("enabled", &config.cache.enabled.to_string())
                .kv("capacity", &config.cache.capacity.to_string())
                .kv("ttl", &humantime_serde::re::humantime::format_duration(config.cache.ttl).to_string())
                .blank()
                .section("server")
                .kv("bind", &config.server.bind);
            emit_human(&layout);
            Ok(())
        }
        OutputFormat::Json | OutputFormat::Jsonl => emit_json(&ctx.config),
        OutputFormat::Plain | OutputFormat::Tsv => {
            let rendered = toml::to_string_pretty(&ctx.config)
                .map_err(|err| LbError::Serialization(err.to_string()))?;
            print!("{rendered}");
            Ok(())
        }
    }
}
