//! lb stats - Totals, max score and last update per source

use clap::Args;
use serde::Serialize;

use crate::app::AppContext;
use crate::cli::output::{Formattable, HumanLayout, OutputFormat, emit_robot, robot_ok};
use crate::core::{LeaderboardFetcher, LeaderboardStats, Source};
use crate::error::Result;

#[derive(Args, Debug)]
pub struct StatsArgs {
    /// Only this source (default: both)
    #[arg(value_enum)]
    pub source: Option<Source>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SourceStats {
    pub source: Source,
    pub label: &'static str,
    #[serde(flatten)]
    pub stats: LeaderboardStats,
}

#[derive(Debug, Clone, Serialize)]
pub struct StatsReport {
    pub sources: Vec<SourceStats>,
}

impl StatsReport {
    pub fn collect(fetcher: &dyn LeaderboardFetcher, sources: &[Source]) -> Result<Self> {
        let sources = sources
            .iter()
            .map(|&source| {
                let result_set = fetcher.fetch(source)?;
                Ok(SourceStats {
                    source,
                    label: source.label(),
                    stats: result_set.stats(),
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { sources })
    }
}

impl Formattable for StatsReport {
    fn format(&self, fmt: OutputFormat) -> String {
        match fmt {
            OutputFormat::Human => {
                let mut layout = HumanLayout::new();
                for (idx, entry) in self.sources.iter().enumerate() {
                    if idx > 0 {
                        layout.blank();
                    }
                    layout
                        .section(entry.label)
                        .kv("Producers", &entry.stats.total_count.to_string())
                        .kv("Max score", &entry.stats.max_score.to_string())
                        .kv(
                            "Last updated",
                            entry.stats.last_modified.as_deref().unwrap_or("never"),
                        );
                }
                layout.build()
            }
            OutputFormat::Json => serde_json::to_string_pretty(self).unwrap_or_default(),
            OutputFormat::Jsonl => self
                .sources
                .iter()
                .filter_map(|entry| serde_json::to_string(entry).ok())
                .collect::<Vec<_>>()
                .join("\n"),
            OutputFormat::Plain | OutputFormat::Tsv => {
                let rows = self.sources.iter().map(|entry| {
                    format!(
                        "{}\t{}\t{}\t{}",
                        entry.source,
                        entry.stats.total_count,
                        entry.stats.max_score,
                        entry.stats.last_modified.as_deref().unwrap_or("")
                    )
                });
                if fmt == OutputFormat::Tsv {
                    std::iter::once("source\ttotal_count\tmax_score\tlast_modified".to_string())
                        .chain(rows)
                        .collect::<Vec<_>>()
                        .join("\n")
                } else {
                    rows.collect::<Vec<_>>().join("\n")
                }
            }
        }
    }
}

pub fn run(ctx: &AppContext, args: &StatsArgs) -> Result<()> {
    let sources: Vec<Source> = args.source.map_or_else(|| Source::ALL.to_vec(), |s| vec![s]);
    let report = StatsReport::collect(&*ctx.stores, &sources)?;

    if ctx.robot_mode {
        return emit_robot(&robot_ok(&report));
    }
    println!("{}", report.format(ctx.output_format));
    Ok(())
}
