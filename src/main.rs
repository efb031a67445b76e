use std::fs;
use std::path::PathBuf;

use aadhaar_analytics::calendar::{holidays_for, HolidayScope};
use aadhaar_analytics::config::AnalyticsConfig;
use aadhaar_analytics::core::RegionTable;
use aadhaar_analytics::io::load_dataset;
use aadhaar_analytics::pipeline::run_analysis;
use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "aadhaar-analytics")]
#[command(about = "Operational analytics over enrolment and update transactions", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load the category CSV directories and run every metric
    Run {
        /// Directory containing one sub-directory per category
        #[arg(long, env = "AADHAAR_DATA_ROOT")]
        data_root: PathBuf,
        /// TOML configuration file
        #[arg(long)]
        config: Option<PathBuf>,
        /// Output directory for analysis.json and daywise_insights.md
        #[arg(long, default_value = "output")]
        out: PathBuf,
    },
    /// Print the resolved holiday calendar
    Holidays {
        #[arg(long)]
        year: i32,
        /// State or union territory name; national holidays only when absent
        #[arg(long)]
        region: Option<String>,
    },
}

fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let regions = RegionTable::india();

    match cli.command {
        Commands::Run {
            data_root,
            config,
            out,
        } => {
            let config = match config {
                Some(path) => AnalyticsConfig::load(&path)
                    .with_context(|| format!("failed to load config {}", path.display()))?,
                None => AnalyticsConfig::default(),
            };

            let loaded = load_dataset(&data_root, &config.input)
                .with_context(|| format!("failed to load data from {}", data_root.display()))?;
            if loaded.dataset.is_empty() {
                bail!("no category data found under {}", data_root.display());
            }

            let report = run_analysis(&loaded.dataset, &config, &regions);

            fs::create_dir_all(&out)
                .with_context(|| format!("failed to create {}", out.display()))?;
            let json_path = out.join("analysis.json");
            let json = serde_json::to_string_pretty(&report).context("failed to encode report")?;
            fs::write(&json_path, json)
                .with_context(|| format!("failed to write {}", json_path.display()))?;
            let md_path = out.join("daywise_insights.md");
            fs::write(&md_path, report.insights_markdown())
                .with_context(|| format!("failed to write {}", md_path.display()))?;

            info!(
                json = %json_path.display(),
                insights = %md_path.display(),
                skipped = report.skipped.len(),
                "report written"
            );
            for skip in &report.skipped {
                println!("skipped {}: {}", skip.metric, skip.reason);
            }
        }
        Commands::Holidays { year, region } => {
            if let Some(name) = &region {
                if !regions.contains(name) {
                    bail!("unknown region '{name}'");
                }
            }
            let index = holidays_for(region.as_deref(), [year], &regions);
            for entry in index.entries() {
                let scope = match &entry.scope {
                    HolidayScope::National => "national".to_string(),
                    HolidayScope::Regional(code) => code.clone(),
                };
                println!("{}\t{:<8}\t{}", entry.date, scope, entry.name);
            }
            if !index.unsupported_regions().is_empty() {
                println!(
                    "no regional calendar for: {}",
                    index
                        .unsupported_regions()
                        .iter()
                        .cloned()
                        .collect::<Vec<_>>()
                        .join(", ")
                );
            }
        }
    }

    Ok(())
}
