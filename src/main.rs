use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{ArgAction, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commentary;
mod config;
mod forecast;
mod kpi;
mod models;
mod pipeline;
mod report;
mod risk;
mod sample;
mod validate;

use config::DashboardConfig;
use models::Dataset;
use report::{ReportFormat, ReportMeta};

#[derive(Parser)]
#[command(name = "kpi-pulse")]
#[command(about = "Executive KPI dashboard for monthly revenue and orders", long_about = None)]
struct Cli {
    /// TOML file with forecast horizon and risk policy overrides
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check that a CSV has valid Month, Revenue and Orders columns
    Validate {
        #[arg(long)]
        csv: PathBuf,
    },
    /// Print KPI cards, risk and forecast for the latest month
    Summary {
        #[arg(long)]
        csv: PathBuf,
        #[arg(long)]
        horizon: Option<usize>,
    },
    /// Write a full report
    Report {
        #[arg(long)]
        csv: PathBuf,
        #[arg(long)]
        horizon: Option<usize>,
        #[arg(long, value_enum, default_value_t = ReportFormat::Markdown)]
        format: ReportFormat,
        #[arg(long, default_value = "report.md")]
        out: PathBuf,
    },
    /// Write a sample CSV to start from
    Sample {
        #[arg(long, default_value = "sample.csv")]
        out: PathBuf,
    },
}

fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn load(csv: &Path) -> anyhow::Result<Dataset> {
    validate::load_dataset(csv).with_context(|| format!("failed to load {}", csv.display()))
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = DashboardConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Validate { csv } => {
            let dataset = load(&csv)?;
            let first = dataset.records.first().map(|r| r.month.as_str()).unwrap_or_default();
            let last = dataset.records.last().map(|r| r.month.as_str()).unwrap_or_default();
            println!(
                "{} is valid: {} months ({} to {}).",
                csv.display(),
                dataset.records.len(),
                first,
                last
            );
        }
        Commands::Summary { csv, horizon } => {
            let dataset = load(&csv)?;
            let config = config.with_horizon(horizon);
            let dashboard = pipeline::compute(&dataset, &config);

            match pipeline::summarize(&dashboard) {
                Some(summary) => print!("{}", report::render_summary(&summary)),
                None => println!("No periods found in {}.", csv.display()),
            }
        }
        Commands::Report {
            csv,
            horizon,
            format,
            out,
        } => {
            let dataset = load(&csv)?;
            let config = config.with_horizon(horizon);
            let dashboard = pipeline::compute(&dataset, &config);
            let contents = report::render(format, &ReportMeta::new(), &dashboard)
                .context("failed to render report")?;
            std::fs::write(&out, contents)
                .with_context(|| format!("failed to write {}", out.display()))?;
            info!(path = %out.display(), "report written");
            println!("Report written to {}.", out.display());
        }
        Commands::Sample { out } => {
            let written = sample::write_sample_file(&out)?;
            println!("Wrote {written} sample months to {}.", out.display());
        }
    }

    Ok(())
}
