//! Surveyflow - Student Survey Dashboard Generator
//!
//! Loads a student survey CSV and renders one static dashboard image:
//! a support/higher-education flow diagram, mean weekend alcohol use by
//! age (line) and the same mean by absences (bars).

mod charts;
mod config;
mod data;
mod stats;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing::{error, info};

use charts::DashboardRenderer;
use config::DashboardConfig;
use data::DataLoader;
use stats::SurveySummary;

#[derive(Parser)]
#[command(name = "surveyflow")]
#[command(about = "Render a student survey CSV as a static dashboard", long_about = None)]
struct Cli {
    /// Survey CSV file (student-mat format)
    #[arg(default_value = "student-mat.csv")]
    csv: PathBuf,

    /// Output PNG path
    #[arg(long, default_value = "dashboard.png")]
    out: PathBuf,

    /// Surface width in pixels (overrides the config file)
    #[arg(long)]
    width: Option<u32>,

    /// Surface height in pixels (overrides the config file)
    #[arg(long)]
    height: Option<u32>,

    /// JSON layout configuration
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("dashboard not generated: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let mut config = match &cli.config {
        Some(path) => DashboardConfig::from_file(path)?,
        None => DashboardConfig::default(),
    };
    if let Some(width) = cli.width {
        config.width = width;
    }
    if let Some(height) = cli.height {
        config.height = height;
    }

    let mut loader = DataLoader::new();
    loader
        .load_csv(cli.csv.to_string_lossy().as_ref())
        .with_context(|| format!("failed to load {}", cli.csv.display()))?;
    info!(
        "loaded {} survey rows from {}",
        loader.get_row_count(),
        cli.csv.display()
    );
    let records = loader.records()?;

    let summary = SurveySummary::from_records(&records);
    info!(
        "aggregated {} flow nodes, {} flow edges, {} age groups, {} absence groups",
        summary.support_flow.nodes.len(),
        summary.support_flow.edges.len(),
        summary.walc_by_age.len(),
        summary.walc_by_absences.len()
    );

    let renderer = DashboardRenderer::new(config);
    renderer
        .render_to_file(&summary, &cli.out)
        .with_context(|| format!("failed to render {}", cli.out.display()))?;
    info!("dashboard written to {}", cli.out.display());

    Ok(())
}
