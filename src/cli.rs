//! Command-line interface components.

use crate::constants::LOG_TARGET;
use crate::processor::{LoggedDataReport, OperationOutcome, OperationReport, ProcessingReport};
use crate::summary::{ApplicationSummary, HarvestSummary, OperationSummary, PlantingSummary};
use clap::{Parser, ValueEnum};
use colored::*;
use std::fmt::Write;
use std::path::PathBuf;
use tracing::debug;

#[derive(Parser, Debug)]
#[command(name = "fieldlog")]
#[command(about = "Summarise harvest, planting and as-applied field operation logs")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Args {
    /// Dataset JSON files or directories to search for them
    #[arg(value_name = "INPUT", required = true)]
    pub inputs: Vec<PathBuf>,

    /// Aggregator configuration file (JSON)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Output format for the summaries
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Show a progress bar over operations
    #[arg(long)]
    pub progress: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Only log warnings and errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

impl Args {
    /// Determine the appropriate log level based on verbosity flags
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            "warn"
        } else if self.verbose {
            "debug"
        } else {
            "info"
        }
    }
}

/// Set up structured logging on stderr
pub fn setup_logging(args: &Args) {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let log_level = args.get_log_level();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{}={}", LOG_TARGET, log_level)));

    if args.quiet {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_timer(fmt::time::uptime())
                    .with_writer(std::io::stderr),
            )
            .init();
    }

    debug!("Logging initialized at level: {}", log_level);
}

/// Render a report as console text
pub fn render_text(report: &ProcessingReport) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "{}", report.file_set.bright_blue().bold());
    for block in &report.logged_data {
        render_logged_data(&mut out, block);
    }

    let stats = &report.stats;
    let _ = writeln!(out, "{}", "━".repeat(48));
    let _ = writeln!(
        out,
        "{} summarized, {} failed, {} unsupported in {} ms",
        stats.operations_summarized.to_string().bright_green().bold(),
        stats.operations_failed.to_string().red(),
        stats.operations_unsupported,
        stats.processing_time_ms
    );
    out
}

fn render_logged_data(out: &mut String, block: &LoggedDataReport) {
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", block.description.bold());
    for (label, value) in [
        ("Grower", &block.grower),
        ("Farm", &block.farm),
        ("Field", &block.field),
    ] {
        if let Some(value) = value {
            let _ = writeln!(out, "  {label}: {value}");
        }
    }

    for operation in &block.operations {
        render_operation(out, operation);
    }
}

fn render_operation(out: &mut String, operation: &OperationReport) {
    let heading = format!(
        "  {} operation {}",
        operation.operation_type, operation.operation_id
    );
    match &operation.outcome {
        OperationOutcome::Summarized { summary } => {
            let _ = writeln!(out, "{}", heading.cyan());
            match summary {
                OperationSummary::Harvest(s) => render_harvest(out, s),
                OperationSummary::Planting(s) => render_planting(out, s),
                OperationSummary::Application(s) => render_application(out, s),
            }
        }
        OperationOutcome::Failed { error } => {
            let _ = writeln!(out, "{} {}", heading.red(), error);
        }
        OperationOutcome::Unsupported => {
            let _ = writeln!(out, "{} {}", heading.dimmed(), "(not summarised)".dimmed());
        }
    }
}

fn render_harvest(out: &mut String, s: &HarvestSummary) {
    let _ = writeln!(out, "    Area: {:.2} ac", s.total_area);
    let _ = writeln!(out, "    Wet mass: {:.2}", s.total_wet_mass);
    let _ = writeln!(out, "    Average moisture: {:.2}", s.average_moisture);
    let _ = writeln!(out, "    Dry volume: {:.2}", s.total_dry_volume);
}

fn render_planting(out: &mut String, s: &PlantingSummary) {
    let units = s.rate_units.as_deref().unwrap_or("");
    for product in &s.products {
        let name = product
            .description
            .clone()
            .unwrap_or_else(|| format!("Product {}", product.product_id));
        let _ = writeln!(out, "    {}", name.bold());
        let _ = writeln!(out, "      Area: {:.2} ac", product.total_area);
        let _ = writeln!(out, "      Amount: {:.2}", product.total_amount);
        let _ = writeln!(out, "      Rate: {:.2} {}", product.average_rate, units);
    }
}

fn render_application(out: &mut String, s: &ApplicationSummary) {
    let units = s.rate_units.as_deref().unwrap_or("");
    if let Some(product) = &s.product {
        let name = product
            .description
            .clone()
            .unwrap_or_else(|| format!("Product {}", product.product_id));
        let _ = writeln!(out, "    {}", name.bold());
    }
    let _ = writeln!(out, "    Area: {:.2} ac", s.total_area);
    let _ = writeln!(out, "    Amount: {:.2}", s.total_amount);
    let _ = writeln!(out, "    Rate: {:.2} {}", s.average_rate, units);

    let Some(mix) = s.product.as_ref().and_then(|p| p.mix.as_ref()) else {
        return;
    };
    let _ = writeln!(out, "    Tank mix ({:.2} units)", mix.total_units);
    for component in &mix.components {
        let name = component
            .description
            .clone()
            .unwrap_or_else(|| format!("Ingredient {}", component.ingredient_id));
        let _ = writeln!(
            out,
            "      {}: {:.2} {} ({:.2} {} per acre)",
            name, component.amount, component.unit_code, component.rate, component.unit_code
        );
    }
}
