use anyhow::{Context, Result};
use clap::Parser;
use colored::*;
use fieldlog_processor::cli::{self, Args, OutputFormat};
use fieldlog_processor::loader::{discover_datasets, load_dataset};
use fieldlog_processor::{AggregatorConfig, DatasetProcessor};
use std::path::Path;
use std::process;
use tracing::{error, info};

fn main() {
    let args = Args::parse();
    cli::setup_logging(&args);

    match run(&args) {
        Ok(true) => process::exit(0),
        Ok(false) => process::exit(1),
        Err(error) => {
            eprintln!("{} {:#}", "Error:".red().bold(), error);
            process::exit(1);
        }
    }
}

/// Process every input; returns false when any dataset could not be handled
fn run(args: &Args) -> Result<bool> {
    let mut config = match &args.config {
        Some(path) => AggregatorConfig::from_file(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
        None => AggregatorConfig::default(),
    };
    if args.progress {
        config = config.with_progress();
    }
    let processor = DatasetProcessor::new(config);

    let mut files = Vec::new();
    for input in &args.inputs {
        files.extend(
            discover_datasets(input)
                .with_context(|| format!("Failed to read input {}", input.display()))?,
        );
    }
    info!("Processing {} dataset file(s)", files.len());

    let mut all_ok = true;
    for file in &files {
        if let Err(error) = process_file(&processor, file, args.format) {
            error!("{:#}", error);
            all_ok = false;
        }
    }
    Ok(all_ok)
}

fn process_file(processor: &DatasetProcessor, path: &Path, format: OutputFormat) -> Result<()> {
    let dataset = load_dataset(path)
        .with_context(|| format!("Failed to load dataset {}", path.display()))?;
    let report = processor
        .process(dataset)
        .with_context(|| format!("Processing aborted for {}", path.display()))?;

    match format {
        OutputFormat::Text => print!("{}", cli::render_text(&report)),
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string_pretty(&report).context("Failed to serialise report")?
        ),
    }
    Ok(())
}
