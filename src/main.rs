use std::{
    fs::File,
    io::{self, BufReader, BufWriter, Write},
    path::PathBuf,
};

use anyhow::{Context, Result};
use clap::Parser;
use owo_colors::OwoColorize;
use serde::Serialize;
use tracing::error;
use tracing_subscriber::EnvFilter;

use crate::{
    cli::{Cli, Command, Input},
    config::{ServiceConfig, ServiceOverrides},
    pipeline::{Pipeline, RunSummary},
    service::{ExtractionCache, Extractor, OllamaClient},
};

mod cli;
mod config;
mod gate;
mod normalize;
mod parse;
mod pattern;
mod pipeline;
mod record;
mod service;
mod table;

fn main() {
    init_tracing();

    if let Err(err) = run() {
        error!(error = %err, "command failed");
        for cause in err.chain().skip(1) {
            error!(cause = %cause, "caused by");
        }
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let args = Cli::parse();
    match args.command {
        Command::Parse {
            input,
            output,
            model,
            url,
            connect_timeout,
            limit,
            show_every,
            no_color,
        } => {
            let config = ServiceConfig::resolve(ServiceOverrides {
                model,
                endpoint: url,
                connect_timeout_secs: connect_timeout,
            })?;
            let color = !no_color && std::env::var_os("NO_COLOR").is_none();
            run_parse(input, output, config, limit, show_every, color)
        }
        Command::Check { texts } => run_check(&texts),
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn run_parse(
    input: Input,
    output: Option<PathBuf>,
    config: ServiceConfig,
    limit: Option<usize>,
    show_every: usize,
    color: bool,
) -> Result<()> {
    let entries = match &input {
        Input::Stdin => table::read_entries(io::stdin().lock(), limit)?,
        Input::File(path) => {
            let file = File::open(path)
                .with_context(|| format!("failed to open input: {}", path.display()))?;
            table::read_entries(BufReader::new(file), limit)
                .with_context(|| format!("failed to read input: {}", path.display()))?
        }
    };
    tracing::info!(rows = entries.len(), "fetched conference rows for parsing");

    let client = OllamaClient::new(config.endpoint, config.model, config.connect_timeout);
    tracing::info!(endpoint = %client.endpoint(), model = client.model(), "extraction service");

    let mut pipeline = Pipeline::new(Extractor::new(client, ExtractionCache::new()))
        .with_display(show_every, Box::new(io::stderr()));
    let records = pipeline.run(entries)?;

    match &output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create output: {}", path.display()))?;
            table::write_records(BufWriter::new(file), &records)
                .with_context(|| format!("failed to write output: {}", path.display()))?;
            tracing::info!(path = %path.display(), rows = records.len(), "wrote parsed rows");
        }
        None => table::write_records(io::stdout().lock(), &records)?,
    }

    print_summary(&pipeline.summary(), color)?;
    Ok(())
}

fn print_summary(summary: &RunSummary, color: bool) -> Result<()> {
    let mut err = io::stderr().lock();
    let done = format!("✓ {}", summary.extracted);
    let cached = format!("↺ {}", summary.cached);
    let failed = format!("✗ {}", summary.fallback);
    let skipped = format!("- {}", summary.skipped);
    if color {
        writeln!(
            err,
            "{} rows: {} extracted  {} cached  {} fallback  {} skipped",
            summary.total(),
            done.green(),
            cached.cyan(),
            failed.red(),
            skipped.dimmed()
        )?;
    } else {
        writeln!(
            err,
            "{} rows: {done} extracted  {cached} cached  {failed} fallback  {skipped} skipped",
            summary.total()
        )?;
    }
    Ok(())
}

/// Offline view of what the heuristics make of a string.
#[derive(Serialize)]
struct CheckReport<'a> {
    text: &'a str,
    extract: bool,
    conf_name: String,
    conf_order: Option<u32>,
}

fn run_check(texts: &[String]) -> Result<()> {
    let mut out = io::stdout().lock();
    for text in texts {
        let report = CheckReport {
            text,
            extract: gate::should_extract(Some(text.as_str())),
            conf_name: normalize::normalize_name(text),
            conf_order: parse::extract_order(text),
        };
        writeln!(out, "{}", serde_json::to_string(&report)?)?;
    }
    Ok(())
}
