// src/cli/mod.rs
//
// Command-line interface module

mod args;
mod output;

pub use args::Args;
pub use output::{format_judgment, format_summary, ConsoleSink, JsonSink};

use anyhow::{Context, Result};
use clap::Parser;
use std::fs::OpenOptions;

use crate::batch::{self, BatchSummary};
use crate::config::JudgmentConfig;
use crate::detection::ReportSink;

/// Initialize `env_logger`; `RUST_LOG` wins over `level`
fn init_logging(level: log::LevelFilter, config: &JudgmentConfig) -> Result<()> {
    let mut builder = env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(level.to_string()),
    );
    builder.format_timestamp_millis();

    if let Some(path) = &config.log_file {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("Cannot open log file {}", path.display()))?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }

    builder
        .try_init()
        .context("Logger already initialized")?;
    Ok(())
}

/// Run the CLI: parse arguments, load configuration, process the batch
pub fn run() -> Result<BatchSummary> {
    let args = Args::parse();

    let mut config = JudgmentConfig::load(args.config.as_deref())?;
    args.apply_overrides(&mut config);
    config.validate()?;

    init_logging(args.log_level(&config), &config)?;
    log::debug!("Configuration: {:?}", config);

    let settings = args.run_settings();
    if settings.dry_run {
        log::info!("Test mode: files will not be renamed");
    }

    let sink: Box<dyn ReportSink> = if args.json {
        Box::new(JsonSink::new())
    } else {
        Box::new(ConsoleSink::new(&args.input, settings.dry_run))
    };

    let summary = batch::run(&args.input, &settings, &config, sink.as_ref())?;
    Ok(summary)
}
