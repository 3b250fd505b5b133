// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

use std::path::Path;
use std::time::Instant;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cartosearch::{
    snapshot_location, validate, FileSource, IndexSnapshot, OfflineSearch, SearchConfig,
    SnapshotSource,
};

mod cli;
use cli::{display, Cli, Commands};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Search {
            file,
            query,
            limit,
            config,
            json,
        } => run_search(&file, &query, limit, config.as_deref(), json),
        Commands::Inspect { file } => run_inspect(&file),
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();
}

/// Accept either the snapshot itself or the project file it sits next to.
fn resolve_snapshot_path(file: &str) -> String {
    if file.ends_with("project.json") {
        snapshot_location(file)
    } else {
        file.to_string()
    }
}

fn read_snapshot(file: &str) -> anyhow::Result<IndexSnapshot> {
    let path = resolve_snapshot_path(file);
    FileSource::new(".")
        .load_snapshot(&path)
        .with_context(|| format!("search unavailable: could not load {}", path))
}

fn run_search(
    file: &str,
    query: &str,
    limit: Option<usize>,
    config: Option<&str>,
    json: bool,
) -> anyhow::Result<()> {
    let config = match config {
        Some(path) => SearchConfig::from_path(Path::new(path))
            .with_context(|| format!("failed to read config {}", path))?,
        None => SearchConfig::default(),
    };
    let limit = limit.unwrap_or(config.result_limit);

    let search = OfflineSearch::new(config);
    search.load(read_snapshot(file)?);

    let start = Instant::now();
    let outcome = search.search_detailed(query, limit);
    let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;

    if json {
        println!("{}", serde_json::to_string_pretty(&outcome.results)?);
    } else {
        display::print_results(query, &outcome.results, outcome.skipped, elapsed_ms);
    }
    Ok(())
}

fn run_inspect(file: &str) -> anyhow::Result<()> {
    let snapshot = read_snapshot(file)?;
    let report = validate(&snapshot);
    display::print_report(&resolve_snapshot_path(file), &report);
    Ok(())
}
