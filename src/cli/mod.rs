// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! CLI definitions for the cartosearch command-line interface.
//!
//! Two subcommands: `search` to query a snapshot the way the dashboard would,
//! and `inspect` to check a snapshot for dangling entries before shipping it.

pub mod display;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "cartosearch",
    about = "Offline fuzzy search over map layer keyword snapshots",
    version
)]
pub struct Cli {
    /// Log at debug level (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Search a snapshot and display grouped results
    Search {
        /// Path to offline_search_result.json (or a project.json next to it)
        file: String,

        /// Search query
        query: String,

        /// Maximum number of results (defaults to the configured limit)
        #[arg(short, long)]
        limit: Option<usize>,

        /// JSON config file (resultLimit, minQueryLen)
        #[arg(short, long)]
        config: Option<String>,

        /// Print results as JSON instead of the box view
        #[arg(long)]
        json: bool,
    },

    /// Inspect a snapshot's shape and validate its entries
    Inspect {
        /// Path to offline_search_result.json
        file: String,
    },
}
