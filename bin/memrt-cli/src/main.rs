// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # memrt
//!
//! Command-line diagnostics for the memrt runtime.
//!
//! ## Usage
//! ```bash
//! # Run the built-in end-to-end scenarios
//! memrt selftest
//!
//! # Time the raw engine per lane width
//! memrt bench --size 65536 --iterations 2000
//!
//! # Print the effective configuration
//! memrt --config memrt.toml config
//! ```

mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "memrt",
    about = "Diagnostics for the memrt memory runtime",
    version,
    author
)]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(short, long, global = true)]
    config: Option<std::path::PathBuf>,

    /// Enable verbose logging (repeat for more: -v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the end-to-end block, engine and allocator scenarios.
    Selftest,

    /// Time copy, move, find and fill for every lane width.
    Bench {
        /// Buffer size in bytes.
        #[arg(short, long, default_value_t = 64 * 1024)]
        size: usize,

        /// Repetitions per measurement.
        #[arg(short, long, default_value_t = 1000)]
        iterations: u32,
    },

    /// Print the effective configuration as TOML.
    Config,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    commands::init_tracing(cli.verbose);
    let config = commands::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Selftest => commands::selftest::execute(config),
        Commands::Bench { size, iterations } => commands::bench::execute(size, iterations),
        Commands::Config => commands::config::execute(&config),
    }
}
