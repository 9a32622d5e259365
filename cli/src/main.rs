// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # ledgerkit CLI
//!
//! Entry point for the `ledgerkit` binary. Parses arguments, installs
//! logging and dispatches to a subcommand:
//!
//! - `build`: descriptor file in, payload and hash out
//! - `address`: public key to network address
//! - `version`: print build version information

mod build;
mod cli;
mod logging;

use anyhow::{Context, Result};
use clap::Parser;

use cli::{Commands, LedgerkitCli};

fn main() -> Result<()> {
    let cli = LedgerkitCli::parse();
    logging::init_logging("ledgerkit=warn,ledgerkit_cli=info", cli.log_format);

    match cli.command {
        Commands::Build(args) => {
            tracing::info!(
                network = %args.network,
                descriptor = %args.descriptor.display(),
                "building"
            );
            let report = build::run_build(&args)?;
            let json =
                serde_json::to_string_pretty(&report).context("failed to encode the report")?;
            println!("{json}");
            Ok(())
        }
        Commands::Address(args) => {
            println!("{}", build::run_address(&args)?);
            Ok(())
        }
        Commands::Version => {
            print_version();
            Ok(())
        }
    }
}

/// Prints version information to stdout.
fn print_version() {
    println!("ledgerkit {}", env!("CARGO_PKG_VERSION"));
    println!("rustc     {}", rustc_version());
}

/// Rust compiler version, when the build exported it.
fn rustc_version() -> &'static str {
    option_env!("RUSTC_VERSION").unwrap_or("unknown")
}
