//! # CLI Interface
//!
//! Argument structure for the `ledgerkit` binary: `build`, `address` and
//! `version`.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::logging::LogFormat;

/// Build, sign and hash Symbol and NEM transactions from JSON descriptors.
#[derive(Parser, Debug)]
#[command(
    name = "ledgerkit",
    about = "Schema-driven transaction builder for Symbol and NEM",
    version,
    propagate_version = true
)]
pub struct LedgerkitCli {
    /// Log output format (logs go to stderr).
    #[arg(long, global = true, value_enum, env = "LEDGERKIT_LOG_FORMAT", default_value = "pretty")]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build an entity from a descriptor file and print its test-vector
    /// record as JSON.
    Build(BuildArgs),
    /// Derive the address of a public key.
    Address(AddressArgs),
    /// Print version information and exit.
    Version,
}

#[derive(Args, Debug, Clone)]
pub struct BuildArgs {
    /// Target network as `family:name`, e.g. `symbol:testnet` or `nem:mainnet`.
    #[arg(long, short = 'n', env = "LEDGERKIT_NETWORK", default_value = "symbol:testnet")]
    pub network: String,

    /// Path to the JSON descriptor.
    #[arg(long, short = 'd', env = "LEDGERKIT_DESCRIPTOR")]
    pub descriptor: PathBuf,

    /// Keep array order exactly as written in the descriptor.
    #[arg(long)]
    pub no_autosort: bool,

    /// Build an embedded transaction instead of a standalone one.
    #[arg(long, conflicts_with = "block")]
    pub embedded: bool,

    /// Build a block instead of a transaction.
    #[arg(long)]
    pub block: bool,

    /// Fee per serialized byte. Only used when signing.
    #[arg(long, env = "LEDGERKIT_FEE_MULTIPLIER")]
    pub fee_multiplier: Option<u64>,

    /// Hex private key. When given, the transaction is sized, charged,
    /// signed and hashed.
    ///
    /// Prefer the environment variable over the flag so the key stays out
    /// of shell history.
    #[arg(long, env = "LEDGERKIT_PRIVATE_KEY", hide_env_values = true)]
    pub private_key: Option<String>,

    /// Name recorded in the output record.
    #[arg(long, default_value = "cli")]
    pub test_name: String,
}

#[derive(Args, Debug, Clone)]
pub struct AddressArgs {
    /// Target network as `family:name`.
    #[arg(long, short = 'n', env = "LEDGERKIT_NETWORK", default_value = "symbol:testnet")]
    pub network: String,

    /// Hex public key.
    #[arg(long)]
    pub public_key: String,
}
