//! # CLI Interface
//!
//! Defines the command-line argument structure for `cosmwasm-codec` using
//! `clap` derive. Supports five subcommands: `address`, `validate`,
//! `sign-bytes`, `parse` and `version`.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Transaction codec for CosmWasm-based chains.
///
/// Derives addresses, previews the exact bytes a key would sign and parses
/// broadcastable transactions back into readable JSON. Never touches keys
/// or the network.
#[derive(Parser, Debug)]
#[command(
    name = "cosmwasm-codec",
    about = "Transaction signing and wire codec for CosmWasm-based chains",
    version,
    propagate_version = true
)]
pub struct CodecCli {
    /// Log output format: `pretty` or `json`. Logs go to stderr.
    #[arg(long, global = true, env = "COSMWASM_CODEC_LOG_FORMAT", default_value = "pretty")]
    pub log_format: String,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Derive the bech32 address of a hex-encoded public key.
    Address(AddressArgs),
    /// Check an address and print its prefix and digest.
    Validate(ValidateArgs),
    /// Print the canonical JSON sign bytes of an unsigned transaction.
    SignBytes(SignBytesArgs),
    /// Parse legacy postable bytes back into a signed transaction.
    Parse(ParseArgs),
    /// Print version information and exit.
    Version,
}

/// Arguments for the `address` subcommand.
#[derive(Parser, Debug)]
pub struct AddressArgs {
    /// Public key bytes, hex encoded (33-byte compressed secp256k1 or
    /// 32-byte ed25519).
    pub pubkey: String,

    /// Bech32 prefix of the target network.
    #[arg(long, env = "COSMWASM_CODEC_PREFIX", default_value = "cosmos")]
    pub prefix: String,
}

/// Arguments for the `validate` subcommand.
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Address to check.
    pub address: String,
}

/// Codec configuration shared by the transaction subcommands.
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    /// Path to a JSON codec configuration file.
    ///
    /// When omitted, the built-in defaults are used.
    #[arg(long, short = 'c', env = "COSMWASM_CODEC_CONFIG")]
    pub config: Option<PathBuf>,

    /// Overrides the prefix from the configuration file.
    #[arg(long, env = "COSMWASM_CODEC_PREFIX")]
    pub prefix: Option<String>,
}

/// Arguments for the `sign-bytes` subcommand.
#[derive(Parser, Debug)]
pub struct SignBytesArgs {
    /// Path to an unsigned transaction in JSON.
    pub tx: PathBuf,

    /// Account number of the signer.
    #[arg(long)]
    pub account_number: u64,

    /// Sequence of the signer.
    #[arg(long)]
    pub sequence: u64,

    #[command(flatten)]
    pub config: ConfigArgs,
}

/// Arguments for the `parse` subcommand.
#[derive(Parser, Debug)]
pub struct ParseArgs {
    /// Path to legacy postable bytes (wrapped StdTx JSON).
    pub postable: PathBuf,

    /// Chain the transaction was built for.
    #[arg(long)]
    pub chain_id: String,

    /// Account number of the signer. Not present on the wire.
    #[arg(long)]
    pub account_number: u64,

    /// Sequence of the signer. Not present on the wire.
    #[arg(long)]
    pub sequence: u64,

    #[command(flatten)]
    pub config: ConfigArgs,
}
