// Copyright (c) 2026 CosmWasm Codec Contributors. Apache-2.0 License.
// See LICENSE for details.

//! # CosmWasm Codec CLI
//!
//! Entry point for the `cosmwasm-codec` binary. Parses CLI arguments,
//! initializes logging and runs one codec operation, printing the result
//! to stdout.
//!
//! - `address`   : derive a bech32 address from a public key
//! - `validate`  : check an address and show its prefix and digest
//! - `sign-bytes`: canonical JSON sign bytes of an unsigned transaction
//! - `parse`     : legacy postable bytes back to a signed transaction
//! - `version`   : print build version information
//!
//! Message kinds not listed in the configuration are registered with the
//! generic JSON codec on the fly, so any transaction file can be inspected.

mod cli;
mod logging;

use anyhow::{Context, Result};
use clap::Parser;
use std::path::Path;
use std::sync::Arc;

use cosmwasm_codec::address::decode_address;
use cosmwasm_codec::legacy::unmarshal_tx;
use cosmwasm_codec::{
    derive_address, json_codec, CodecConfig, MessageRegistry, PostableBytes, TransactionCodec,
    UnsignedTransaction,
};

use cli::{CodecCli, Commands, ConfigArgs};
use logging::LogFormat;

fn main() -> Result<()> {
    let cli = CodecCli::parse();
    logging::init_logging(logging::DEFAULT_FILTER, LogFormat::from_str_lossy(&cli.log_format));

    let output = match cli.command {
        Commands::Address(args) => address(&args)?,
        Commands::Validate(args) => validate(&args)?,
        Commands::SignBytes(args) => sign_bytes(&args)?,
        Commands::Parse(args) => parse(&args)?,
        Commands::Version => version(),
    };
    println!("{output}");
    Ok(())
}

fn address(args: &cli::AddressArgs) -> Result<String> {
    let pubkey = hex::decode(args.pubkey.trim()).context("public key is not valid hex")?;
    let address = derive_address(&pubkey, &args.prefix)
        .with_context(|| format!("failed to derive address with prefix {}", args.prefix))?;
    tracing::info!(prefix = %args.prefix, pubkey_len = pubkey.len(), "derived address");
    Ok(address)
}

fn validate(args: &cli::ValidateArgs) -> Result<String> {
    let (prefix, digest) = decode_address(&args.address)
        .with_context(|| format!("invalid address {}", args.address))?;
    Ok(format!(
        "valid\nprefix: {}\ndigest: {}",
        prefix,
        hex::encode(digest)
    ))
}

fn sign_bytes(args: &cli::SignBytesArgs) -> Result<String> {
    let raw = read_file(&args.tx)?;
    let unsigned: UnsignedTransaction = serde_json::from_slice(&raw)
        .with_context(|| format!("failed to parse transaction {}", args.tx.display()))?;

    let type_urls = unsigned.messages.iter().map(|m| m.type_url.as_str());
    let codec = load_codec(&args.config, type_urls)?;
    let nonce = codec.nonces().encode(args.account_number, args.sequence)?;
    let job = codec
        .bytes_to_sign(&unsigned, &nonce)
        .context("failed to build sign bytes")?;

    tracing::info!(
        chain_id = %unsigned.chain_id,
        messages = unsigned.messages.len(),
        len = job.bytes.len(),
        prehash = ?job.prehash,
        "built sign bytes"
    );
    String::from_utf8(job.bytes).context("sign bytes are not UTF-8")
}

fn parse(args: &cli::ParseArgs) -> Result<String> {
    let raw = read_file(&args.postable)?;
    let wrapped = unmarshal_tx(&raw)
        .with_context(|| format!("failed to parse postable bytes {}", args.postable.display()))?;

    let names: Vec<&str> = wrapped
        .value
        .msg
        .iter()
        .filter_map(|m| m.get("type").and_then(|t| t.as_str()))
        .collect();
    let codec = load_codec(&args.config, names.iter().copied())?;
    let nonce = codec.nonces().encode(args.account_number, args.sequence)?;
    let signed = codec
        .parse_bytes(&PostableBytes::legacy(raw), &args.chain_id, Some(nonce))
        .context("failed to decode transaction")?;

    tracing::info!(
        chain_id = %args.chain_id,
        signatures = signed.signatures.len(),
        "parsed legacy transaction"
    );
    Ok(serde_json::to_string_pretty(&signed)?)
}

fn version() -> String {
    format!(
        "cosmwasm-codec {}\nmax nonce digits {}",
        env!("CARGO_PKG_VERSION"),
        cosmwasm_codec::config::MAX_NONCE_DIGITS,
    )
}

fn read_file(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))
}

/// Loads the configuration, applies overrides and registers every message
/// name in `seen` that the configuration does not already cover.
fn load_codec<'a>(
    args: &ConfigArgs,
    seen: impl IntoIterator<Item = &'a str>,
) -> Result<TransactionCodec> {
    let mut config = match &args.config {
        Some(path) => CodecConfig::from_json(&read_file(path)?)
            .with_context(|| format!("invalid configuration {}", path.display()))?,
        None => CodecConfig::default(),
    };
    if let Some(prefix) = &args.prefix {
        config.prefix = prefix.clone();
    }

    let registry = Arc::new(MessageRegistry::new());
    let codec = TransactionCodec::from_config(&config, Arc::clone(&registry))
        .context("failed to build codec")?;

    for name in seen {
        if !registry.contains_legacy(name) {
            tracing::debug!(%name, "registering generic JSON codec");
            registry.register_codec(name, json_codec())?;
        }
    }
    Ok(codec)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;
    use tempfile::NamedTempFile;

    const FAUCET_PUBKEY: &str = "034f04181eeba35391b858633a765c4a0c189697b40d216354d50890d350c70290";

    fn write_temp(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    fn no_config() -> ConfigArgs {
        ConfigArgs {
            config: None,
            prefix: None,
        }
    }

    fn tx_file() -> NamedTempFile {
        write_temp(
            r#"{
                "chain_id": "testing",
                "memo": "test",
                "messages": [{"type_url": "/demo.Msg", "value": {"b": 1, "a": 2}}],
                "fee": {"tokens": [{"quantity": "5000", "fractional_digits": 6, "token_ticker": "ATOM"}], "gas_limit": "200000"}
            }"#,
        )
    }

    #[test]
    fn address_of_known_key() {
        let out = address(&cli::AddressArgs {
            pubkey: FAUCET_PUBKEY.into(),
            prefix: "cosmos".into(),
        })
        .unwrap();
        assert_eq!(out, "cosmos1pkptre7fdkl6gfrzlesjjvhxhlc3r4gmmk8rs6");
    }

    #[test]
    fn address_rejects_bad_hex() {
        assert!(address(&cli::AddressArgs {
            pubkey: "zz".into(),
            prefix: "cosmos".into(),
        })
        .is_err());
    }

    #[test]
    fn validate_reports_prefix() {
        let out = validate(&cli::ValidateArgs {
            address: "cosmos1pkptre7fdkl6gfrzlesjjvhxhlc3r4gmmk8rs6".into(),
        })
        .unwrap();
        assert!(out.starts_with("valid\nprefix: cosmos\n"));
        assert!(validate(&cli::ValidateArgs {
            address: "cosmos1pkptre7fdkl6gfrzlesjjvhxhlc3r4gmmk8rs7".into(),
        })
        .is_err());
    }

    #[test]
    fn sign_bytes_from_file() {
        let tx = tx_file();
        let out = sign_bytes(&cli::SignBytesArgs {
            tx: tx.path().to_path_buf(),
            account_number: 7,
            sequence: 0,
            config: no_config(),
        })
        .unwrap();
        assert!(out.starts_with(r#"{"account_number":"7","chain_id":"testing""#));
        assert!(out.contains(r#""msgs":[{"type":"/demo.Msg","value":{"a":2,"b":1}}]"#));
        assert!(out.ends_with(r#""sequence":"0"}"#));
    }

    #[test]
    fn sign_bytes_uses_legacy_names_from_config() {
        let tx = tx_file();
        let config = write_temp(
            r#"{"messages": [{"type_url": "/demo.Msg", "legacy_type": "demo/Msg"}]}"#,
        );
        let out = sign_bytes(&cli::SignBytesArgs {
            tx: tx.path().to_path_buf(),
            account_number: 1,
            sequence: 1,
            config: ConfigArgs {
                config: Some(config.path().to_path_buf()),
                prefix: None,
            },
        })
        .unwrap();
        assert!(out.contains(r#""type":"demo/Msg""#));
    }

    #[test]
    fn sign_bytes_respects_configured_nonce_bound() {
        let tx = tx_file();
        let config = write_temp(r#"{"max_nonce_digits": 3}"#);
        let err = sign_bytes(&cli::SignBytesArgs {
            tx: tx.path().to_path_buf(),
            account_number: 1000,
            sequence: 0,
            config: ConfigArgs {
                config: Some(config.path().to_path_buf()),
                prefix: None,
            },
        });
        assert!(err.is_err());
    }

    #[test]
    fn parse_postable_file() {
        let postable = write_temp(
            r#"{"type":"cosmos-sdk/StdTx","value":{
                "msg":[{"type":"demo/Msg","value":{"a":1}}],
                "fee":{"amount":[{"denom":"uatom","amount":"5000"}],"gas":"200000"},
                "signatures":[],
                "memo":"hello"
            }}"#,
        );
        let out = parse(&cli::ParseArgs {
            postable: postable.path().to_path_buf(),
            chain_id: "testing".into(),
            account_number: 1,
            sequence: 2,
            config: no_config(),
        })
        .unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["transaction"]["memo"], "hello");
        assert_eq!(value["transaction"]["chain_id"], "testing");
        assert_eq!(value["transaction"]["messages"][0]["type_url"], "demo/Msg");
    }

    #[test]
    fn missing_file_has_context() {
        let err = sign_bytes(&cli::SignBytesArgs {
            tx: PathBuf::from("/nonexistent/tx.json"),
            account_number: 1,
            sequence: 1,
            config: no_config(),
        })
        .unwrap_err();
        assert!(err.to_string().contains("failed to read"));
    }
}
