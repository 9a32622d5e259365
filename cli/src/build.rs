//! The `build` and `address` commands.

use std::fs;

use anyhow::{anyhow, Context, Result};
use serde::Serialize;

use ledgerkit::config::{BuildOptions, DEFAULT_FEE_MULTIPLIER};
use ledgerkit::crypto::{KeyPair, PublicKey};
use ledgerkit::network::Network;
use ledgerkit::value::Value;
use ledgerkit::{Descriptor, Entity, Facade, TestVector};

use crate::cli::{AddressArgs, BuildArgs};

/// Test-vector record plus what the build produced.
#[derive(Debug, Serialize)]
pub struct BuildReport {
    #[serde(flatten)]
    pub vector: TestVector,
    pub size: usize,
    /// Transaction hash; absent for embedded transactions and blocks.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,
}

fn parse_network(text: &str) -> Result<Network> {
    Network::parse(text).ok_or_else(|| {
        anyhow!("unknown network `{text}` (expected symbol:mainnet, symbol:testnet, nem:mainnet or nem:testnet)")
    })
}

pub fn run_build(args: &BuildArgs) -> Result<BuildReport> {
    let network = parse_network(&args.network)?;
    let options = BuildOptions {
        autosort: !args.no_autosort,
        fee_multiplier: args.fee_multiplier.unwrap_or(DEFAULT_FEE_MULTIPLIER),
    };
    let facade = Facade::with_options(network, options)
        .with_context(|| format!("failed to prepare the {} registry", args.network))?;

    let text = fs::read_to_string(&args.descriptor)
        .with_context(|| format!("failed to read descriptor {}", args.descriptor.display()))?;
    let json: serde_json::Value = serde_json::from_str(&text)
        .with_context(|| format!("{} is not valid JSON", args.descriptor.display()))?;
    let descriptor = Descriptor::from_json(&json)?;

    let report = |schema_name: &str, payload: Vec<u8>, hash: Option<String>| BuildReport {
        vector: TestVector::new(schema_name, args.test_name.clone(), &payload, &descriptor),
        size: payload.len(),
        hash,
    };

    if args.embedded {
        let embedded = facade.factory().create_embedded(&descriptor)?;
        return Ok(report(embedded.type_name(), embedded.serialize(), None));
    }
    if args.block {
        let block = facade.factory().create_block(&descriptor)?;
        return Ok(report(block.type_name(), block.serialize(), None));
    }

    let mut transaction = facade.factory().create(&descriptor)?;
    let Some(private_key) = &args.private_key else {
        let hash = facade.hash_transaction(&transaction)?;
        return Ok(report(
            transaction.type_name(),
            transaction.serialize(),
            Some(hash.to_string()),
        ));
    };

    let key_pair = KeyPair::from_hex(private_key, facade.network().family.signature_scheme())?;
    transaction.set(
        "signer_public_key",
        Value::Bytes(key_pair.public_key().to_vec()),
    )?;
    let signed = facade.pipeline(transaction).run(&key_pair)?;
    tracing::info!(
        type_name = signed.transaction.type_name(),
        signer = %key_pair.public_key(),
        hash = %signed.hash,
        "transaction signed"
    );
    Ok(report(
        signed.transaction.type_name(),
        signed.payload,
        Some(signed.hash.to_string()),
    ))
}

pub fn run_address(args: &AddressArgs) -> Result<String> {
    let network = parse_network(&args.network)?;
    let public_key: PublicKey = args
        .public_key
        .parse()
        .with_context(|| format!("invalid public key `{}`", args.public_key))?;
    Ok(network.public_key_to_address(&public_key).to_string())
}
