//! Size, fee, sign, hash: in that order.
//!
//! ```text
//! Draft ──measure──► Sized ──apply_fee──► FeeSet ──sign──► Signed ──hash──► Hashed ──finish──► Serialized
//! ```
//!
//! Each step checks the stage it starts from and refuses to run out of
//! order. The fee depends on the size, the signature covers the fee and the
//! hash covers the signature, so any other order produces bytes whose hash
//! or signature does not match.
//!
//! Mutating the transaction through [`SigningPipeline::transaction_mut`]
//! after signing is allowed but leaves the recorded signature and hash stale;
//! [`Facade::verify_transaction`] will say so.

use tracing::debug;

use crate::crypto::{Hash256, KeyPair, Signature};
use crate::error::BuildError;
use crate::facade::Facade;

use super::objects::{Entity, Transaction};

/// Where a transaction is in the build pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BuildStage {
    Draft,
    Sized,
    FeeSet,
    Signed,
    Hashed,
    Serialized,
}

/// Output of a completed pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedTransaction {
    pub transaction: Transaction,
    pub hash: Hash256,
    pub payload: Vec<u8>,
}

impl SignedTransaction {
    pub fn payload_hex(&self) -> String {
        hex::encode_upper(&self.payload)
    }

    /// Submission body accepted by node `PUT /transactions` endpoints.
    pub fn to_json(&self) -> String {
        serde_json::json!({ "payload": self.payload_hex() }).to_string()
    }
}

/// Drives one transaction through the build stages.
pub struct SigningPipeline<'a> {
    facade: &'a Facade,
    transaction: Transaction,
    stage: BuildStage,
    size: usize,
    signature: Signature,
    hash: Hash256,
}

impl<'a> SigningPipeline<'a> {
    pub fn new(facade: &'a Facade, transaction: Transaction) -> Self {
        Self {
            facade,
            transaction,
            stage: BuildStage::Draft,
            size: 0,
            signature: Signature::zero(),
            hash: Hash256::zero(),
        }
    }

    pub fn stage(&self) -> BuildStage {
        self.stage
    }

    pub fn transaction(&self) -> &Transaction {
        &self.transaction
    }

    pub fn transaction_mut(&mut self) -> &mut Transaction {
        &mut self.transaction
    }

    fn expect_stage(&self, expected: BuildStage) -> Result<(), BuildError> {
        if self.stage != expected {
            return Err(BuildError::OutOfOrder {
                expected,
                actual: self.stage,
            });
        }
        Ok(())
    }

    /// Measures the serialized size with a zero signature in place.
    pub fn measure(&mut self) -> Result<usize, BuildError> {
        self.expect_stage(BuildStage::Draft)?;
        self.transaction.set_signature(&Signature::zero())?;
        self.size = self.transaction.size();
        self.stage = BuildStage::Sized;
        Ok(self.size)
    }

    /// Sets the fee with the facade's configured multiplier.
    pub fn apply_fee(&mut self) -> Result<u64, BuildError> {
        self.apply_fee_with(self.facade.options().fee_multiplier)
    }

    /// Sets `fee = multiplier x size`.
    pub fn apply_fee_with(&mut self, multiplier: u64) -> Result<u64, BuildError> {
        self.expect_stage(BuildStage::Sized)?;
        let fee = multiplier
            .checked_mul(self.size as u64)
            .ok_or(BuildError::FeeOverflow {
                multiplier,
                size: self.size,
            })?;
        self.transaction.set_fee(fee)?;
        self.stage = BuildStage::FeeSet;
        Ok(fee)
    }

    /// Signs and attaches the signature.
    pub fn sign(&mut self, key_pair: &KeyPair) -> Result<Signature, BuildError> {
        self.expect_stage(BuildStage::FeeSet)?;
        let signature = self.facade.sign_transaction(key_pair, &self.transaction)?;
        self.transaction.set_signature(&signature)?;
        self.signature = signature;
        self.stage = BuildStage::Signed;
        Ok(signature)
    }

    pub fn hash(&mut self) -> Result<Hash256, BuildError> {
        self.expect_stage(BuildStage::Signed)?;
        self.hash = self.facade.hash_transaction(&self.transaction)?;
        self.stage = BuildStage::Hashed;
        Ok(self.hash)
    }

    pub fn finish(mut self) -> Result<SignedTransaction, BuildError> {
        self.expect_stage(BuildStage::Hashed)?;
        self.stage = BuildStage::Serialized;
        let payload = self.transaction.serialize();
        debug!(
            type_name = self.transaction.type_name(),
            size = payload.len(),
            hash = %self.hash,
            "transaction serialized"
        );
        Ok(SignedTransaction {
            transaction: self.transaction,
            hash: self.hash,
            payload,
        })
    }

    /// Runs every remaining step with the configured fee multiplier.
    pub fn run(mut self, key_pair: &KeyPair) -> Result<SignedTransaction, BuildError> {
        self.measure()?;
        self.apply_fee()?;
        self.sign(key_pair)?;
        self.hash()?;
        self.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::PrivateKey;
    use crate::descriptor;
    use crate::network::Network;

    fn facade() -> Facade {
        Facade::new(Network::symbol_testnet()).unwrap()
    }

    fn key_pair(facade: &Facade) -> KeyPair {
        facade.key_pair(PrivateKey::from_bytes([9u8; 32]))
    }

    fn transfer(facade: &Facade) -> Transaction {
        facade
            .factory()
            .create(&descriptor! {
                "type" => "transfer_transaction",
                "signer_public_key" => key_pair(facade).public_key(),
                "message" => "pipeline",
                "deadline" => 1u64,
            })
            .unwrap()
    }

    #[test]
    fn stages_advance_in_order() {
        let facade = facade();
        let key_pair = key_pair(&facade);
        let mut pipeline = SigningPipeline::new(&facade, transfer(&facade));

        assert_eq!(pipeline.stage(), BuildStage::Draft);
        let size = pipeline.measure().unwrap();
        let fee = pipeline.apply_fee_with(10).unwrap();
        assert_eq!(fee, 10 * size as u64);
        pipeline.sign(&key_pair).unwrap();
        assert_eq!(pipeline.stage(), BuildStage::Signed);
        pipeline.hash().unwrap();
        let signed = pipeline.finish().unwrap();

        assert_eq!(signed.payload.len(), size);
        assert!(facade.verify_transaction(&signed.transaction, &signed.transaction.signature().unwrap()));
    }

    #[test]
    fn signing_before_fee_is_rejected() {
        let facade = facade();
        let key_pair = key_pair(&facade);
        let mut pipeline = SigningPipeline::new(&facade, transfer(&facade));
        pipeline.measure().unwrap();

        assert_eq!(
            pipeline.sign(&key_pair).unwrap_err(),
            BuildError::OutOfOrder {
                expected: BuildStage::FeeSet,
                actual: BuildStage::Sized
            }
        );
    }

    #[test]
    fn fee_overflow_is_reported() {
        let facade = facade();
        let mut pipeline = SigningPipeline::new(&facade, transfer(&facade));
        pipeline.measure().unwrap();
        assert!(matches!(
            pipeline.apply_fee_with(u64::MAX),
            Err(BuildError::FeeOverflow { .. })
        ));
    }

    #[test]
    fn submission_json() {
        let signed = SignedTransaction {
            transaction: transfer(&facade()),
            hash: Hash256::zero(),
            payload: vec![0xAB, 0x01],
        };
        assert_eq!(signed.to_json(), r#"{"payload":"AB01"}"#);
    }
}
