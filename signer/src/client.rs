use crate::{
    error::{Result, SignerError},
    network::Network,
    types::{FeePayer, SignedData, SignedTransaction, TransactionPayload},
};
use alloy_primitives::{keccak256, Address, Signature, B256};
use alloy_signer::SignerSync;
use alloy_signer_local::PrivateKeySigner;
use serde_json::{json, Value};
use std::str::FromStr;
use tracing::{debug, info};

/// Attaches fee-payer signatures to unsigned transactions
pub trait TransactionSigner {
    fn derive_public_key(&self, private_key: &str) -> Result<Address>;

    fn sign_transaction(
        &self,
        payload: TransactionPayload,
        private_key: &str,
    ) -> Result<SignedTransaction>;
}

/// Generate a fresh hex-encoded private key.
pub fn generate_private_key() -> String {
    hex::encode(PrivateKeySigner::random().to_bytes())
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SigningClient {
    network: Network,
}

impl SigningClient {
    pub const fn new(network: Network) -> Self {
        Self { network }
    }

    pub const fn network(&self) -> Network {
        self.network
    }

    fn parse_key(private_key: &str) -> Result<PrivateKeySigner> {
        PrivateKeySigner::from_str(private_key.trim())
            .map_err(|e| SignerError::InvalidPrivateKey(e.to_string()))
    }

    /// Commitment over the network prefix and the canonical JSON of the
    /// parties, with the fee-payer authorization left out.
    fn commitment(&self, parties: &Value) -> Result<B256> {
        let mut preimage = self.network.signature_prefix().as_bytes().to_vec();
        preimage.extend_from_slice(&serde_json::to_vec(parties)?);
        Ok(keccak256(preimage))
    }

    fn fee_payer_body(fee_payer: &FeePayer) -> Value {
        json!({
            "publicKey": fee_payer.fee_payer,
            "fee": fee_payer.fee.to_string(),
            "nonce": fee_payer.nonce,
            "validUntil": fee_payer.valid_until,
        })
    }

    /// Check that the fee-payer signature covers the transaction and was made
    /// by the key recorded in it.
    pub fn verify_transaction(&self, signed: &SignedTransaction) -> Result<bool> {
        let mut parties = signed.data.parties.clone();
        let authorization = parties
            .get_mut("feePayer")
            .and_then(Value::as_object_mut)
            .and_then(|fee_payer| fee_payer.remove("authorization"))
            .ok_or_else(|| {
                SignerError::MalformedTransaction("missing fee payer authorization".to_string())
            })?;

        if authorization["signature"].as_str() != Some(signed.signature.as_str()) {
            return Ok(false);
        }
        if signed.fee_payer() != Some(signed.public_key) {
            return Ok(false);
        }

        let bytes = hex::decode(&signed.signature)?;
        let signature = Signature::try_from(bytes.as_slice())
            .map_err(|e| SignerError::InvalidSignature(e.to_string()))?;
        let commitment = self.commitment(&parties)?;

        match signature.recover_address_from_prehash(&commitment) {
            Ok(recovered) => Ok(recovered == signed.public_key),
            Err(_) => Ok(false),
        }
    }
}

impl TransactionSigner for SigningClient {
    fn derive_public_key(&self, private_key: &str) -> Result<Address> {
        Ok(Self::parse_key(private_key)?.address())
    }

    fn sign_transaction(
        &self,
        payload: TransactionPayload,
        private_key: &str,
    ) -> Result<SignedTransaction> {
        let signer = Self::parse_key(private_key)?;
        let public_key = signer.address();

        if payload.fee_payer.fee_payer != public_key {
            return Err(SignerError::FeePayerMismatch {
                expected: public_key,
                actual: payload.fee_payer.fee_payer,
            });
        }

        let TransactionPayload {
            mut parties,
            fee_payer,
        } = payload;

        let document = parties.as_object_mut().ok_or_else(|| {
            SignerError::MalformedTransaction("parties must be a JSON object".to_string())
        })?;
        if !document.get("otherParties").is_some_and(Value::is_array) {
            return Err(SignerError::MalformedTransaction(
                "otherParties must be an array".to_string(),
            ));
        }
        if document.contains_key("feePayer") {
            return Err(SignerError::MalformedTransaction(
                "transaction already has a fee payer".to_string(),
            ));
        }
        document.insert(
            "feePayer".to_string(),
            json!({ "body": Self::fee_payer_body(&fee_payer) }),
        );

        let commitment = self.commitment(&parties)?;
        let signature = signer
            .sign_hash_sync(&commitment)
            .map_err(|e| SignerError::Signing(e.to_string()))?;
        let signature = hex::encode(signature.as_bytes());

        parties["feePayer"]["authorization"] = json!({ "signature": signature });

        debug!("Commitment {} signed on {}", commitment, self.network);
        info!(
            "✍️  Signed transaction for fee payer {} (nonce {})",
            public_key, fee_payer.nonce
        );

        Ok(SignedTransaction {
            signature,
            public_key,
            data: SignedData { parties },
        })
    }
}
