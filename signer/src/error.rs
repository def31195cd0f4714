use alloy_primitives::Address;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, SignerError>;

#[derive(Error, Debug)]
pub enum SignerError {
    #[error("Invalid private key: {0}")]
    InvalidPrivateKey(String),

    #[error("Signing failed: {0}")]
    Signing(String),

    #[error("Malformed transaction: {0}")]
    MalformedTransaction(String),

    #[error("Fee payer {actual} does not match the signing key's address {expected}")]
    FeePayerMismatch { expected: Address, actual: Address },

    #[error("Invalid signature: {0}")]
    InvalidSignature(String),

    #[error("Unknown network: {0}")]
    UnknownNetwork(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Hex decode error: {0}")]
    HexDecode(#[from] hex::FromHexError),
}
