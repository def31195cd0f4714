use alloy_primitives::Address;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Fee-payer envelope attached to a transaction at signing time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeePayer {
    pub fee_payer: Address,
    /// Fee in nanomina, carried as a decimal string on the wire
    #[serde(with = "decimal_string")]
    pub fee: u64,
    pub nonce: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valid_until: Option<u32>,
}

/// Unsigned transaction handed to the signer
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionPayload {
    pub parties: Value,
    pub fee_payer: FeePayer,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignedData {
    pub parties: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignedTransaction {
    /// Hex-encoded 65-byte recoverable signature
    pub signature: String,
    pub public_key: Address,
    pub data: SignedData,
}

impl SignedTransaction {
    /// Nonce recorded in the fee-payer party, if present.
    pub fn nonce(&self) -> Option<u64> {
        self.data.parties["feePayer"]["body"]["nonce"].as_u64()
    }

    pub fn fee_payer(&self) -> Option<Address> {
        self.data.parties["feePayer"]["body"]["publicKey"]
            .as_str()
            .and_then(|s| s.parse().ok())
    }
}

mod decimal_string {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &u64, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(value)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
        String::deserialize(deserializer)?
            .parse()
            .map_err(serde::de::Error::custom)
    }
}
