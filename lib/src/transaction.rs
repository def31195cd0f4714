use crate::field::Field;
use crate::ZKAPP_STATE_LENGTH;
use alloy_primitives::Address;
use serde::{Deserialize, Serialize};

/// Verification key of a compiled contract
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationKey {
    /// Hex-encoded key material
    pub data: String,
    pub hash: Field,
}

/// Authorization attached to a party
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Authorization {
    Proof(String),
    Signature(String),
    None,
}

/// State changes requested by a party. `None` slots are left untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppStateUpdate {
    pub app_state: Vec<Option<Field>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verification_key: Option<VerificationKey>,
}

impl Default for AppStateUpdate {
    fn default() -> Self {
        Self {
            app_state: vec![None; ZKAPP_STATE_LENGTH],
            verification_key: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartyBody {
    pub public_key: Address,
    pub update: AppStateUpdate,
    pub increment_nonce: bool,
    /// Field-encoded commitment to the method name and arguments
    pub call_data: Field,
}

impl PartyBody {
    pub fn new(public_key: Address) -> Self {
        Self {
            public_key,
            update: AppStateUpdate::default(),
            increment_nonce: false,
            call_data: Field::ZERO,
        }
    }
}

/// One account update inside a transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Party {
    pub body: PartyBody,
    pub authorization: Authorization,
}

/// A transaction as produced by a proving toolchain.
///
/// Toolchains leave `fee_payer` empty. The signer attaches it on the parsed
/// JSON, so a signed transaction still reads back as this type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartiesDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fee_payer: Option<serde_json::Value>,
    pub other_parties: Vec<Party>,
    #[serde(default)]
    pub memo: String,
}

impl PartiesDocument {
    /// An unsigned document without memo.
    pub fn new(other_parties: Vec<Party>) -> Self {
        Self {
            fee_payer: None,
            other_parties,
            memo: String::new(),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}
