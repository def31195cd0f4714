use crate::error::SignerError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Target network of a signature. Signatures made for one network do not
/// verify on the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    #[default]
    Testnet,
    Mainnet,
}

impl Network {
    /// Domain prefix mixed into every signed commitment
    pub const fn signature_prefix(self) -> &'static str {
        match self {
            Self::Testnet => "CodaSignature",
            Self::Mainnet => "MinaSignatureMainnet",
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Testnet => "testnet",
            Self::Mainnet => "mainnet",
        }
    }

    pub const fn is_testnet(self) -> bool {
        matches!(self, Self::Testnet)
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Network {
    type Err = SignerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "testnet" => Ok(Self::Testnet),
            "mainnet" => Ok(Self::Mainnet),
            other => Err(SignerError::UnknownNetwork(other.to_string())),
        }
    }
}
