use alloy_primitives::{Address, U256};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Order of the Pallas base field, the native field of zkApp circuits.
pub const MODULUS: U256 = U256::from_limbs([
    0x992d_30ed_0000_0001,
    0x2246_98fc_094c_f91b,
    0x0000_0000_0000_0000,
    0x4000_0000_0000_0000,
]);

/// Errors raised when constructing field elements
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    #[error("Value {0} is not below the field modulus")]
    OutOfRange(U256),

    #[error("Invalid field element literal: {0}")]
    InvalidLiteral(String),
}

/// An element of the Pallas base field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Field(U256);

impl Field {
    pub const ZERO: Self = Self(U256::ZERO);
    pub const ONE: Self = Self(U256::from_limbs([1, 0, 0, 0]));

    pub fn new(value: U256) -> Result<Self, FieldError> {
        if value >= MODULUS {
            return Err(FieldError::OutOfRange(value));
        }
        Ok(Self(value))
    }

    /// Reduce an arbitrary 256-bit integer into the field.
    pub fn reduce(value: U256) -> Self {
        Self(value % MODULUS)
    }

    /// Hash arbitrary bytes into the field (SHA-256, then reduction mod p).
    pub fn hash_bytes(data: &[u8]) -> Self {
        let digest: [u8; 32] = Sha256::digest(data).into();
        Self::reduce(U256::from_be_bytes(digest))
    }

    pub const fn as_u256(&self) -> U256 {
        self.0
    }

    pub fn to_be_bytes(&self) -> [u8; 32] {
        self.0.to_be_bytes::<32>()
    }
}

impl From<u64> for Field {
    fn from(value: u64) -> Self {
        Self(U256::from(value))
    }
}

impl From<bool> for Field {
    fn from(value: bool) -> Self {
        if value {
            Self::ONE
        } else {
            Self::ZERO
        }
    }
}

impl From<Address> for Field {
    fn from(address: Address) -> Self {
        // 160-bit addresses always fit below the modulus
        Self(U256::from_be_slice(address.as_slice()))
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Field {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let value = match trimmed.strip_prefix("0x") {
            Some(hex_digits) => U256::from_str_radix(hex_digits, 16),
            None => U256::from_str_radix(trimmed, 10),
        }
        .map_err(|_| FieldError::InvalidLiteral(s.to_string()))?;
        Self::new(value)
    }
}

impl Serialize for Field {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Field {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let literal = String::deserialize(deserializer)?;
        literal.parse().map_err(serde::de::Error::custom)
    }
}

/// Primitive types a contract may use for state fields and method arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldType {
    Field,
    Bool,
    UInt32,
    UInt64,
    PublicKey,
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Field => "Field",
            Self::Bool => "Bool",
            Self::UInt32 => "UInt32",
            Self::UInt64 => "UInt64",
            Self::PublicKey => "PublicKey",
        };
        f.write_str(name)
    }
}

/// A typed value passed as a method argument or stored as initial state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum Value {
    Field(Field),
    Bool(bool),
    UInt32(u32),
    UInt64(u64),
    PublicKey(Address),
}

impl Value {
    pub const fn field_type(&self) -> FieldType {
        match self {
            Self::Field(_) => FieldType::Field,
            Self::Bool(_) => FieldType::Bool,
            Self::UInt32(_) => FieldType::UInt32,
            Self::UInt64(_) => FieldType::UInt64,
            Self::PublicKey(_) => FieldType::PublicKey,
        }
    }

    /// The single field element this value occupies in an app-state slot.
    pub fn to_field(&self) -> Field {
        match *self {
            Self::Field(f) => f,
            Self::Bool(b) => Field::from(b),
            Self::UInt32(n) => Field::from(u64::from(n)),
            Self::UInt64(n) => Field::from(n),
            Self::PublicKey(address) => Field::from(address),
        }
    }
}

impl From<Field> for Value {
    fn from(field: Field) -> Self {
        Self::Field(field)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Field(v) => write!(f, "Field({v})"),
            Self::Bool(v) => write!(f, "Bool({v})"),
            Self::UInt32(v) => write!(f, "UInt32({v})"),
            Self::UInt64(v) => write!(f, "UInt64({v})"),
            Self::PublicKey(v) => write!(f, "PublicKey({v})"),
        }
    }
}
