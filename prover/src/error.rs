use thiserror::Error;
use zkapp_lib::SchemaError;

pub type Result<T> = std::result::Result<T, ToolchainError>;

/// Errors that can occur while talking to a proving toolchain
#[derive(Error, Debug)]
pub enum ToolchainError {
    #[error("Toolchain not ready: {0}")]
    NotReady(String),

    #[error("Compilation failed: {0}")]
    CompileFailed(String),

    #[error("Invalid method call: {0}")]
    InvalidCall(#[from] SchemaError),

    #[error("Proving failed: {0}")]
    ProvingFailed(String),

    #[error("Method '{0}' was not compiled for this contract")]
    MissingProver(String),

    #[error("Compiled provers belong to {expected}, not {actual}")]
    AddressMismatch { expected: String, actual: String },

    #[error("Signing the contract party failed: {0}")]
    Signer(String),

    #[error("Prover API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ToolchainError {
    /// Get error code for logging
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NotReady(_) => "NOT_READY",
            Self::CompileFailed(_) => "COMPILE_FAILED",
            Self::InvalidCall(_) => "INVALID_CALL",
            Self::ProvingFailed(_) => "PROVING_FAILED",
            Self::MissingProver(_) => "MISSING_PROVER",
            Self::AddressMismatch { .. } => "ADDRESS_MISMATCH",
            Self::Signer(_) => "SIGNER_ERROR",
            Self::Api { .. } => "API_ERROR",
            Self::Request(_) => "REQUEST_FAILED",
            Self::Serialization(_) => "SERIALIZATION_ERROR",
            Self::Config(_) => "CONFIG_ERROR",
        }
    }
}
