use thiserror::Error;
use zkapp_lib::SchemaError;
use zkapp_prover::ToolchainError;
use zkapp_signer::SignerError;

pub type Result<T> = std::result::Result<T, RunError>;

/// Any failure aborts the run; there is no partial recovery
#[derive(Error, Debug)]
pub enum RunError {
    #[error("Toolchain error: {0}")]
    Toolchain(#[from] ToolchainError),

    #[error("Signer error: {0}")]
    Signer(#[from] SignerError),

    #[error("Contract declaration error: {0}")]
    Schema(#[from] SchemaError),

    #[error("Invalid transaction document: {0}")]
    Document(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use zkapp_lib::ContractSchema;

    #[test]
    fn test_declaration_errors_convert() {
        let error: RunError = ContractSchema::builder("").build().unwrap_err().into();
        assert!(matches!(error, RunError::Schema(SchemaError::EmptyContractName)));
        assert_eq!(
            error.to_string(),
            "Contract declaration error: Contract name must not be empty"
        );
    }
}
