use crate::error::{Result, RunError};
use std::env;
use zkapp_lib::Value;
use zkapp_prover::ProverConfig;
use zkapp_signer::{Network, SigningClient, TransactionSigner};

/// Default transaction fee in nanomina
pub const DEFAULT_TRANSACTION_FEE: u64 = 10_000_000;

#[derive(Debug, Clone)]
pub struct Config {
    pub network: Network,
    pub fee: u64,
    /// Hex-encoded fee-payer key; a fresh, unfunded key is generated when absent
    pub fee_payer_key: Option<String>,
    pub start_nonce: u32,
    pub prover: ProverConfig,
}

/// Inputs of a single orchestrated run
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub fee: u64,
    pub fee_payer_key: Option<String>,
    pub start_nonce: u32,
    pub method: String,
    pub arguments: Vec<Value>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let network = env::var("ZKAPP_NETWORK")
            .unwrap_or_else(|_| "testnet".to_string())
            .parse::<Network>()?;

        let fee = env::var("TRANSACTION_FEE")
            .unwrap_or_else(|_| DEFAULT_TRANSACTION_FEE.to_string())
            .parse::<u64>()
            .map_err(|e| RunError::Config(format!("Invalid TRANSACTION_FEE: {e}")))?;

        let start_nonce = env::var("FEE_PAYER_NONCE")
            .unwrap_or_else(|_| "0".to_string())
            .parse::<u32>()
            .map_err(|e| RunError::Config(format!("Invalid FEE_PAYER_NONCE: {e}")))?;

        Ok(Self {
            network,
            fee,
            fee_payer_key: env::var("FEE_PAYER_PRIVATE_KEY")
                .ok()
                .filter(|key| !key.trim().is_empty()),
            start_nonce,
            prover: ProverConfig::from_env()?,
        })
    }

    pub fn validate(&self) -> Result<()> {
        if self.fee == 0 {
            return Err(RunError::Config(
                "Transaction fee must be greater than 0".to_string(),
            ));
        }

        // Deploy and update consume two consecutive nonces
        if self.start_nonce == u32::MAX {
            return Err(RunError::Config(format!(
                "Nonce {} leaves no room for the update transaction",
                self.start_nonce
            )));
        }

        if let Some(key) = &self.fee_payer_key {
            SigningClient::new(self.network).derive_public_key(key)?;
        }

        self.prover.validate()?;
        Ok(())
    }

    pub fn run_config(&self, method: impl Into<String>, arguments: Vec<Value>) -> RunConfig {
        RunConfig {
            fee: self.fee,
            fee_payer_key: self.fee_payer_key.clone(),
            start_nonce: self.start_nonce,
            method: method.into(),
            arguments,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            network: Network::Testnet,
            fee: DEFAULT_TRANSACTION_FEE,
            fee_payer_key: None,
            start_nonce: 0,
            prover: ProverConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Mutex, MutexGuard};
    use zkapp_lib::Field;
    use zkapp_signer::SignerError;

    const VARS: [&str; 5] = [
        "ZKAPP_NETWORK",
        "TRANSACTION_FEE",
        "FEE_PAYER_PRIVATE_KEY",
        "FEE_PAYER_NONCE",
        "PROVER_URL",
    ];

    // Tests in this module share the process environment
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn clean_env() -> MutexGuard<'static, ()> {
        let guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        for var in VARS {
            env::remove_var(var);
        }
        guard
    }

    #[test]
    fn test_from_env_defaults() {
        let _env = clean_env();
        let config = Config::from_env().unwrap();
        assert_eq!(config.network, Network::Testnet);
        assert_eq!(config.fee, DEFAULT_TRANSACTION_FEE);
        assert_eq!(config.start_nonce, 0);
        assert!(config.fee_payer_key.is_none());
        assert!(config.prover.endpoint.is_none());
    }

    #[test]
    fn test_from_env_reads_variables() {
        let _env = clean_env();
        env::set_var("ZKAPP_NETWORK", "mainnet");
        env::set_var("TRANSACTION_FEE", "250000000");
        env::set_var(
            "FEE_PAYER_PRIVATE_KEY",
            "59c6995e998f97a5a0044966f0945389dc9e86dae88c7a8412f4603b6b78690d",
        );
        env::set_var("FEE_PAYER_NONCE", "12");
        env::set_var("PROVER_URL", "http://localhost:8081");

        let config = Config::from_env().unwrap();
        assert_eq!(config.network, Network::Mainnet);
        assert_eq!(config.fee, 250_000_000);
        assert!(config.fee_payer_key.is_some());
        assert_eq!(config.start_nonce, 12);
        assert!(config.prover.endpoint.is_some());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_env_blank_key_is_unset() {
        let _env = clean_env();
        env::set_var("FEE_PAYER_PRIVATE_KEY", "  ");
        assert!(Config::from_env().unwrap().fee_payer_key.is_none());
    }

    #[test]
    fn test_from_env_rejects_bad_values() {
        let _env = clean_env();
        env::set_var("TRANSACTION_FEE", "ten");
        assert!(matches!(
            Config::from_env(),
            Err(RunError::Config(message)) if message.starts_with("Invalid TRANSACTION_FEE")
        ));

        env::remove_var("TRANSACTION_FEE");
        env::set_var("FEE_PAYER_NONCE", "-1");
        assert!(matches!(
            Config::from_env(),
            Err(RunError::Config(message)) if message.starts_with("Invalid FEE_PAYER_NONCE")
        ));

        env::remove_var("FEE_PAYER_NONCE");
        env::set_var("ZKAPP_NETWORK", "sepolia");
        assert!(matches!(
            Config::from_env(),
            Err(RunError::Signer(SignerError::UnknownNetwork(_)))
        ));
    }

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.fee, 10_000_000);
        assert!(config.network.is_testnet());
    }

    #[test]
    fn test_validation() {
        let mut config = Config {
            fee: 0,
            ..Config::default()
        };
        assert!(matches!(config.validate(), Err(RunError::Config(_))));

        config.fee = 1;
        config.start_nonce = u32::MAX;
        assert!(matches!(config.validate(), Err(RunError::Config(_))));

        config.start_nonce = 0;
        config.fee_payer_key = Some("zz".to_string());
        assert!(matches!(config.validate(), Err(RunError::Signer(_))));
    }

    #[test]
    fn test_run_config_carries_settings() {
        let config = Config {
            start_nonce: 4,
            ..Config::default()
        };
        let run = config.run_config("update", vec![Value::Field(Field::from(3))]);
        assert_eq!(run.start_nonce, 4);
        assert_eq!(run.method, "update");
        assert_eq!(run.arguments.len(), 1);
    }
}
