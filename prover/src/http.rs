//! HTTP client for an external proving service
//!
//! The service exposes a small JSON API:
//!
//! | Route | Body | Reply |
//! |-------|------|-------|
//! | `GET /health` | | 2xx once ready |
//! | `POST /compile` | `{contract, address}` | `{verificationKey, proversId}` |
//! | `POST /deploy` | `{contract, privateKey, verificationKey}` | `{transaction}` |
//! | `POST /call` | `{contract, address, method, args, proversId}` | `{transaction}` |
//! | `POST /shutdown` | | 2xx once released |

use crate::config::ProverConfig;
use crate::error::{Result, ToolchainError};
use crate::{CompiledContract, ProvingToolchain};
use alloy_primitives::Address;
use alloy_signer_local::PrivateKeySigner;
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{info, warn};
use url::Url;
use zkapp_lib::{ContractSchema, Value, VerificationKey};

/// Server-side handle to compiled provers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpProvers {
    pub id: String,
    pub address: Address,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CompileRequest<'a> {
    contract: &'a ContractSchema,
    address: Address,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CompileResponse {
    verification_key: VerificationKey,
    provers_id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DeployRequest<'a> {
    contract: &'a ContractSchema,
    private_key: String,
    verification_key: &'a VerificationKey,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CallRequest<'a> {
    contract: &'a ContractSchema,
    address: Address,
    method: &'a str,
    args: &'a [Value],
    provers_id: &'a str,
}

#[derive(Debug, Deserialize)]
struct TransactionResponse {
    transaction: String,
}

#[derive(Debug, Clone)]
pub struct HttpToolchain {
    client: Client,
    base_url: Url,
    ready_attempts: u32,
    ready_interval: Duration,
}

impl HttpToolchain {
    pub fn new(config: &ProverConfig) -> Result<Self> {
        config.validate()?;
        let base_url = config
            .endpoint
            .clone()
            .ok_or_else(|| ToolchainError::Config("PROVER_URL is required".to_string()))?;

        let client = Client::builder().timeout(config.timeout()).build()?;

        Ok(Self {
            client,
            base_url,
            ready_attempts: config.ready_attempts,
            ready_interval: config.ready_interval(),
        })
    }

    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, route: &str) -> Result<Url> {
        self.base_url
            .join(route)
            .map_err(|e| ToolchainError::Config(format!("Invalid prover route {route}: {e}")))
    }

    async fn post<B, R>(&self, route: &str, body: &B) -> Result<R>
    where
        B: Serialize + Sync,
        R: DeserializeOwned,
    {
        let response = self.client.post(self.endpoint(route)?).json(body).send().await?;
        Self::decode(response).await
    }

    async fn decode<R: DeserializeOwned>(response: Response) -> Result<R> {
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ToolchainError::Api {
                status: status.as_u16(),
                message,
            });
        }
        Ok(response.json::<R>().await?)
    }
}

#[async_trait]
impl ProvingToolchain for HttpToolchain {
    type Provers = HttpProvers;

    async fn ready(&self) -> Result<()> {
        let url = self.endpoint("health")?;
        for attempt in 1..=self.ready_attempts {
            match self.client.get(url.clone()).send().await {
                Ok(response) if response.status().is_success() => return Ok(()),
                Ok(response) => {
                    info!(
                        "⏳ Prover not ready ({}), attempt {}/{}",
                        response.status(),
                        attempt,
                        self.ready_attempts
                    );
                }
                Err(e) => {
                    info!(
                        "⏳ Prover unreachable ({}), attempt {}/{}",
                        e, attempt, self.ready_attempts
                    );
                }
            }
            if attempt < self.ready_attempts {
                tokio::time::sleep(self.ready_interval).await;
            }
        }

        Err(ToolchainError::NotReady(format!(
            "{} did not become ready after {} attempt(s)",
            self.base_url, self.ready_attempts
        )))
    }

    async fn compile(
        &self,
        contract: &ContractSchema,
        address: Address,
    ) -> Result<CompiledContract<HttpProvers>> {
        let response: CompileResponse = self
            .post("compile", &CompileRequest { contract, address })
            .await
            .map_err(|e| match e {
                ToolchainError::Api { status, message } => {
                    ToolchainError::CompileFailed(format!("{status}: {message}"))
                }
                other => other,
            })?;

        Ok(CompiledContract {
            verification_key: response.verification_key,
            provers: HttpProvers {
                id: response.provers_id,
                address,
            },
        })
    }

    async fn deploy(
        &self,
        contract: &ContractSchema,
        contract_key: &PrivateKeySigner,
        verification_key: &VerificationKey,
    ) -> Result<String> {
        let request = DeployRequest {
            contract,
            private_key: hex::encode(contract_key.to_bytes()),
            verification_key,
        };
        let response: TransactionResponse = self.post("deploy", &request).await?;
        Ok(response.transaction)
    }

    async fn call(
        &self,
        contract: &ContractSchema,
        address: Address,
        method: &str,
        args: &[Value],
        provers: &HttpProvers,
    ) -> Result<String> {
        // Reject locally; the service would only spend time proving a bad call
        contract.check_arguments(method, args)?;
        if provers.address != address {
            return Err(ToolchainError::AddressMismatch {
                expected: provers.address.to_string(),
                actual: address.to_string(),
            });
        }

        let request = CallRequest {
            contract,
            address,
            method,
            args,
            provers_id: &provers.id,
        };
        let response: TransactionResponse = self.post("call", &request).await?;
        Ok(response.transaction)
    }

    async fn shutdown(&self) {
        let url = match self.endpoint("shutdown") {
            Ok(url) => url,
            Err(e) => {
                warn!("⚠️  Prover shutdown skipped: {}", e);
                return;
            }
        };
        match self.client.post(url).send().await {
            Ok(response) if response.status().is_success() => {
                info!("🛑 Prover at {} shut down", self.base_url);
            }
            Ok(response) => {
                warn!("⚠️  Prover shutdown rejected ({})", response.status());
            }
            Err(e) => warn!("⚠️  Prover shutdown request failed: {}", e),
        }
    }
}
