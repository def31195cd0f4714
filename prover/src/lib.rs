//! Proving toolchain interface
//!
//! A proving toolchain compiles a [`ContractSchema`] into a verification key
//! and per-method provers, and produces unsigned, proof-carrying transaction
//! documents for deploying and calling the contract. The toolchain is only
//! reachable through a [`ToolchainSession`], which waits for readiness on open
//! and shuts the toolchain down when closed.

#![allow(clippy::missing_errors_doc)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod digest;
pub mod error;
pub mod http;
pub mod session;

pub use config::ProverConfig;
pub use digest::{DigestProvers, DigestToolchain};
pub use error::{Result, ToolchainError};
pub use http::{HttpProvers, HttpToolchain};
pub use session::ToolchainSession;

use alloy_primitives::Address;
use alloy_signer_local::PrivateKeySigner;
use async_trait::async_trait;
use zkapp_lib::{ContractSchema, Value, VerificationKey};

/// Output of [`ProvingToolchain::compile`]
#[derive(Debug, Clone)]
pub struct CompiledContract<P> {
    pub verification_key: VerificationKey,
    pub provers: P,
}

#[async_trait]
pub trait ProvingToolchain: Send + Sync + 'static {
    /// Toolchain-specific handle to the compiled method provers
    type Provers: Send + Sync;

    /// Resolves once the toolchain can accept work.
    async fn ready(&self) -> Result<()>;

    async fn compile(
        &self,
        contract: &ContractSchema,
        address: Address,
    ) -> Result<CompiledContract<Self::Provers>>;

    /// Build the deploy transaction as a JSON document.
    async fn deploy(
        &self,
        contract: &ContractSchema,
        contract_key: &PrivateKeySigner,
        verification_key: &VerificationKey,
    ) -> Result<String>;

    /// Build a proof-carrying method call as a JSON document.
    ///
    /// Arguments that do not match the declared signature are rejected before
    /// any proving work starts.
    async fn call(
        &self,
        contract: &ContractSchema,
        address: Address,
        method: &str,
        args: &[Value],
        provers: &Self::Provers,
    ) -> Result<String>;

    /// Release toolchain resources. Called once by [`ToolchainSession`].
    async fn shutdown(&self);
}
