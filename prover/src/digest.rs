//! In-process development backend
//!
//! Produces structurally complete transaction documents without running a
//! proof system: the proof attached to a method call is a SHA-256 commitment
//! over the circuit, verification key, target address and call data. Useful
//! for offline runs and for exercising the signing path; a ledger would
//! reject these proofs.

use crate::error::{Result, ToolchainError};
use crate::{CompiledContract, ProvingToolchain};
use alloy_primitives::{keccak256, Address};
use alloy_signer::SignerSync;
use alloy_signer_local::PrivateKeySigner;
use async_trait::async_trait;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info};
use zkapp_lib::{
    Authorization, ContractSchema, Field, PartiesDocument, Party, PartyBody, Value,
    VerificationKey,
};

/// Per-method circuit digests bound to one contract address
#[derive(Debug, Clone)]
pub struct DigestProvers {
    address: Address,
    verification_key: VerificationKey,
    circuits: BTreeMap<String, [u8; 32]>,
}

impl DigestProvers {
    pub const fn address(&self) -> Address {
        self.address
    }

    pub fn methods(&self) -> impl Iterator<Item = &str> {
        self.circuits.keys().map(String::as_str)
    }
}

#[derive(Debug, Default)]
pub struct DigestToolchain {
    shut_down: AtomicBool,
}

impl DigestToolchain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_shut_down(&self) -> bool {
        self.shut_down.load(Ordering::SeqCst)
    }

    fn ensure_running(&self) -> Result<()> {
        if self.is_shut_down() {
            return Err(ToolchainError::NotReady(
                "toolchain has been shut down".to_string(),
            ));
        }
        Ok(())
    }

    fn verification_key_for(contract: &ContractSchema) -> VerificationKey {
        let digest = contract.digest();
        VerificationKey {
            data: hex::encode(digest),
            hash: Field::hash_bytes(&digest),
        }
    }

    fn call_data(method: &str, args: &[Value]) -> Field {
        let mut preimage = method.as_bytes().to_vec();
        for arg in args {
            preimage.extend_from_slice(&arg.to_field().to_be_bytes());
        }
        Field::hash_bytes(&preimage)
    }
}

#[async_trait]
impl ProvingToolchain for DigestToolchain {
    type Provers = DigestProvers;

    async fn ready(&self) -> Result<()> {
        self.ensure_running()
    }

    async fn compile(
        &self,
        contract: &ContractSchema,
        address: Address,
    ) -> Result<CompiledContract<DigestProvers>> {
        self.ensure_running()?;
        info!("🔧 Compiling {} for {}", contract.name(), address);

        let schema_digest = contract.digest();
        let circuits = contract
            .methods()
            .iter()
            .map(|method| {
                let mut hasher = Sha256::new();
                hasher.update(schema_digest);
                hasher.update(method.name.as_bytes());
                (method.name.clone(), hasher.finalize().into())
            })
            .collect::<BTreeMap<String, [u8; 32]>>();

        let verification_key = Self::verification_key_for(contract);
        debug!(
            "Verification key hash {} covers {} method(s)",
            verification_key.hash,
            circuits.len()
        );

        Ok(CompiledContract {
            verification_key: verification_key.clone(),
            provers: DigestProvers {
                address,
                verification_key,
                circuits,
            },
        })
    }

    async fn deploy(
        &self,
        contract: &ContractSchema,
        contract_key: &PrivateKeySigner,
        verification_key: &VerificationKey,
    ) -> Result<String> {
        self.ensure_running()?;
        if *verification_key != Self::verification_key_for(contract) {
            return Err(ToolchainError::ProvingFailed(format!(
                "verification key does not belong to {}",
                contract.name()
            )));
        }

        let mut body = PartyBody::new(contract_key.address());
        body.update.verification_key = Some(verification_key.clone());
        body.increment_nonce = true;
        for (slot, field) in contract.state().iter().enumerate() {
            if let Some(initial) = &field.initial {
                body.update.app_state[slot] = Some(initial.to_field());
            }
        }

        let commitment = keccak256(serde_json::to_vec(&body)?);
        let signature = contract_key
            .sign_hash_sync(&commitment)
            .map_err(|e| ToolchainError::Signer(e.to_string()))?;

        let document = PartiesDocument::new(vec![Party {
            body,
            authorization: Authorization::Signature(hex::encode(signature.as_bytes())),
        }]);

        info!("📦 Deploy transaction created for {}", contract_key.address());
        Ok(document.to_json()?)
    }

    async fn call(
        &self,
        contract: &ContractSchema,
        address: Address,
        method: &str,
        args: &[Value],
        provers: &DigestProvers,
    ) -> Result<String> {
        self.ensure_running()?;
        let schema = contract.check_arguments(method, args)?;

        if provers.address != address {
            return Err(ToolchainError::AddressMismatch {
                expected: provers.address.to_string(),
                actual: address.to_string(),
            });
        }
        let circuit = provers
            .circuits
            .get(method)
            .ok_or_else(|| ToolchainError::MissingProver(method.to_string()))?;

        let mut body = PartyBody::new(address);
        for assignment in &schema.assignments {
            if let Some(slot) = contract.state_index(&assignment.state) {
                body.update.app_state[slot] = Some(args[assignment.argument].to_field());
            }
        }
        body.call_data = Self::call_data(method, args);

        let mut hasher = Sha256::new();
        hasher.update(circuit);
        hasher.update(provers.verification_key.hash.to_be_bytes());
        hasher.update(address.as_slice());
        hasher.update(body.call_data.to_be_bytes());
        for slot in body.update.app_state.iter().flatten() {
            hasher.update(slot.to_be_bytes());
        }
        let proof = hex::encode(hasher.finalize());

        let document = PartiesDocument::new(vec![Party {
            body,
            authorization: Authorization::Proof(proof),
        }]);

        info!("📦 Call transaction created: {}.{}", contract.name(), method);
        Ok(document.to_json()?)
    }

    async fn shutdown(&self) {
        self.shut_down.store(true, Ordering::SeqCst);
    }
}
