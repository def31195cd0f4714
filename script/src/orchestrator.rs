//! Deploy-and-update run against a proving toolchain and a transaction signer
//!
//! Every step waits for the previous one; nothing runs concurrently. The first
//! failure aborts the run and is returned to the caller, so a failed compile
//! never reaches deploy, and a rejected call never reaches the signer.

use crate::config::RunConfig;
use crate::error::{Result, RunError};
use alloy_primitives::Address;
use alloy_signer_local::PrivateKeySigner;
use serde_json::Value as Json;
use std::future::Future;
use std::io::Write;
use tracing::{info, warn};
use zkapp_lib::{ContractSchema, Timing, TimingStack};
use zkapp_prover::{ProvingToolchain, ToolchainSession};
use zkapp_signer::{
    generate_private_key, FeePayer, SignedTransaction, TransactionPayload, TransactionSigner,
};

/// Everything produced by a successful run
#[derive(Debug, Clone)]
pub struct RunReport {
    pub contract_address: Address,
    pub fee_payer: Address,
    pub signed_deploy: SignedTransaction,
    pub signed_update: SignedTransaction,
    pub timings: Vec<Timing>,
}

impl RunReport {
    /// Print the success line followed by both signed transaction bodies.
    pub fn print<W: Write>(&self, out: &mut W) -> Result<()> {
        writeln!(out, "success! created and signed two transactions.")?;
        writeln!(out, "{}", serde_json::to_string_pretty(&self.signed_deploy.data.parties)?)?;
        writeln!(out, "{}", serde_json::to_string_pretty(&self.signed_update.data.parties)?)?;
        Ok(())
    }
}

/// Run `future` inside a timed section. The section is closed on failure too,
/// keeping starts and stops paired; only successful steps are recorded.
async fn timed<W, F, T, E>(
    timer: &mut TimingStack<W>,
    timings: &mut Vec<Timing>,
    label: &str,
    future: F,
) -> Result<T>
where
    W: Write,
    F: Future<Output = std::result::Result<T, E>>,
    E: Into<RunError>,
{
    timer.start(label)?;
    let outcome = future.await.map_err(Into::into);
    let timing = timer.stop()?;
    if outcome.is_ok() {
        timings.extend(timing);
    }
    outcome
}

fn sign<S: TransactionSigner>(
    signer: &S,
    document: &str,
    fee_payer: FeePayer,
    private_key: &str,
) -> Result<SignedTransaction> {
    let parties: Json = serde_json::from_str(document)?;
    Ok(signer.sign_transaction(TransactionPayload { parties, fee_payer }, private_key)?)
}

/// Compile, deploy and call `contract`, then sign both transactions with one
/// fee payer using consecutive nonces.
pub async fn run<T, S, W>(
    session: &ToolchainSession<T>,
    signer: &S,
    contract: &ContractSchema,
    config: &RunConfig,
    timer: &mut TimingStack<W>,
) -> Result<RunReport>
where
    T: ProvingToolchain,
    S: TransactionSigner,
    W: Write,
{
    let toolchain = session.toolchain();
    let mut timings = Vec::with_capacity(5);

    // Fresh contract identity for every run
    let zkapp_key = PrivateKeySigner::random();
    let zkapp_address = zkapp_key.address();
    info!("🆕 {} address: {}", contract.name(), zkapp_address);

    let compiled = timed(
        timer,
        &mut timings,
        "compile smart contract",
        toolchain.compile(contract, zkapp_address),
    )
    .await?;

    let deploy_json = timed(
        timer,
        &mut timings,
        "create deploy transaction",
        toolchain.deploy(contract, &zkapp_key, &compiled.verification_key),
    )
    .await?;

    let update_json = timed(
        timer,
        &mut timings,
        &format!("create {} transaction (with proof)", config.method),
        toolchain.call(
            contract,
            zkapp_address,
            &config.method,
            &config.arguments,
            &compiled.provers,
        ),
    )
    .await?;

    let fee_payer_key = if let Some(key) = &config.fee_payer_key {
        key.clone()
    } else {
        warn!("⚠️  No fee payer key configured; using a freshly generated, unfunded account");
        generate_private_key()
    };
    let fee_payer = signer.derive_public_key(&fee_payer_key)?;
    info!("💳 Fee payer: {}", fee_payer);

    let update_nonce = config.start_nonce.checked_add(1).ok_or_else(|| {
        RunError::Config(format!("Nonce {} cannot be incremented", config.start_nonce))
    })?;

    let deploy_envelope = FeePayer {
        fee_payer,
        fee: config.fee,
        nonce: config.start_nonce,
        valid_until: None,
    };
    let signed_deploy = timed(timer, &mut timings, "sign deploy transaction", async {
        sign(signer, &deploy_json, deploy_envelope, &fee_payer_key)
    })
    .await?;

    let update_envelope = FeePayer {
        fee_payer,
        fee: config.fee,
        nonce: update_nonce,
        valid_until: None,
    };
    let signed_update = timed(
        timer,
        &mut timings,
        &format!("sign {} transaction", config.method),
        async { sign(signer, &update_json, update_envelope, &fee_payer_key) },
    )
    .await?;

    Ok(RunReport {
        contract_address: zkapp_address,
        fee_payer,
        signed_deploy,
        signed_update,
        timings,
    })
}

/// Open a session on `toolchain`, run, and shut the toolchain down again
/// whether or not the run succeeded.
pub async fn run_with_toolchain<T, S, W>(
    toolchain: T,
    signer: &S,
    contract: &ContractSchema,
    config: &RunConfig,
    timer: &mut TimingStack<W>,
) -> Result<RunReport>
where
    T: ProvingToolchain,
    S: TransactionSigner,
    W: Write,
{
    let session = ToolchainSession::open(toolchain).await?;
    let outcome = run(&session, signer, contract, config, timer).await;
    session.close().await;
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::contract::{simple_zkapp, METHOD_UPDATE};
    use tracing_test::traced_test;
    use zkapp_lib::{Field, Value};
    use zkapp_prover::DigestToolchain;
    use zkapp_signer::SigningClient;

    #[tokio::test]
    #[traced_test]
    async fn test_missing_fee_payer_key_is_flagged() {
        let contract = simple_zkapp().unwrap();
        let config =
            Config::default().run_config(METHOD_UPDATE, vec![Value::Field(Field::from(3))]);

        let report = run_with_toolchain(
            DigestToolchain::new(),
            &SigningClient::default(),
            &contract,
            &config,
            &mut TimingStack::new(Vec::new()),
        )
        .await
        .unwrap();

        assert!(logs_contain("unfunded account"));
        assert!(logs_contain(&report.fee_payer.to_string()));
    }

    #[tokio::test]
    async fn test_update_nonce_overflow_is_rejected() {
        let contract = simple_zkapp().unwrap();
        let mut config =
            Config::default().run_config(METHOD_UPDATE, vec![Value::Field(Field::from(3))]);
        config.start_nonce = u32::MAX;

        let result = run_with_toolchain(
            DigestToolchain::new(),
            &SigningClient::default(),
            &contract,
            &config,
            &mut TimingStack::new(Vec::new()),
        )
        .await;
        assert!(matches!(result, Err(RunError::Config(_))));
    }
}
