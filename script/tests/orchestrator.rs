use alloy_primitives::Address;
use alloy_signer_local::PrivateKeySigner;
use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use zkapp_lib::{ContractSchema, Field, TimingStack, Value, VerificationKey};
use zkapp_prover::{
    CompiledContract, DigestProvers, DigestToolchain, ProvingToolchain, ToolchainError,
};
use zkapp_script::contract::METHOD_UPDATE;
use zkapp_script::{run_with_toolchain, simple_zkapp, Config, RunConfig, RunError};
use zkapp_signer::{
    Network, SignedTransaction, SignerError, SigningClient, TransactionPayload,
    TransactionSigner,
};

const FEE_PAYER_KEY: &str = "5de4111afa1a4b94908f83103eb1f1706367c2e68ca870fc3fb9a804cdab365a";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Event {
    Ready,
    Compile(Address),
    Deploy(Address),
    Call(Address, String),
    Sign { nonce: u32, fee_payer: Address },
    Shutdown,
}

type EventLog = Arc<Mutex<Vec<Event>>>;

struct RecordingToolchain {
    inner: DigestToolchain,
    events: EventLog,
    fail_compile: bool,
}

impl RecordingToolchain {
    fn record(&self, event: Event) {
        self.events.lock().unwrap().push(event);
    }
}

#[async_trait]
impl ProvingToolchain for RecordingToolchain {
    type Provers = DigestProvers;

    async fn ready(&self) -> zkapp_prover::Result<()> {
        self.record(Event::Ready);
        self.inner.ready().await
    }

    async fn compile(
        &self,
        contract: &ContractSchema,
        address: Address,
    ) -> zkapp_prover::Result<CompiledContract<DigestProvers>> {
        self.record(Event::Compile(address));
        if self.fail_compile {
            return Err(ToolchainError::CompileFailed(
                "constraint system unsatisfiable".into(),
            ));
        }
        self.inner.compile(contract, address).await
    }

    async fn deploy(
        &self,
        contract: &ContractSchema,
        contract_key: &PrivateKeySigner,
        verification_key: &VerificationKey,
    ) -> zkapp_prover::Result<String> {
        self.record(Event::Deploy(contract_key.address()));
        self.inner.deploy(contract, contract_key, verification_key).await
    }

    async fn call(
        &self,
        contract: &ContractSchema,
        address: Address,
        method: &str,
        args: &[Value],
        provers: &DigestProvers,
    ) -> zkapp_prover::Result<String> {
        self.record(Event::Call(address, method.to_string()));
        self.inner.call(contract, address, method, args, provers).await
    }

    async fn shutdown(&self) {
        self.record(Event::Shutdown);
        self.inner.shutdown().await;
    }
}

struct RecordingSigner {
    inner: SigningClient,
    events: EventLog,
}

impl TransactionSigner for RecordingSigner {
    fn derive_public_key(&self, private_key: &str) -> Result<Address, SignerError> {
        self.inner.derive_public_key(private_key)
    }

    fn sign_transaction(
        &self,
        payload: TransactionPayload,
        private_key: &str,
    ) -> Result<SignedTransaction, SignerError> {
        self.events.lock().unwrap().push(Event::Sign {
            nonce: payload.fee_payer.nonce,
            fee_payer: payload.fee_payer.fee_payer,
        });
        self.inner.sign_transaction(payload, private_key)
    }
}

fn fixture(fail_compile: bool) -> (RecordingToolchain, RecordingSigner, EventLog) {
    let events = EventLog::default();
    let toolchain = RecordingToolchain {
        inner: DigestToolchain::new(),
        events: events.clone(),
        fail_compile,
    };
    let signer = RecordingSigner {
        inner: SigningClient::new(Network::Testnet),
        events: events.clone(),
    };
    (toolchain, signer, events)
}

fn run_config(arguments: Vec<Value>) -> RunConfig {
    Config {
        fee_payer_key: Some(FEE_PAYER_KEY.to_string()),
        ..Config::default()
    }
    .run_config(METHOD_UPDATE, arguments)
}

fn update_to(value: u64) -> Vec<Value> {
    vec![Value::Field(Field::from(value))]
}

#[tokio::test]
async fn test_steps_run_in_fixed_order_with_consecutive_nonces() {
    let (toolchain, signer, events) = fixture(false);
    let contract = simple_zkapp().unwrap();
    let mut timer = TimingStack::new(Vec::new());

    let config = run_config(update_to(3));
    let report = run_with_toolchain(toolchain, &signer, &contract, &config, &mut timer)
        .await
        .unwrap();

    let address = report.contract_address;
    let fee_payer = report.fee_payer;
    assert_eq!(
        *events.lock().unwrap(),
        vec![
            Event::Ready,
            Event::Compile(address),
            Event::Deploy(address),
            Event::Call(address, "update".to_string()),
            Event::Sign { nonce: 0, fee_payer },
            Event::Sign { nonce: 1, fee_payer },
            Event::Shutdown,
        ]
    );

    assert_eq!(report.signed_deploy.nonce(), Some(0));
    assert_eq!(report.signed_update.nonce(), Some(1));
    assert_eq!(report.signed_deploy.public_key, report.signed_update.public_key);
    assert_eq!(
        fee_payer,
        SigningClient::default().derive_public_key(FEE_PAYER_KEY).unwrap()
    );

    let labels: Vec<_> = report.timings.iter().map(|t| t.label.as_str()).collect();
    assert_eq!(
        labels,
        vec![
            "compile smart contract",
            "create deploy transaction",
            "create update transaction (with proof)",
            "sign deploy transaction",
            "sign update transaction",
        ]
    );
    assert_eq!(timer.depth(), 0);
}

#[tokio::test]
async fn test_signed_documents_carry_contract_effects() {
    let (toolchain, signer, _) = fixture(false);
    let contract = simple_zkapp().unwrap();
    let mut timer = TimingStack::new(Vec::new());

    let config = run_config(update_to(3));
    let report = run_with_toolchain(toolchain, &signer, &contract, &config, &mut timer)
        .await
        .unwrap();

    let deploy_party = &report.signed_deploy.data.parties["otherParties"][0];
    let update_party = &report.signed_update.data.parties["otherParties"][0];
    let address = report.contract_address.to_string();

    assert_eq!(deploy_party["body"]["publicKey"], address.as_str());
    assert_eq!(update_party["body"]["publicKey"], address.as_str());
    assert_eq!(deploy_party["body"]["update"]["appState"][0], "1");
    assert_eq!(update_party["body"]["update"]["appState"][0], "3");
    assert!(update_party["authorization"]["proof"].is_string());

    assert!(signer.inner.verify_transaction(&report.signed_deploy).unwrap());
    assert!(signer.inner.verify_transaction(&report.signed_update).unwrap());
}

#[tokio::test]
async fn test_compile_failure_stops_before_deploy() {
    let (toolchain, signer, events) = fixture(true);
    let contract = simple_zkapp().unwrap();
    let mut timer = TimingStack::new(Vec::new());

    let config = run_config(update_to(3));
    let result = run_with_toolchain(toolchain, &signer, &contract, &config, &mut timer).await;
    assert!(matches!(
        result,
        Err(RunError::Toolchain(ToolchainError::CompileFailed(_)))
    ));

    let events = events.lock().unwrap();
    assert_eq!(events.len(), 3);
    assert!(matches!(events[0], Event::Ready));
    assert!(matches!(events[1], Event::Compile(_)));
    assert_eq!(events[2], Event::Shutdown);
    assert_eq!(timer.depth(), 0);
}

#[tokio::test]
async fn test_malformed_arguments_fail_before_signing() {
    for arguments in [vec![], vec![Value::Bool(true)], vec![Value::Field(Field::ONE); 2]] {
        let (toolchain, signer, events) = fixture(false);
        let contract = simple_zkapp().unwrap();
        let mut timer = TimingStack::new(Vec::new());

        let config = run_config(arguments);
        let result = run_with_toolchain(toolchain, &signer, &contract, &config, &mut timer).await;
        assert!(matches!(
            result,
            Err(RunError::Toolchain(ToolchainError::InvalidCall(_)))
        ));

        let events = events.lock().unwrap();
        assert!(!events.iter().any(|e| matches!(e, Event::Sign { .. })));
        assert_eq!(events.last(), Some(&Event::Shutdown));
    }
}

#[tokio::test]
async fn test_reruns_produce_fresh_contracts_for_same_fee_payer() {
    let contract = simple_zkapp().unwrap();
    let signer = SigningClient::new(Network::Testnet);
    let config = run_config(update_to(3));

    let mut timer = TimingStack::new(Vec::new());
    let first = run_with_toolchain(DigestToolchain::new(), &signer, &contract, &config, &mut timer)
        .await
        .unwrap();
    let second = run_with_toolchain(DigestToolchain::new(), &signer, &contract, &config, &mut timer)
        .await
        .unwrap();

    assert_ne!(first.contract_address, second.contract_address);
    assert_ne!(first.signed_deploy.data.parties, second.signed_deploy.data.parties);
    assert_ne!(first.signed_update.data.parties, second.signed_update.data.parties);
    assert_eq!(first.fee_payer, second.fee_payer);
    for report in [&first, &second] {
        assert_eq!(report.signed_deploy.nonce(), Some(0));
        assert_eq!(report.signed_update.nonce(), Some(1));
    }
}

#[tokio::test]
async fn test_start_nonce_offsets_both_transactions() {
    let (toolchain, signer, _) = fixture(false);
    let contract = simple_zkapp().unwrap();
    let mut config = run_config(update_to(3));
    config.start_nonce = 7;

    let mut timer = TimingStack::new(Vec::new());
    let report = run_with_toolchain(toolchain, &signer, &contract, &config, &mut timer)
        .await
        .unwrap();
    assert_eq!(report.signed_deploy.nonce(), Some(7));
    assert_eq!(report.signed_update.nonce(), Some(8));
}

#[tokio::test]
async fn test_generates_fee_payer_when_unconfigured() {
    let (toolchain, signer, _) = fixture(false);
    let contract = simple_zkapp().unwrap();
    let config = Config::default().run_config(METHOD_UPDATE, update_to(3));

    let mut timer = TimingStack::new(Vec::new());
    let report = run_with_toolchain(toolchain, &signer, &contract, &config, &mut timer)
        .await
        .unwrap();
    assert_eq!(report.signed_deploy.public_key, report.fee_payer);
    assert_eq!(report.signed_update.public_key, report.fee_payer);
}

#[tokio::test]
async fn test_report_prints_success_and_both_bodies() {
    let (toolchain, signer, _) = fixture(false);
    let contract = simple_zkapp().unwrap();
    let mut progress = TimingStack::new(Vec::new());

    let config = run_config(update_to(3));
    let report = run_with_toolchain(toolchain, &signer, &contract, &config, &mut progress)
        .await
        .unwrap();

    let mut out = Vec::new();
    report.print(&mut out).unwrap();
    let printed = String::from_utf8(out).unwrap();
    assert!(printed.starts_with("success! created and signed two transactions.\n"));
    assert_eq!(printed.matches("\"feePayer\"").count(), 2);

    let progress = String::from_utf8(progress.into_inner()).unwrap();
    assert_eq!(progress.matches(" sec\n").count(), 5);
}
