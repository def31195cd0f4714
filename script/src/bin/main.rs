//! Compile the `SimpleZkapp` contract, create its deploy and update
//! transactions, and sign both with a single fee payer.
//!
//! Runs against the in-process digest backend by default:
//! ```shell
//! RUST_LOG=info cargo run --release
//! ```
//! or against an external proving service:
//! ```shell
//! PROVER_URL=http://localhost:8081 FEE_PAYER_PRIVATE_KEY=<hex> cargo run --release -- --value 3
//! ```

use clap::Parser;
use std::env;
use std::io;
use tracing::info;
use url::Url;
use zkapp_lib::{Field, TimingStack, Value};
use zkapp_prover::{DigestToolchain, HttpToolchain};
use zkapp_script::contract::METHOD_UPDATE;
use zkapp_script::{run_with_toolchain, simple_zkapp, Config};
use zkapp_signer::{Network, SigningClient};

/// Command-line overrides; unset flags fall back to the environment.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Network the signatures are made for (testnet or mainnet)
    #[arg(long)]
    network: Option<Network>,

    /// Transaction fee in nanomina
    #[arg(long)]
    fee: Option<u64>,

    /// Hex-encoded fee payer private key
    #[arg(long)]
    fee_payer_key: Option<String>,

    /// Nonce of the deploy transaction; the update uses the next one
    #[arg(long)]
    nonce: Option<u32>,

    /// Base URL of an external proving service
    #[arg(long)]
    prover_url: Option<Url>,

    /// Value written to `x` by the update transaction
    #[arg(long, default_value = "3")]
    value: Field,
}

impl Args {
    fn apply(self, config: &mut Config) {
        if let Some(network) = self.network {
            config.network = network;
        }
        if let Some(fee) = self.fee {
            config.fee = fee;
        }
        if let Some(key) = self.fee_payer_key {
            config.fee_payer_key = Some(key);
        }
        if let Some(nonce) = self.nonce {
            config.start_nonce = nonce;
        }
        if let Some(url) = self.prover_url {
            config.prover.endpoint = Some(url);
        }
    }
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    dotenv::dotenv().ok();

    // Logs go to stderr so stdout carries only progress lines and transactions
    tracing_subscriber::fmt()
        .with_env_filter(env::var("RUST_LOG").unwrap_or_else(|_| {
            "simple_zkapp=info,zkapp_script=info,zkapp_prover=info,zkapp_signer=info".to_string()
        }))
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let value = args.value;

    let mut config = Config::from_env()?;
    args.apply(&mut config);
    config.validate()?;

    let contract = simple_zkapp()?;
    let signer = SigningClient::new(config.network);
    let run_config = config.run_config(METHOD_UPDATE, vec![Value::Field(value)]);
    let mut timer = TimingStack::stdout();

    info!("🌐 Signing for {}", config.network);

    let report = if config.prover.endpoint.is_some() {
        let toolchain = HttpToolchain::new(&config.prover)?;
        info!("🔗 Using proving service at {}", toolchain.base_url());
        run_with_toolchain(toolchain, &signer, &contract, &run_config, &mut timer).await?
    } else {
        info!("🔧 Using in-process digest toolchain (no zero-knowledge proofs)");
        run_with_toolchain(
            DigestToolchain::new(),
            &signer,
            &contract,
            &run_config,
            &mut timer,
        )
        .await?
    };

    report.print(&mut io::stdout())?;
    Ok(())
}
