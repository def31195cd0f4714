#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions
)]

pub mod client;
pub mod error;
pub mod network;
pub mod types;

pub use client::{generate_private_key, SigningClient, TransactionSigner};
pub use error::{Result, SignerError};
pub use network::Network;
pub use types::*;
