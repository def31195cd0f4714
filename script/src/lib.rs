//! Orchestration of the simple zkApp flow: compile, deploy, call, sign.

#![allow(clippy::missing_errors_doc)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod contract;
pub mod error;
pub mod orchestrator;

pub use config::{Config, RunConfig, DEFAULT_TRANSACTION_FEE};
pub use contract::simple_zkapp;
pub use error::{Result, RunError};
pub use orchestrator::{run, run_with_toolchain, RunReport};
