//! Core types shared by the zkApp workspace: field elements, contract schemas,
//! transaction documents and the console timing helper.

#![allow(clippy::missing_errors_doc)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod field;
pub mod schema;
pub mod timing;
pub mod transaction;

pub use field::{Field, FieldError, FieldType, Value};
pub use schema::{ContractSchema, MethodSchema, SchemaBuilder, SchemaError, StateField};
pub use timing::{Timing, TimingStack};
pub use transaction::{
    AppStateUpdate, Authorization, Party, PartiesDocument, PartyBody, VerificationKey,
};

/// Number of app-state slots available to a single zkApp account.
pub const ZKAPP_STATE_LENGTH: usize = 8;
