//! The contract driven by the `simple-zkapp` binary: one field of state,
//! set at deploy time and overwritten by `update`.

use crate::error::Result;
use zkapp_lib::{ContractSchema, Field, FieldType, MethodSchema, Value};

pub const CONTRACT_NAME: &str = "SimpleZkapp";
pub const STATE_X: &str = "x";
pub const METHOD_UPDATE: &str = "update";

/// Value of `x` written by the deploy transaction
pub const INITIAL_STATE: Field = Field::ONE;

pub fn simple_zkapp() -> Result<ContractSchema> {
    let schema = ContractSchema::builder(CONTRACT_NAME)
        .state(STATE_X, FieldType::Field, Some(Value::Field(INITIAL_STATE)))
        .method(
            MethodSchema::new(METHOD_UPDATE)
                .arg(FieldType::Field)
                .assigns(STATE_X, 0),
        )
        .build()?;
    Ok(schema)
}
