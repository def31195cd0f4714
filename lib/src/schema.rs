//! Typed contract declarations
//!
//! A [`ContractSchema`] describes the persistent state fields of a zkApp and
//! the argument types of its mutating methods, so that a proving toolchain can
//! allocate circuit storage and decode method arguments. Schemas are built once
//! through [`SchemaBuilder`] and validated as a whole; an invalid declaration
//! never reaches a toolchain.

use crate::field::{FieldType, Value};
use crate::ZKAPP_STATE_LENGTH;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashSet;
use thiserror::Error;

/// Errors detected while building a schema or checking method arguments
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    #[error("Contract name must not be empty")]
    EmptyContractName,

    #[error("State field names must not be empty")]
    EmptyStateName,

    #[error("Method names must not be empty")]
    EmptyMethodName,

    #[error("State field '{0}' is declared more than once")]
    DuplicateState(String),

    #[error("Method '{0}' is declared more than once")]
    DuplicateMethod(String),

    #[error("Too many state fields: {count} declared, at most {max} allowed")]
    TooManyStateFields { count: usize, max: usize },

    #[error("Initial value of state '{field}' has type {actual}, expected {expected}")]
    InitialValueType {
        field: String,
        expected: FieldType,
        actual: FieldType,
    },

    #[error("Method '{method}' assigns unknown state field '{field}'")]
    UnknownStateField { method: String, field: String },

    #[error("Method '{method}' assigns from argument {index}, but it takes {arity} argument(s)")]
    AssignmentIndex {
        method: String,
        index: usize,
        arity: usize,
    },

    #[error(
        "Method '{method}' assigns a {actual} argument to state '{field}' of type {expected}"
    )]
    AssignmentType {
        method: String,
        field: String,
        expected: FieldType,
        actual: FieldType,
    },

    #[error("Unknown method: {0}")]
    UnknownMethod(String),

    #[error("Method '{method}' expects {expected} argument(s), got {actual}")]
    ArgumentCount {
        method: String,
        expected: usize,
        actual: usize,
    },

    #[error("Argument {index} of method '{method}' must be {expected}, got {actual}")]
    ArgumentType {
        method: String,
        index: usize,
        expected: FieldType,
        actual: FieldType,
    },
}

/// A persistent state field of a contract
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateField {
    pub name: String,
    pub field_type: FieldType,
    /// Value written by the deploy transaction, if any
    pub initial: Option<Value>,
}

/// A state assignment performed by a method: `state <- args[argument]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    pub state: String,
    pub argument: usize,
}

/// A mutating method and its ordered argument types
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodSchema {
    pub name: String,
    pub arguments: Vec<FieldType>,
    pub assignments: Vec<Assignment>,
}

impl MethodSchema {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            arguments: Vec::new(),
            assignments: Vec::new(),
        }
    }

    #[must_use]
    pub fn arg(mut self, field_type: FieldType) -> Self {
        self.arguments.push(field_type);
        self
    }

    /// Declare that the method writes argument `argument` into state `state`.
    #[must_use]
    pub fn assigns(mut self, state: impl Into<String>, argument: usize) -> Self {
        self.assignments.push(Assignment {
            state: state.into(),
            argument,
        });
        self
    }
}

/// The complete, validated declaration of a contract
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractSchema {
    name: String,
    state: Vec<StateField>,
    methods: Vec<MethodSchema>,
}

impl ContractSchema {
    pub fn builder(name: impl Into<String>) -> SchemaBuilder {
        SchemaBuilder {
            name: name.into(),
            state: Vec::new(),
            methods: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn state(&self) -> &[StateField] {
        &self.state
    }

    pub fn methods(&self) -> &[MethodSchema] {
        &self.methods
    }

    pub fn method(&self, name: &str) -> Option<&MethodSchema> {
        self.methods.iter().find(|m| m.name == name)
    }

    /// App-state slot occupied by a state field (declaration order).
    pub fn state_index(&self, name: &str) -> Option<usize> {
        self.state.iter().position(|s| s.name == name)
    }

    /// Check a call's arguments against the declared signature of `method`.
    pub fn check_arguments(
        &self,
        method: &str,
        args: &[Value],
    ) -> Result<&MethodSchema, SchemaError> {
        let schema = self
            .method(method)
            .ok_or_else(|| SchemaError::UnknownMethod(method.to_string()))?;

        if schema.arguments.len() != args.len() {
            return Err(SchemaError::ArgumentCount {
                method: method.to_string(),
                expected: schema.arguments.len(),
                actual: args.len(),
            });
        }

        for (index, (expected, arg)) in schema.arguments.iter().zip(args).enumerate() {
            if arg.field_type() != *expected {
                return Err(SchemaError::ArgumentType {
                    method: method.to_string(),
                    index,
                    expected: *expected,
                    actual: arg.field_type(),
                });
            }
        }

        Ok(schema)
    }

    /// SHA-256 over the canonical JSON encoding; identifies the circuit shape.
    pub fn digest(&self) -> [u8; 32] {
        // Serializing plain structs of strings and enums cannot fail
        let encoded = serde_json::to_vec(self).unwrap_or_default();
        Sha256::digest(&encoded).into()
    }
}

/// Builder for [`ContractSchema`]
#[derive(Debug, Clone)]
pub struct SchemaBuilder {
    name: String,
    state: Vec<StateField>,
    methods: Vec<MethodSchema>,
}

impl SchemaBuilder {
    #[must_use]
    pub fn state(
        mut self,
        name: impl Into<String>,
        field_type: FieldType,
        initial: Option<Value>,
    ) -> Self {
        self.state.push(StateField {
            name: name.into(),
            field_type,
            initial,
        });
        self
    }

    #[must_use]
    pub fn method(mut self, method: MethodSchema) -> Self {
        self.methods.push(method);
        self
    }

    pub fn build(self) -> Result<ContractSchema, SchemaError> {
        if self.name.trim().is_empty() {
            return Err(SchemaError::EmptyContractName);
        }

        if self.state.len() > ZKAPP_STATE_LENGTH {
            return Err(SchemaError::TooManyStateFields {
                count: self.state.len(),
                max: ZKAPP_STATE_LENGTH,
            });
        }

        let mut seen = HashSet::new();
        for field in &self.state {
            if field.name.is_empty() {
                return Err(SchemaError::EmptyStateName);
            }
            if !seen.insert(field.name.as_str()) {
                return Err(SchemaError::DuplicateState(field.name.clone()));
            }
            if let Some(initial) = &field.initial {
                if initial.field_type() != field.field_type {
                    return Err(SchemaError::InitialValueType {
                        field: field.name.clone(),
                        expected: field.field_type,
                        actual: initial.field_type(),
                    });
                }
            }
        }

        let mut seen = HashSet::new();
        for method in &self.methods {
            if method.name.is_empty() {
                return Err(SchemaError::EmptyMethodName);
            }
            if !seen.insert(method.name.as_str()) {
                return Err(SchemaError::DuplicateMethod(method.name.clone()));
            }
            for assignment in &method.assignments {
                let field = self
                    .state
                    .iter()
                    .find(|s| s.name == assignment.state)
                    .ok_or_else(|| SchemaError::UnknownStateField {
                        method: method.name.clone(),
                        field: assignment.state.clone(),
                    })?;
                let actual = method.arguments.get(assignment.argument).ok_or_else(|| {
                    SchemaError::AssignmentIndex {
                        method: method.name.clone(),
                        index: assignment.argument,
                        arity: method.arguments.len(),
                    }
                })?;
                if *actual != field.field_type {
                    return Err(SchemaError::AssignmentType {
                        method: method.name.clone(),
                        field: field.name.clone(),
                        expected: field.field_type,
                        actual: *actual,
                    });
                }
            }
        }

        Ok(ContractSchema {
            name: self.name,
            state: self.state,
            methods: self.methods,
        })
    }
}
