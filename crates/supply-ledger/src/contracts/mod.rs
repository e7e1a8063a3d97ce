//! Ledger contracts: the procurement reconciliation contract and the
//! structurally identical invoice contract it reaches via cross-contract
//! invocation. Both expose named operations over flat string argument lists
//! and share the invocation error taxonomy below.

pub mod invoice;
pub mod procurement;

use crate::ledger::LedgerError;
use serde_json::Value;

/// Invocation failures, ordered from caller mistakes to infrastructure
/// faults. Validation and conflict errors are raised before any write; a
/// storage error aborts the invocation with no partial state (each create
/// performs at most one write).
#[derive(Debug, thiserror::Error)]
pub enum ContractError {
    #[error("'{function}' expects {expected} arguments, received {received}")]
    InvalidArguments {
        function: &'static str,
        expected: usize,
        received: usize,
    },
    #[error("invalid date '{value}' for {field}: expected MM/DD/YYYY")]
    InvalidDate { field: &'static str, value: String },
    #[error("invalid amount '{0}': expected a decimal number")]
    InvalidAmount(String),
    #[error("{0}")]
    Conflict(String),
    #[error(transparent)]
    Storage(#[from] LedgerError),
    #[error("invalid method '{function}'; valid methods are '{valid}'")]
    UnknownFunction { function: String, valid: &'static str },
}

impl ContractError {
    /// HTTP-style status code the command shell reports for this failure.
    pub fn status(&self) -> u16 {
        match self {
            ContractError::InvalidArguments { .. }
            | ContractError::InvalidDate { .. }
            | ContractError::InvalidAmount(_) => 406,
            ContractError::Conflict(_) => 409,
            ContractError::Storage(_) => 500,
            ContractError::UnknownFunction { .. } => 501,
        }
    }
}

/// Successful invocation result: a status code, a human-readable message,
/// and an optional payload document for query operations.
#[derive(Debug, Clone, PartialEq)]
pub struct InvocationOutcome {
    pub status: u16,
    pub message: String,
    pub payload: Option<Value>,
}

impl InvocationOutcome {
    pub fn created(message: impl Into<String>) -> Self {
        Self {
            status: 201,
            message: message.into(),
            payload: None,
        }
    }

    pub fn ok(payload: Value) -> Self {
        Self {
            status: 200,
            message: "OK".to_string(),
            payload: Some(payload),
        }
    }

    /// 200 with no payload, used by lookups that legitimately found nothing.
    pub fn empty() -> Self {
        Self {
            status: 200,
            message: "OK".to_string(),
            payload: None,
        }
    }
}

/// Arity guard shared by every named operation.
pub(crate) fn expect_args(
    function: &'static str,
    expected: usize,
    args: &[String],
) -> Result<(), ContractError> {
    if args.len() == expected {
        Ok(())
    } else {
        Err(ContractError::InvalidArguments {
            function,
            expected,
            received: args.len(),
        })
    }
}
