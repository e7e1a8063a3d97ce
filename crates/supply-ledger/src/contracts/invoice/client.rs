use std::sync::Arc;

use serde_json::Value;

use super::{InvoiceContract, GET_INVOICE_AMOUNT};
use crate::ledger::LedgerStore;

/// Outbound seam for the inter-contract invocation primitive: an ordered
/// argument list in, a serialized response payload out.
pub trait InvoiceClient: Send + Sync {
    fn invoke(&self, args: &[String]) -> Result<Vec<u8>, InvoiceError>;
}

/// Failures of the cross-contract call itself. These never abort the
/// reconciliation; they degrade into [`InvoiceLookup::Unavailable`].
#[derive(Debug, thiserror::Error)]
pub enum InvoiceError {
    #[error("invoice contract unreachable: {0}")]
    Transport(String),
    #[error("invoice contract rejected the request: {0}")]
    Rejected(String),
}

/// Positional argument shape of the deployed invoice contract. The two
/// variants are deployed and versioned together with the contract; picking
/// the wrong one is a deployment error, not a runtime condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvoiceBinding {
    /// `[fn, orderId, materialId]`
    KeyOnly,
    /// `[fn, orderId, materialId, expectedDate, actualDate]`
    KeyWithDates,
}

/// Result of the amount lookup. `NotFound` (no invoice recorded) is a
/// legitimate business state and distinct from `Unavailable` (the call
/// failed or returned an unparseable payload), so a transport fault is
/// never conflated with a zero amount.
#[derive(Debug, Clone, PartialEq)]
pub enum InvoiceLookup {
    Amount(f64),
    NotFound,
    Unavailable(String),
}

impl InvoiceLookup {
    /// Amount column as rendered in response payloads.
    pub fn render_amount(&self) -> String {
        match self {
            InvoiceLookup::Amount(amount) => format!("{amount:.2}"),
            InvoiceLookup::NotFound => String::new(),
            InvoiceLookup::Unavailable(_) => "unavailable".to_string(),
        }
    }
}

/// Build the positional request for the configured binding, dispatch it, and
/// interpret the serialized response.
pub fn lookup_invoice_amount<I: InvoiceClient>(
    client: &I,
    binding: InvoiceBinding,
    order_number: &str,
    material_number: &str,
    expected_date: &str,
    actual_date: &str,
) -> InvoiceLookup {
    let mut args = vec![
        GET_INVOICE_AMOUNT.to_string(),
        order_number.to_string(),
        material_number.to_string(),
    ];
    if binding == InvoiceBinding::KeyWithDates {
        args.push(expected_date.to_string());
        args.push(actual_date.to_string());
    }

    let payload = match client.invoke(&args) {
        Ok(payload) => payload,
        Err(err) => return InvoiceLookup::Unavailable(err.to_string()),
    };

    interpret_response(&payload)
}

fn interpret_response(payload: &[u8]) -> InvoiceLookup {
    if payload.is_empty() {
        return InvoiceLookup::NotFound;
    }

    let document: Value = match serde_json::from_slice(payload) {
        Ok(document) => document,
        Err(err) => return InvoiceLookup::Unavailable(format!("malformed invoice response: {err}")),
    };

    let amount = match document.get("invoiceAmount") {
        Some(Value::String(raw)) => raw.trim().parse::<f64>().ok(),
        Some(Value::Number(number)) => number.as_f64(),
        _ => None,
    };

    match amount {
        Some(amount) if amount.is_finite() => InvoiceLookup::Amount(amount),
        _ => InvoiceLookup::Unavailable("invoice response missing a usable amount".to_string()),
    }
}

/// Adapter binding a co-deployed [`InvoiceContract`] behind the invocation
/// seam, the shape the surrounding ledger gives cross-contract calls.
pub struct ContractInvoiceClient<S: LedgerStore> {
    contract: InvoiceContract<S>,
}

impl<S: LedgerStore> ContractInvoiceClient<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self {
            contract: InvoiceContract::new(store),
        }
    }

    pub fn contract(&self) -> &InvoiceContract<S> {
        &self.contract
    }
}

impl<S: LedgerStore> InvoiceClient for ContractInvoiceClient<S> {
    fn invoke(&self, args: &[String]) -> Result<Vec<u8>, InvoiceError> {
        let (function, rest) = args
            .split_first()
            .ok_or_else(|| InvoiceError::Rejected("missing function name".to_string()))?;

        let outcome = self
            .contract
            .dispatch(function, rest)
            .map_err(|err| InvoiceError::Rejected(err.to_string()))?;

        match outcome.payload {
            Some(payload) => serde_json::to_vec(&payload)
                .map_err(|err| InvoiceError::Transport(err.to_string())),
            None => Ok(Vec::new()),
        }
    }
}
