use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use chrono::NaiveDate;
use serde_json::Value;

use crate::contracts::invoice::{
    ContractInvoiceClient, InvoiceBinding, InvoiceClient, InvoiceError,
};
use crate::contracts::procurement::service::ProcurementContract;
use crate::ledger::{LedgerError, LedgerStore, Selector};

/// Deterministic in-memory world state: key-ordered enumeration, equality
/// selectors evaluated against the stored JSON documents.
#[derive(Default, Clone)]
pub(super) struct MemoryLedger {
    documents: Arc<Mutex<BTreeMap<String, Vec<u8>>>>,
}

impl LedgerStore for MemoryLedger {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, LedgerError> {
        let guard = self.documents.lock().expect("ledger mutex poisoned");
        Ok(guard.get(key).cloned())
    }

    fn put(&self, key: &str, value: Vec<u8>) -> Result<(), LedgerError> {
        let mut guard = self.documents.lock().expect("ledger mutex poisoned");
        guard.insert(key.to_string(), value);
        Ok(())
    }

    fn query(&self, selector: &Selector) -> Result<Vec<(String, Vec<u8>)>, LedgerError> {
        let guard = self.documents.lock().expect("ledger mutex poisoned");
        let mut matches = Vec::new();
        for (key, bytes) in guard.iter() {
            let document: Value = serde_json::from_slice(bytes)
                .map_err(|err| LedgerError::Query(err.to_string()))?;
            if selector.matches(&document) {
                matches.push((key.clone(), bytes.clone()));
            }
        }
        Ok(matches)
    }
}

/// Invoice seam that always fails, for exercising the unavailable path.
pub(super) struct FailingInvoiceClient;

impl InvoiceClient for FailingInvoiceClient {
    fn invoke(&self, _args: &[String]) -> Result<Vec<u8>, InvoiceError> {
        Err(InvoiceError::Transport("peer unreachable".to_string()))
    }
}

pub(super) type TestContract = ProcurementContract<MemoryLedger, ContractInvoiceClient<MemoryLedger>>;

/// Procurement contract wired to a co-deployed invoice contract, each over
/// its own ledger namespace.
pub(super) fn build_contract() -> (TestContract, Arc<ContractInvoiceClient<MemoryLedger>>) {
    let store = Arc::new(MemoryLedger::default());
    let invoice_store = Arc::new(MemoryLedger::default());
    let invoices = Arc::new(ContractInvoiceClient::new(invoice_store));
    let contract = ProcurementContract::new(store, invoices.clone(), InvoiceBinding::KeyOnly);
    (contract, invoices)
}

pub(super) fn args(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}

pub(super) fn date(raw: &str) -> NaiveDate {
    crate::contracts::procurement::domain::parse_date(raw).expect("valid test date")
}

/// Seed an invoice through the co-deployed contract's own create operation.
pub(super) fn seed_invoice(
    invoices: &ContractInvoiceClient<MemoryLedger>,
    invoice_number: &str,
    material: &str,
    order: &str,
    amount: &str,
) {
    invoices
        .contract()
        .create_invoice(&args(&[invoice_number, material, order, amount]))
        .expect("invoice seeds");
}
