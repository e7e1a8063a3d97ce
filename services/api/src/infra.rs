use std::collections::BTreeMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;
use serde_json::Value;
use supply_ledger::contracts::procurement::parse_date as parse_ledger_date;
use supply_ledger::ledger::{LedgerError, LedgerStore, Selector};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// World state for a single-node deployment: key-ordered storage with
/// selector queries evaluated against the stored JSON documents.
#[derive(Default, Clone)]
pub(crate) struct InMemoryLedger {
    documents: Arc<Mutex<BTreeMap<String, Vec<u8>>>>,
}

impl LedgerStore for InMemoryLedger {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, LedgerError> {
        let guard = self
            .documents
            .lock()
            .map_err(|_| LedgerError::Read("ledger mutex poisoned".to_string()))?;
        Ok(guard.get(key).cloned())
    }

    fn put(&self, key: &str, value: Vec<u8>) -> Result<(), LedgerError> {
        let mut guard = self
            .documents
            .lock()
            .map_err(|_| LedgerError::Write("ledger mutex poisoned".to_string()))?;
        guard.insert(key.to_string(), value);
        Ok(())
    }

    fn query(&self, selector: &Selector) -> Result<Vec<(String, Vec<u8>)>, LedgerError> {
        let guard = self
            .documents
            .lock()
            .map_err(|_| LedgerError::Query("ledger mutex poisoned".to_string()))?;
        let mut matches = Vec::new();
        for (key, bytes) in guard.iter() {
            let document: Value = serde_json::from_slice(bytes)
                .map_err(|source| LedgerError::Corrupt {
                    key: key.clone(),
                    source,
                })?;
            if selector.matches(&document) {
                matches.push((key.clone(), bytes.clone()));
            }
        }
        Ok(matches)
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    parse_ledger_date(raw).ok_or_else(|| format!("failed to parse '{raw}' as MM/DD/YYYY"))
}
