//! Interface to the external key-value ledger and its secondary-index query
//! facility. The ledger itself (replication, consensus, concurrency control)
//! lives outside this crate; everything here is specified at the seam.

use serde_json::Value;

/// Equality predicate over the indexed fields of stored JSON documents.
///
/// This mirrors the `{"selector": {...}}` rich-query shape of the backing
/// store: every listed field must be present and equal for a document to
/// match. The core performs no filtering or sorting beyond what the
/// predicate encodes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selector {
    fields: Vec<(String, Value)>,
}

impl Selector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.fields.push((name.to_string(), value.into()));
        self
    }

    pub fn fields(&self) -> &[(String, Value)] {
        &self.fields
    }

    /// True when every predicate field is present and equal in `document`.
    pub fn matches(&self, document: &Value) -> bool {
        self.fields
            .iter()
            .all(|(name, value)| document.get(name) == Some(value))
    }
}

/// Storage abstraction over the distributed ledger's world state.
///
/// `query` carries no ordering guarantee across calls or nodes; callers must
/// not rely on enumeration order for anything that affects output.
pub trait LedgerStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, LedgerError>;
    fn put(&self, key: &str, value: Vec<u8>) -> Result<(), LedgerError>;
    fn query(&self, selector: &Selector) -> Result<Vec<(String, Vec<u8>)>, LedgerError>;
}

/// Failures surfaced by the ledger seam. Any of these aborts the whole
/// invocation; partial results are never returned.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("ledger read failed: {0}")]
    Read(String),
    #[error("ledger write failed: {0}")]
    Write(String),
    #[error("ledger query failed: {0}")]
    Query(String),
    #[error("record encoding failed: {source}")]
    Encode { source: serde_json::Error },
    #[error("stored document under '{key}' is not valid JSON: {source}")]
    Corrupt {
        key: String,
        source: serde_json::Error,
    },
}

/// Serialize a record for storage, mapping serializer failures onto the
/// ledger error taxonomy so `create*` operations stay single-error-typed.
pub fn encode_record<T: serde::Serialize>(record: &T) -> Result<Vec<u8>, LedgerError> {
    serde_json::to_vec(record).map_err(|source| LedgerError::Encode { source })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn selector_matches_on_all_fields() {
        let selector = Selector::new()
            .field("isPurchaseOrderObject", true)
            .field("purchaseOrderNumber", "PO1");

        assert!(selector.matches(&json!({
            "purchaseOrderNumber": "PO1",
            "supplierCode": "SUP-9",
            "isPurchaseOrderObject": true,
        })));
        assert!(!selector.matches(&json!({
            "purchaseOrderNumber": "PO2",
            "isPurchaseOrderObject": true,
        })));
        assert!(!selector.matches(&json!({ "purchaseOrderNumber": "PO1" })));
    }

    #[test]
    fn empty_selector_matches_everything() {
        assert!(Selector::new().matches(&json!({ "anything": 1 })));
    }
}
