use serde::de::DeserializeOwned;

use super::domain::{MaterialActual, MaterialExpectation, PurchaseOrder, TrackingEvent};
use crate::ledger::{LedgerError, LedgerStore, Selector};

/// Read-side join layer over the external query facility. Every method is a
/// single equality-selector query; any failure aborts the whole order's
/// reconciliation with no partial result.
pub struct OrderJoins<'a, S: LedgerStore> {
    store: &'a S,
}

impl<'a, S: LedgerStore> OrderJoins<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    pub fn purchase_orders(&self) -> Result<Vec<PurchaseOrder>, LedgerError> {
        let selector = Selector::new().field("isPurchaseOrderObject", true);
        self.collect(&selector)
    }

    pub fn materials_for_order(
        &self,
        order_number: &str,
    ) -> Result<Vec<MaterialExpectation>, LedgerError> {
        let selector = Selector::new()
            .field("isExpectedMaterialInfoObject", true)
            .field("purchaseOrderNumber", order_number);
        self.collect(&selector)
    }

    pub fn all_material_expectations(&self) -> Result<Vec<MaterialExpectation>, LedgerError> {
        let selector = Selector::new().field("isExpectedMaterialInfoObject", true);
        self.collect(&selector)
    }

    /// At most one record exists per pair (uniqueness is enforced at write
    /// time); should the store ever surface duplicates anyway, the first
    /// match is used.
    pub fn actual_for_material(
        &self,
        material_number: &str,
        order_number: &str,
    ) -> Result<Option<MaterialActual>, LedgerError> {
        let selector = Selector::new()
            .field("isActualMaterialInfoObject", true)
            .field("materialNumber", material_number)
            .field("purchaseOrderNumber", order_number);
        let mut records: Vec<MaterialActual> = self.collect(&selector)?;
        Ok(if records.is_empty() {
            None
        } else {
            Some(records.swap_remove(0))
        })
    }

    pub fn tracking_for_material(
        &self,
        material_number: &str,
        order_number: &str,
    ) -> Result<Vec<TrackingEvent>, LedgerError> {
        let selector = Selector::new()
            .field("trackMaterialNumber", material_number)
            .field("trackPurchaseOrderNumber", order_number);
        self.collect(&selector)
    }

    fn collect<T: DeserializeOwned>(&self, selector: &Selector) -> Result<Vec<T>, LedgerError> {
        self.store
            .query(selector)?
            .into_iter()
            .map(|(key, bytes)| decode(&key, &bytes))
            .collect()
    }
}

fn decode<T: DeserializeOwned>(key: &str, bytes: &[u8]) -> Result<T, LedgerError> {
    serde_json::from_slice(bytes).map_err(|source| LedgerError::Corrupt {
        key: key.to_string(),
        source,
    })
}
