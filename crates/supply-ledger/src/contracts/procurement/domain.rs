use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Calendar-date encoding shared by every stored record (`MM/DD/YYYY`).
pub const DATE_FORMAT: &str = "%m/%d/%Y";

/// Parse a stored ledger date. Empty strings mean "not yet recorded" and
/// are a legitimate absence, not an error; anything else malformed is
/// rejected at write time so this never fails on the read path.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT).ok()
}

/// Root of the join: the top-level purchase/demand record material lines
/// are grouped under. Created once, immutable thereafter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseOrder {
    pub purchase_order_number: String,
    pub supplier_code: String,
    pub supplier_location: String,
    pub is_purchase_order_object: bool,
}

/// Expected delivery date for one (material, order) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterialExpectation {
    pub material_number: String,
    pub purchase_order_number: String,
    pub expected_date: String,
    pub is_expected_material_info_object: bool,
}

impl MaterialExpectation {
    pub fn expected(&self) -> Option<NaiveDate> {
        parse_date(&self.expected_date)
    }
}

/// Actual delivery date and delay reason for one (material, order) pair.
/// At most one exists per pair; uniqueness is enforced at write time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterialActual {
    pub material_number: String,
    pub purchase_order_number: String,
    pub actual_date: String,
    pub delay_reason: String,
    pub is_actual_material_info_object: bool,
}

impl MaterialActual {
    pub fn actual(&self) -> Option<NaiveDate> {
        parse_date(&self.actual_date)
    }
}

/// One shipment tracking checkpoint. Many per (material, order); no
/// ordering is imposed beyond the store's enumeration. The track-prefixed
/// join fields keep tracking documents out of the expectation/actual
/// selectors, which share the plain field names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackingEvent {
    pub tracking_id: String,
    pub track_material_number: String,
    pub track_purchase_order_number: String,
    pub supplier_facility_name: String,
    pub timestamp: String,
    pub track_status: String,
    pub track_state: String,
    pub track_reason: String,
}

/// Natural-key ledger keyspace. Prefixes keep the five entity kinds from
/// colliding in the shared world state.
pub(crate) mod keys {
    pub fn purchase_order(order_number: &str) -> String {
        order_number.to_string()
    }

    pub fn expectation(material_number: &str, order_number: &str) -> String {
        format!("Ex-{material_number}-{order_number}")
    }

    pub fn actual(material_number: &str, order_number: &str) -> String {
        format!("Ac-{material_number}-{order_number}")
    }

    pub fn tracking(tracking_id: &str) -> String {
        format!("TR-{tracking_id}")
    }
}
