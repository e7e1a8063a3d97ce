//! Typed serde views reproducing the externally agreed response shape. The
//! field names are wire contract, not style: downstream consumers were built
//! against the original hand-assembled JSON.

use serde::Serialize;

use super::domain::TrackingEvent;
use super::resolver::MaterialResolution;
use super::rollup::OrderRollupSummary;
use crate::contracts::invoice::InvoiceLookup;

/// Top-level aggregate payload: `{"values": [...]}`.
#[derive(Debug, Clone, Serialize)]
pub struct ReconciliationView {
    pub values: Vec<OrderView>,
}

/// One fully joined purchase order with its rollup fields.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderView {
    pub purchase_order_number: String,
    pub supplier_code: String,
    pub supplier_location: String,
    pub expected_raw_material_information: Vec<MaterialLineView>,
    pub parent_status: String,
    pub state: String,
    /// Present when at least one material line has delivered.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_actual_date: Option<String>,
    /// The agreed shape uses this key (empty) instead when nothing has
    /// delivered yet.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual_date: Option<String>,
    pub delay_reason: String,
    pub parent_expected_date: String,
    pub over_all_shipment_status: String,
}

impl OrderView {
    pub fn assemble(
        order: &super::domain::PurchaseOrder,
        lines: Vec<MaterialLineView>,
        summary: OrderRollupSummary,
    ) -> Self {
        let (parent_actual_date, actual_date) = match summary.parent_actual_date {
            Some(date) => (Some(date), None),
            None => (None, Some(String::new())),
        };
        Self {
            purchase_order_number: order.purchase_order_number.clone(),
            supplier_code: order.supplier_code.clone(),
            supplier_location: order.supplier_location.clone(),
            expected_raw_material_information: lines,
            parent_status: summary.parent_status,
            state: summary.parent_state.label().to_string(),
            parent_actual_date,
            actual_date,
            delay_reason: summary.parent_delay_reason,
            parent_expected_date: summary.parent_expected_date,
            over_all_shipment_status: summary.shipment_percent,
        }
    }
}

/// One material line inside an order.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterialLineView {
    pub raw_material_number: String,
    pub tracking_info: Vec<TrackingEventView>,
    pub delay_reason: String,
    pub actual_date: String,
    pub invoice_amount: String,
    pub status: String,
    pub state: String,
    pub delay_penalty: String,
    pub expected_date: String,
}

impl MaterialLineView {
    pub fn assemble(
        material_number: &str,
        expected_date: &str,
        actual_date: &str,
        tracking: Vec<TrackingEventView>,
        invoice: &InvoiceLookup,
        resolution: &MaterialResolution,
    ) -> Self {
        Self {
            raw_material_number: material_number.to_string(),
            tracking_info: tracking,
            delay_reason: resolution.delay_reason.clone(),
            actual_date: actual_date.to_string(),
            invoice_amount: invoice.render_amount(),
            status: resolution.status.clone(),
            state: resolution.state.label().to_string(),
            delay_penalty: resolution.penalty.render(),
            expected_date: expected_date.to_string(),
        }
    }
}

/// One tracking checkpoint as surfaced per material line.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackingEventView {
    pub supplier_facility_name: String,
    pub track_status: String,
    pub reason: String,
    pub state: String,
    pub timestamp: String,
}

impl From<&TrackingEvent> for TrackingEventView {
    fn from(event: &TrackingEvent) -> Self {
        Self {
            supplier_facility_name: event.supplier_facility_name.clone(),
            track_status: event.track_status.clone(),
            reason: event.track_reason.clone(),
            state: event.track_state.clone(),
            timestamp: event.timestamp.clone(),
        }
    }
}

/// Material-centric listing payload for `getAllMaterialInformation`.
#[derive(Debug, Clone, Serialize)]
pub struct MaterialListingView {
    pub values: Vec<MaterialSummaryView>,
}

/// One material line across all orders, flattened with its order's supplier
/// code.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterialSummaryView {
    pub raw_material_number: String,
    pub purchase_order_number: String,
    pub expected_date: String,
    pub actual_date: String,
    pub delay_reason: String,
    pub invoice_amount: String,
    pub status: String,
    pub state: String,
    pub delay_penalty: String,
    pub supplier_code: String,
}
