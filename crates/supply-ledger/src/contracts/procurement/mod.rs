//! The procurement reconciliation contract: record catalog, query join
//! layer, penalty/status resolver, order rollup, and the response views the
//! command shell returns verbatim.

pub mod domain;
pub mod queries;
pub mod resolver;
pub mod rollup;
pub mod router;
pub mod service;
pub mod views;

#[cfg(test)]
mod tests;

pub use domain::{
    parse_date, MaterialActual, MaterialExpectation, PurchaseOrder, TrackingEvent, DATE_FORMAT,
};
pub use queries::OrderJoins;
pub use resolver::{resolve, DeliveryState, MaterialResolution, Penalty};
pub use rollup::{MaterialObservation, OrderRollup, OrderRollupSummary};
pub use router::{contract_router, InvokeRequest};
pub use service::{ProcurementContract, VALID_METHODS};
pub use views::{
    MaterialLineView, MaterialListingView, MaterialSummaryView, OrderView, ReconciliationView,
    TrackingEventView,
};
