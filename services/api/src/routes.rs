use std::sync::Arc;

use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use serde_json::json;
use supply_ledger::contracts::invoice::InvoiceClient;
use supply_ledger::contracts::procurement::{contract_router, ProcurementContract};
use supply_ledger::ledger::LedgerStore;

use crate::infra::AppState;

/// Contract invocation surface plus the operational endpoints every
/// deployment carries.
pub(crate) fn with_contract_routes<S, I>(
    contract: Arc<ProcurementContract<S, I>>,
) -> axum::Router
where
    S: LedgerStore + 'static,
    I: InvoiceClient + 'static,
{
    contract_router(contract)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}
