use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::{Local, NaiveDate};
use serde::Deserialize;
use serde_json::json;

use super::domain::parse_date;
use super::service::ProcurementContract;
use crate::contracts::invoice::InvoiceClient;
use crate::contracts::{ContractError, InvocationOutcome};
use crate::ledger::LedgerStore;

/// Router builder exposing the contract's invocation surface over HTTP.
pub fn contract_router<S, I>(contract: Arc<ProcurementContract<S, I>>) -> Router
where
    S: LedgerStore + 'static,
    I: InvoiceClient + 'static,
{
    Router::new()
        .route("/api/v1/contract/invoke", post(invoke_handler::<S, I>))
        .route("/api/v1/orders", get(orders_handler::<S, I>))
        .with_state(contract)
}

/// Body of the generic invocation endpoint: a function name, its flat
/// string arguments, and an optional reconciliation date (`MM/DD/YYYY`)
/// defaulting to the local date.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvokeRequest {
    pub function: String,
    #[serde(default)]
    pub args: Vec<String>,
    #[serde(default)]
    pub current_date: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrdersQuery {
    #[serde(default)]
    pub current_date: Option<String>,
}

pub(crate) async fn invoke_handler<S, I>(
    State(contract): State<Arc<ProcurementContract<S, I>>>,
    axum::Json(request): axum::Json<InvokeRequest>,
) -> Response
where
    S: LedgerStore + 'static,
    I: InvoiceClient + 'static,
{
    let today = match reconciliation_date(request.current_date.as_deref()) {
        Ok(today) => today,
        Err(response) => return response,
    };

    render_outcome(contract.dispatch(&request.function, &request.args, today))
}

pub(crate) async fn orders_handler<S, I>(
    State(contract): State<Arc<ProcurementContract<S, I>>>,
    Query(query): Query<OrdersQuery>,
) -> Response
where
    S: LedgerStore + 'static,
    I: InvoiceClient + 'static,
{
    let today = match reconciliation_date(query.current_date.as_deref()) {
        Ok(today) => today,
        Err(response) => return response,
    };

    render_outcome(contract.dispatch("getAllPurchaseOrder", &[], today))
}

fn reconciliation_date(raw: Option<&str>) -> Result<NaiveDate, Response> {
    match raw {
        None => Ok(Local::now().date_naive()),
        Some(raw) => parse_date(raw).ok_or_else(|| {
            let payload = json!({
                "error": format!("invalid currentDate '{raw}': expected MM/DD/YYYY"),
            });
            (StatusCode::NOT_ACCEPTABLE, axum::Json(payload)).into_response()
        }),
    }
}

fn render_outcome(result: Result<InvocationOutcome, ContractError>) -> Response {
    match result {
        Ok(outcome) => {
            let status = StatusCode::from_u16(outcome.status).unwrap_or(StatusCode::OK);
            let body = match outcome.payload {
                Some(payload) => payload,
                None => json!({ "message": outcome.message }),
            };
            (status, axum::Json(body)).into_response()
        }
        Err(err) => {
            let status =
                StatusCode::from_u16(err.status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            let payload = json!({ "error": err.to_string() });
            (status, axum::Json(payload)).into_response()
        }
    }
}
