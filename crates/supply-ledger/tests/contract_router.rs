use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use serde_json::{json, Value};
use supply_ledger::contracts::invoice::{ContractInvoiceClient, InvoiceBinding};
use supply_ledger::contracts::procurement::{contract_router, ProcurementContract};
use supply_ledger::ledger::{LedgerError, LedgerStore, Selector};
use tower::ServiceExt;

#[derive(Default, Clone)]
struct MemoryLedger {
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
            let document: Value =
                serde_json::from_slice(bytes).map_err(|err| LedgerError::Query(err.to_string()))?;
            if selector.matches(&document) {
                matches.push((key.clone(), bytes.clone()));
            }
        }
        Ok(matches)
    }
}

fn build_router() -> axum::Router {
    let store = Arc::new(MemoryLedger::default());
    let invoice_store = Arc::new(MemoryLedger::default());
    let invoices = Arc::new(ContractInvoiceClient::new(invoice_store));
    let contract = Arc::new(ProcurementContract::new(
        store,
        invoices,
        InvoiceBinding::KeyOnly,
    ));
    contract_router(contract)
}

fn invoke_request(function: &str, args: &[&str], current_date: Option<&str>) -> Request<Body> {
    let mut body = json!({
        "function": function,
        "args": args,
    });
    if let Some(current_date) = current_date {
        body["currentDate"] = json!(current_date);
    }

    Request::builder()
        .method("POST")
        .uri("/api/v1/contract/invoke")
        .header("content-type", "application/json")
        .body(Body::from(
            serde_json::to_vec(&body).expect("serialize request"),
        ))
        .expect("request")
}

async fn body_json(response: axum::response::Response) -> Value {
    let body = to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("body");
    serde_json::from_slice(&body).expect("json")
}

#[tokio::test]
async fn invoke_creates_a_purchase_order() {
    let router = build_router();

    let response = router
        .oneshot(invoke_request(
            "createPurchaseOrder",
            &["PO1", "SUP-7", "Hamburg"],
            None,
        ))
        .await
        .expect("router dispatch");

    assert_eq!(response.status(), StatusCode::CREATED);
    let payload = body_json(response).await;
    assert_eq!(
        payload.get("message").and_then(|message| message.as_str()),
        Some("purchase order created successfully"),
    );
}

#[tokio::test]
async fn duplicate_create_maps_to_conflict() {
    let router = build_router();

    let response = router
        .clone()
        .oneshot(invoke_request(
            "createPurchaseOrder",
            &["PO1", "SUP-7", "Hamburg"],
            None,
        ))
        .await
        .expect("router dispatch");
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = router
        .oneshot(invoke_request(
            "createPurchaseOrder",
            &["PO1", "SUP-9", "Lyon"],
            None,
        ))
        .await
        .expect("router dispatch");

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let payload = body_json(response).await;
    let error = payload
        .get("error")
        .and_then(|error| error.as_str())
        .expect("error body");
    assert!(error.contains("PO1"));
}

#[tokio::test]
async fn unknown_function_maps_to_not_implemented() {
    let router = build_router();

    let response = router
        .oneshot(invoke_request("transferAsset", &[], None))
        .await
        .expect("router dispatch");

    assert_eq!(response.status(), StatusCode::NOT_IMPLEMENTED);
    let payload = body_json(response).await;
    let error = payload
        .get("error")
        .and_then(|error| error.as_str())
        .expect("error body");
    assert!(error.contains("transferAsset"));
    assert!(error.contains("getAllPurchaseOrder"));
}

#[tokio::test]
async fn orders_endpoint_reconciles_with_the_supplied_date() {
    let router = build_router();

    for (function, args) in [
        ("createPurchaseOrder", vec!["PO1", "SUP-7", "Hamburg"]),
        (
            "createExpectedMaterialInformation",
            vec!["MAT-1", "PO1", "01/10/2024"],
        ),
    ] {
        let response = router
            .clone()
            .oneshot(invoke_request(function, &args, None))
            .await
            .expect("router dispatch");
        assert_eq!(response.status(), StatusCode::CREATED, "{function}");
    }

    let response = router
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/v1/orders?currentDate=01%2F20%2F2024")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("router dispatch");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = body_json(response).await;
    let order = &payload["values"][0];
    assert_eq!(order["purchaseOrderNumber"], "PO1");
    assert_eq!(
        order["expectedRawMaterialInformation"][0]["status"],
        "Delayed+10"
    );
}

#[tokio::test]
async fn malformed_reconciliation_date_is_rejected() {
    let router = build_router();

    let response = router
        .clone()
        .oneshot(invoke_request(
            "getAllPurchaseOrder",
            &[],
            Some("2024-01-20"),
        ))
        .await
        .expect("router dispatch");
    assert_eq!(response.status(), StatusCode::NOT_ACCEPTABLE);
    let payload = body_json(response).await;
    assert!(payload
        .get("error")
        .and_then(|error| error.as_str())
        .expect("error body")
        .contains("MM/DD/YYYY"));

    let response = router
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/v1/orders?currentDate=not-a-date")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("router dispatch");
    assert_eq!(response.status(), StatusCode::NOT_ACCEPTABLE);
}

#[tokio::test]
async fn invoke_arity_failures_map_to_not_acceptable() {
    let router = build_router();

    let response = router
        .oneshot(invoke_request("createPurchaseOrder", &["PO1"], None))
        .await
        .expect("router dispatch");

    assert_eq!(response.status(), StatusCode::NOT_ACCEPTABLE);
    let payload = body_json(response).await;
    assert!(payload
        .get("error")
        .and_then(|error| error.as_str())
        .expect("error body")
        .contains("expects 3 arguments"));
}
