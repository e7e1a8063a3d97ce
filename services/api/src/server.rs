use std::sync::atomic::Ordering;
use std::sync::Arc;

use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use supply_ledger::config::AppConfig;
use supply_ledger::contracts::invoice::{ContractInvoiceClient, InvoiceBinding};
use supply_ledger::contracts::procurement::ProcurementContract;
use supply_ledger::error::AppError;
use supply_ledger::telemetry;
use tracing::info;

use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryLedger};
use crate::routes::with_contract_routes;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    // Procurement and invoice contracts each own a ledger namespace, joined
    // only through the invocation seam.
    let store = Arc::new(InMemoryLedger::default());
    let invoice_store = Arc::new(InMemoryLedger::default());
    let invoices = Arc::new(ContractInvoiceClient::new(invoice_store));
    let contract = Arc::new(ProcurementContract::new(
        store,
        invoices,
        InvoiceBinding::KeyOnly,
    ));

    let app = with_contract_routes(contract)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "supply ledger reconciliation service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
