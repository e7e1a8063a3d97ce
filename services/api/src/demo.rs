use std::sync::Arc;

use chrono::NaiveDate;
use clap::Args;
use supply_ledger::contracts::invoice::{ContractInvoiceClient, InvoiceBinding};
use supply_ledger::contracts::procurement::{ProcurementContract, DATE_FORMAT};
use supply_ledger::error::AppError;

use crate::infra::InMemoryLedger;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Reconciliation date (MM/DD/YYYY). Defaults to 02/01/2024, two weeks
    /// after the sample order book's expected dates.
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) today: Option<NaiveDate>,
    /// Skip the material-centric listing portion of the demo output.
    #[arg(long)]
    pub(crate) skip_materials: bool,
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        today,
        skip_materials,
    } = args;

    let today = match today {
        Some(today) => today,
        None => parse_demo_date("02/01/2024")?,
    };

    let store = Arc::new(InMemoryLedger::default());
    let invoice_store = Arc::new(InMemoryLedger::default());
    let invoices = Arc::new(ContractInvoiceClient::new(invoice_store));
    let contract = ProcurementContract::new(store, invoices.clone(), InvoiceBinding::KeyOnly);

    seed_order_book(&contract, &invoices)?;

    println!("Supply ledger reconciliation demo");
    println!("Reconciliation date: {}", today.format(DATE_FORMAT));

    let orders = contract.dispatch("getAllPurchaseOrder", &[], today)?;
    println!("\nReconciled purchase orders");
    render_payload(orders.payload);

    if skip_materials {
        return Ok(());
    }

    let materials = contract.dispatch("getAllMaterialInformation", &[], today)?;
    println!("\nMaterial listing across orders");
    render_payload(materials.payload);

    Ok(())
}

/// One on-time line, one two-days-late line with an invoice behind it, and
/// one order still waiting on delivery.
fn seed_order_book(
    contract: &ProcurementContract<InMemoryLedger, ContractInvoiceClient<InMemoryLedger>>,
    invoices: &ContractInvoiceClient<InMemoryLedger>,
) -> Result<(), AppError> {
    let calls: &[(&str, &[&str])] = &[
        ("createPurchaseOrder", &["PO1", "SUP-7", "Hamburg"]),
        ("createPurchaseOrder", &["PO2", "SUP-9", "Lyon"]),
        (
            "createExpectedMaterialInformation",
            &["MAT-1", "PO1", "01/10/2024"],
        ),
        (
            "createActualMaterialInformation",
            &["MAT-1", "PO1", "01/10/2024", ""],
        ),
        (
            "createExpectedMaterialInformation",
            &["MAT-2", "PO1", "01/12/2024"],
        ),
        (
            "createActualMaterialInformation",
            &["MAT-2", "PO1", "01/14/2024", "customs hold"],
        ),
        (
            "createMaterialTracking",
            &[
                "TRK-1",
                "MAT-2",
                "PO1",
                "Hamburg DC",
                "01/13/2024 08:00",
                "In Transit",
                "Success",
                "",
            ],
        ),
        (
            "createExpectedMaterialInformation",
            &["MAT-3", "PO2", "01/25/2024"],
        ),
    ];

    // Seeding never hits the invoice seam, so any fixed date works here.
    let seed_date = parse_demo_date("01/01/2024")?;
    for (function, args) in calls {
        let args: Vec<String> = args.iter().map(|value| value.to_string()).collect();
        contract.dispatch(function, &args, seed_date)?;
    }

    let invoice_args: Vec<String> = ["INV-1", "MAT-2", "PO1", "1000"]
        .iter()
        .map(|value| value.to_string())
        .collect();
    invoices.contract().create_invoice(&invoice_args)?;

    Ok(())
}

fn render_payload(payload: Option<serde_json::Value>) {
    let Some(payload) = payload else {
        println!("  (no payload)");
        return;
    };
    match serde_json::to_string_pretty(&payload) {
        Ok(json) => println!("{json}"),
        Err(err) => println!("  payload unavailable: {err}"),
    }
}

fn parse_demo_date(raw: &str) -> Result<NaiveDate, AppError> {
    crate::infra::parse_date(raw)
        .map_err(|message| AppError::Io(std::io::Error::new(std::io::ErrorKind::InvalidInput, message)))
}
