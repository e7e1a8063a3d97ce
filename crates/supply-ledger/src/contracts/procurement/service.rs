use std::sync::Arc;

use chrono::NaiveDate;
use tracing::debug;

use super::domain::{
    keys, parse_date, MaterialActual, MaterialExpectation, PurchaseOrder, TrackingEvent,
};
use super::queries::OrderJoins;
use super::resolver::resolve;
use super::rollup::{MaterialObservation, OrderRollup};
use super::views::{
    MaterialLineView, MaterialListingView, MaterialSummaryView, OrderView, ReconciliationView,
    TrackingEventView,
};
use crate::contracts::invoice::{lookup_invoice_amount, InvoiceBinding, InvoiceClient};
use crate::contracts::{expect_args, ContractError, InvocationOutcome};
use crate::ledger::{encode_record, LedgerStore};

/// Pipe-separated roster reported when an unknown function is invoked.
pub const VALID_METHODS: &str = "createPurchaseOrder|createExpectedMaterialInformation|createActualMaterialInformation|createMaterialTracking|getAllPurchaseOrder|getAllMaterialInformation";

/// The procurement reconciliation contract: create-once record writes plus
/// the two read-side aggregate queries. Generic over the ledger seam and the
/// cross-contract invoice seam so it can be exercised without any real
/// ledger.
pub struct ProcurementContract<S: LedgerStore, I: InvoiceClient> {
    store: Arc<S>,
    invoices: Arc<I>,
    binding: InvoiceBinding,
}

impl<S: LedgerStore, I: InvoiceClient> ProcurementContract<S, I> {
    pub fn new(store: Arc<S>, invoices: Arc<I>, binding: InvoiceBinding) -> Self {
        Self {
            store,
            invoices,
            binding,
        }
    }

    /// Route a named operation with its flat string arguments, mirroring the
    /// command shell's function dispatch. `today` is the reconciliation date
    /// threaded in by the caller; the contract never reads the wall clock.
    pub fn dispatch(
        &self,
        function: &str,
        args: &[String],
        today: NaiveDate,
    ) -> Result<InvocationOutcome, ContractError> {
        debug!(function, argc = args.len(), "contract invocation");
        match function {
            "createPurchaseOrder" => self.create_purchase_order(args),
            "createExpectedMaterialInformation" => self.create_expected_material_information(args),
            "createActualMaterialInformation" => self.create_actual_material_information(args),
            "createMaterialTracking" => self.create_material_tracking(args),
            "getAllPurchaseOrder" => self.get_all_purchase_order(args, today),
            "getAllMaterialInformation" => self.get_all_material_information(args, today),
            other => Err(ContractError::UnknownFunction {
                function: other.to_string(),
                valid: VALID_METHODS,
            }),
        }
    }

    /// `createPurchaseOrder(orderId, supplierCode, supplierLocation)`
    pub fn create_purchase_order(&self, args: &[String]) -> Result<InvocationOutcome, ContractError> {
        expect_args("createPurchaseOrder", 3, args)?;

        let key = keys::purchase_order(&args[0]);
        if self.store.get(&key)?.is_some() {
            return Err(ContractError::Conflict(format!(
                "purchase order '{}' already exists",
                args[0]
            )));
        }

        let record = PurchaseOrder {
            purchase_order_number: args[0].clone(),
            supplier_code: args[1].clone(),
            supplier_location: args[2].clone(),
            is_purchase_order_object: true,
        };
        self.store.put(&key, encode_record(&record)?)?;

        Ok(InvocationOutcome::created("purchase order created successfully"))
    }

    /// `createExpectedMaterialInformation(materialId, orderId, expectedDate)`
    pub fn create_expected_material_information(
        &self,
        args: &[String],
    ) -> Result<InvocationOutcome, ContractError> {
        expect_args("createExpectedMaterialInformation", 3, args)?;
        let expected_date = valid_date("expectedDate", &args[2])?;

        let key = keys::expectation(&args[0], &args[1]);
        if self.store.get(&key)?.is_some() {
            return Err(ContractError::Conflict(format!(
                "expected date for material '{}' on purchase order '{}' already exists",
                args[0], args[1]
            )));
        }

        let record = MaterialExpectation {
            material_number: args[0].clone(),
            purchase_order_number: args[1].clone(),
            expected_date,
            is_expected_material_info_object: true,
        };
        self.store.put(&key, encode_record(&record)?)?;

        Ok(InvocationOutcome::created(
            "material expected delivery date recorded",
        ))
    }

    /// `createActualMaterialInformation(materialId, orderId, actualDate, delayReason)`
    pub fn create_actual_material_information(
        &self,
        args: &[String],
    ) -> Result<InvocationOutcome, ContractError> {
        expect_args("createActualMaterialInformation", 4, args)?;
        let actual_date = valid_date("actualDate", &args[2])?;

        let key = keys::actual(&args[0], &args[1]);
        if self.store.get(&key)?.is_some() {
            return Err(ContractError::Conflict(format!(
                "actual date for material '{}' on purchase order '{}' already exists",
                args[0], args[1]
            )));
        }

        let record = MaterialActual {
            material_number: args[0].clone(),
            purchase_order_number: args[1].clone(),
            actual_date,
            delay_reason: args[3].clone(),
            is_actual_material_info_object: true,
        };
        self.store.put(&key, encode_record(&record)?)?;

        Ok(InvocationOutcome::created(
            "material actual delivery date recorded",
        ))
    }

    /// `createMaterialTracking(trackingId, materialId, orderId, facility,
    /// timestamp, status, state, reason)`
    pub fn create_material_tracking(
        &self,
        args: &[String],
    ) -> Result<InvocationOutcome, ContractError> {
        expect_args("createMaterialTracking", 8, args)?;

        let key = keys::tracking(&args[0]);
        if self.store.get(&key)?.is_some() {
            return Err(ContractError::Conflict(format!(
                "tracking id '{}' already exists",
                args[0]
            )));
        }

        let record = TrackingEvent {
            tracking_id: args[0].clone(),
            track_material_number: args[1].clone(),
            track_purchase_order_number: args[2].clone(),
            supplier_facility_name: args[3].clone(),
            timestamp: args[4].clone(),
            track_status: args[5].clone(),
            track_state: args[6].clone(),
            track_reason: args[7].clone(),
        };
        self.store.put(&key, encode_record(&record)?)?;

        Ok(InvocationOutcome::created("tracking information recorded"))
    }

    /// `getAllPurchaseOrder()` — the fully joined, aggregated payload.
    pub fn get_all_purchase_order(
        &self,
        args: &[String],
        today: NaiveDate,
    ) -> Result<InvocationOutcome, ContractError> {
        expect_args("getAllPurchaseOrder", 0, args)?;

        let joins = OrderJoins::new(self.store.as_ref());
        let mut values = Vec::new();
        for order in joins.purchase_orders()? {
            values.push(self.reconcile_order(&joins, &order, today)?);
        }

        let payload = serde_json::to_value(ReconciliationView { values })
            .map_err(|source| crate::ledger::LedgerError::Encode { source })?;
        Ok(InvocationOutcome::ok(payload))
    }

    /// `getAllMaterialInformation()` — material-centric flat listing across
    /// all orders, each line joined with its order's supplier code.
    pub fn get_all_material_information(
        &self,
        args: &[String],
        today: NaiveDate,
    ) -> Result<InvocationOutcome, ContractError> {
        expect_args("getAllMaterialInformation", 0, args)?;

        let joins = OrderJoins::new(self.store.as_ref());
        let mut values = Vec::new();
        for expectation in joins.all_material_expectations()? {
            let line = self.resolve_line(&joins, &expectation, today)?;
            let supplier_code = self
                .load_order(&expectation.purchase_order_number)?
                .map(|order| order.supplier_code)
                .unwrap_or_default();

            values.push(MaterialSummaryView {
                raw_material_number: expectation.material_number.clone(),
                purchase_order_number: expectation.purchase_order_number.clone(),
                expected_date: expectation.expected_date.clone(),
                actual_date: line.actual_raw,
                delay_reason: line.resolution.delay_reason.clone(),
                invoice_amount: line.invoice.render_amount(),
                status: line.resolution.status.clone(),
                state: line.resolution.state.label().to_string(),
                delay_penalty: line.resolution.penalty.render(),
                supplier_code,
            });
        }

        let payload = serde_json::to_value(MaterialListingView { values })
            .map_err(|source| crate::ledger::LedgerError::Encode { source })?;
        Ok(InvocationOutcome::ok(payload))
    }

    fn reconcile_order(
        &self,
        joins: &OrderJoins<'_, S>,
        order: &PurchaseOrder,
        today: NaiveDate,
    ) -> Result<OrderView, ContractError> {
        let mut rollup = OrderRollup::new();
        let mut lines = Vec::new();

        for expectation in joins.materials_for_order(&order.purchase_order_number)? {
            let tracking = joins
                .tracking_for_material(
                    &expectation.material_number,
                    &expectation.purchase_order_number,
                )?
                .iter()
                .map(TrackingEventView::from)
                .collect();

            let line = self.resolve_line(joins, &expectation, today)?;
            rollup.observe(MaterialObservation {
                expected: expectation.expected(),
                expected_raw: &expectation.expected_date,
                actual: line.actual,
                actual_raw: &line.actual_raw,
                resolution: &line.resolution,
            });

            lines.push(MaterialLineView::assemble(
                &expectation.material_number,
                &expectation.expected_date,
                &line.actual_raw,
                tracking,
                &line.invoice,
                &line.resolution,
            ));
        }

        Ok(OrderView::assemble(order, lines, rollup.finish()))
    }

    /// Join one expectation with its actual record and invoice amount and
    /// run the resolver. An invoice failure degrades the line, never the
    /// invocation; a ledger failure aborts it.
    fn resolve_line(
        &self,
        joins: &OrderJoins<'_, S>,
        expectation: &MaterialExpectation,
        today: NaiveDate,
    ) -> Result<ResolvedLine, ContractError> {
        let actual_record = joins.actual_for_material(
            &expectation.material_number,
            &expectation.purchase_order_number,
        )?;

        let (actual_raw, delay_reason) = match &actual_record {
            Some(record) => (record.actual_date.clone(), record.delay_reason.clone()),
            None => (String::new(), String::new()),
        };

        let invoice = lookup_invoice_amount(
            self.invoices.as_ref(),
            self.binding,
            &expectation.purchase_order_number,
            &expectation.material_number,
            &expectation.expected_date,
            &actual_raw,
        );

        let actual = actual_record.as_ref().and_then(MaterialActual::actual);
        let resolution = resolve(
            expectation.expected(),
            actual,
            today,
            &delay_reason,
            &invoice,
        );

        Ok(ResolvedLine {
            actual,
            actual_raw,
            invoice,
            resolution,
        })
    }

    fn load_order(&self, order_number: &str) -> Result<Option<PurchaseOrder>, ContractError> {
        let key = keys::purchase_order(order_number);
        let Some(bytes) = self.store.get(&key)? else {
            return Ok(None);
        };
        let order = serde_json::from_slice(&bytes)
            .map_err(|source| crate::ledger::LedgerError::Corrupt { key, source })?;
        Ok(Some(order))
    }
}

struct ResolvedLine {
    actual: Option<NaiveDate>,
    actual_raw: String,
    invoice: crate::contracts::invoice::InvoiceLookup,
    resolution: super::resolver::MaterialResolution,
}

fn valid_date(field: &'static str, raw: &str) -> Result<String, ContractError> {
    match parse_date(raw) {
        Some(_) => Ok(raw.trim().to_string()),
        None => Err(ContractError::InvalidDate {
            field,
            value: raw.to_string(),
        }),
    }
}
