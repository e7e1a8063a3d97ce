//! The invoice contract: owner of invoiced amounts, reached by the
//! procurement contract through the ledger's inter-contract invocation
//! primitive. Its storage is a separate ledger namespace; the procurement
//! side only ever reads from it.

mod client;

pub use client::{
    lookup_invoice_amount, ContractInvoiceClient, InvoiceBinding, InvoiceClient, InvoiceError,
    InvoiceLookup,
};

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::contracts::{expect_args, ContractError, InvocationOutcome};
use crate::ledger::{encode_record, LedgerStore, Selector};

/// Function name both bindings of the cross-contract call dispatch to.
pub const GET_INVOICE_AMOUNT: &str = "getInvoiceAmountById";

const VALID_METHODS: &str = "createInvoice|getInvoiceAmountById";

/// Invoice document, keyed by invoice number with a marker field so the
/// amount lookup can run an equality query over (order, material).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceRecord {
    pub invoice_number: String,
    pub material_number: String,
    pub purchase_order_number: String,
    pub invoice_amount: String,
    pub invoice_info: bool,
}

fn invoice_key(invoice_number: &str) -> String {
    format!("IN-{invoice_number}")
}

/// The deployed invoice contract over its own ledger store.
pub struct InvoiceContract<S: LedgerStore> {
    store: Arc<S>,
}

impl<S: LedgerStore> InvoiceContract<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Route a named operation, mirroring the chaincode `Invoke` entrypoint.
    pub fn dispatch(
        &self,
        function: &str,
        args: &[String],
    ) -> Result<InvocationOutcome, ContractError> {
        match function {
            "createInvoice" => self.create_invoice(args),
            GET_INVOICE_AMOUNT => self.invoice_amount_by_id(args),
            other => Err(ContractError::UnknownFunction {
                function: other.to_string(),
                valid: VALID_METHODS,
            }),
        }
    }

    /// `createInvoice(invoiceNumber, materialNumber, orderNumber, amount)`
    pub fn create_invoice(&self, args: &[String]) -> Result<InvocationOutcome, ContractError> {
        expect_args("createInvoice", 4, args)?;

        let amount = args[3].trim();
        if amount.parse::<f64>().map(f64::is_finite) != Ok(true) {
            return Err(ContractError::InvalidAmount(args[3].clone()));
        }

        let key = invoice_key(&args[0]);
        if self.store.get(&key)?.is_some() {
            return Err(ContractError::Conflict(format!(
                "invoice '{}' already exists",
                args[0]
            )));
        }

        let record = InvoiceRecord {
            invoice_number: args[0].clone(),
            material_number: args[1].clone(),
            purchase_order_number: args[2].clone(),
            invoice_amount: amount.to_string(),
            invoice_info: true,
        };
        self.store.put(&key, encode_record(&record)?)?;

        Ok(InvocationOutcome::created("invoice created successfully"))
    }

    /// `getInvoiceAmountById(orderNumber, materialNumber[, expectedDate, actualDate])`
    ///
    /// Amounts are keyed by the (material, order) pair, so the date arguments
    /// of the 4-ary binding are accepted and ignored. An absent invoice
    /// yields an empty response rather than an error.
    pub fn invoice_amount_by_id(
        &self,
        args: &[String],
    ) -> Result<InvocationOutcome, ContractError> {
        if args.len() != 2 && args.len() != 4 {
            return Err(ContractError::InvalidArguments {
                function: GET_INVOICE_AMOUNT,
                expected: 2,
                received: args.len(),
            });
        }

        let selector = Selector::new()
            .field("invoiceInfo", true)
            .field("purchaseOrderNumber", args[0].as_str())
            .field("materialNumber", args[1].as_str());

        let mut matches = self.store.query(&selector)?;
        let Some((key, bytes)) = matches.drain(..).next() else {
            return Ok(InvocationOutcome::empty());
        };

        let record: InvoiceRecord = serde_json::from_slice(&bytes)
            .map_err(|source| crate::ledger::LedgerError::Corrupt { key, source })?;

        Ok(InvocationOutcome::ok(
            json!({ "invoiceAmount": record.invoice_amount }),
        ))
    }
}
