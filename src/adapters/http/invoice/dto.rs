//! Request and response types for the invoice API.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::application::handlers::PaymentTokenResult;
use crate::domain::foundation::{CustomerId, InvoiceId};
use crate::domain::invoice::{
    CustomerContact, Invoice, InvoiceDraft, InvoiceError, InvoiceLineItem, InvoiceStatus, TaxRate,
};
use crate::ports::PaymentEventRecord;

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Deserialize)]
pub struct CustomerRequest {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub address: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LineItemRequest {
    pub description: String,
    pub quantity: i64,
    /// Minor units.
    pub unit_price: i64,
}

/// Body for create and edit.
///
/// Totals are never accepted from the client; they are recomputed from the
/// items and tax rate.
#[derive(Debug, Clone, Deserialize)]
pub struct InvoiceRequest {
    pub invoice_number: String,
    pub customer: CustomerRequest,
    pub issue_date: NaiveDate,
    pub due_date: NaiveDate,
    pub tax_rate: TaxRate,
    pub items: Vec<LineItemRequest>,
    /// Initial status on create (draft or pending). Ignored on edit.
    #[serde(default)]
    pub status: Option<InvoiceStatus>,
}

impl InvoiceRequest {
    pub fn into_draft(self) -> Result<InvoiceDraft, InvoiceError> {
        let customer =
            CustomerContact::new(self.customer.name, self.customer.email, self.customer.address)?;
        Ok(InvoiceDraft {
            invoice_number: self.invoice_number,
            customer,
            issue_date: self.issue_date,
            due_date: self.due_date,
            tax_rate: self.tax_rate,
            items: self
                .items
                .into_iter()
                .map(|i| InvoiceLineItem {
                    description: i.description,
                    quantity: i.quantity,
                    unit_price: i.unit_price,
                })
                .collect(),
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChangeStatusRequest {
    pub status: InvoiceStatus,
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize)]
pub struct LineItemResponse {
    pub description: String,
    pub quantity: i64,
    pub unit_price: i64,
    pub line_total: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct PaymentEventResponse {
    pub order_id: String,
    pub transaction_status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fraud_status: Option<String>,
    pub gross_amount: String,
    pub outcome: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    pub received_at: DateTime<Utc>,
}

impl From<PaymentEventRecord> for PaymentEventResponse {
    fn from(r: PaymentEventRecord) -> Self {
        Self {
            order_id: r.order_id,
            transaction_status: r.transaction_status,
            fraud_status: r.fraud_status,
            gross_amount: r.gross_amount,
            outcome: r.outcome.as_str(),
            detail: r.detail,
            received_at: r.received_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct InvoiceResponse {
    pub id: InvoiceId,
    pub invoice_number: String,
    pub customer_id: CustomerId,
    pub customer: CustomerContact,
    pub issue_date: NaiveDate,
    pub due_date: NaiveDate,
    pub items: Vec<LineItemResponse>,
    pub sub_total: i64,
    pub tax_rate: TaxRate,
    pub tax_amount: i64,
    pub total_amount: i64,
    pub status: InvoiceStatus,
    pub paid_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub payment_events: Vec<PaymentEventResponse>,
}

impl From<&Invoice> for InvoiceResponse {
    fn from(invoice: &Invoice) -> Self {
        let totals = invoice.totals();
        Self {
            id: invoice.id(),
            invoice_number: invoice.invoice_number().to_string(),
            customer_id: invoice.customer_id(),
            customer: invoice.customer().clone(),
            issue_date: invoice.issue_date(),
            due_date: invoice.due_date(),
            items: invoice
                .items()
                .iter()
                .map(|i| LineItemResponse {
                    description: i.description.clone(),
                    quantity: i.quantity,
                    unit_price: i.unit_price,
                    line_total: i.line_total(),
                })
                .collect(),
            sub_total: totals.sub_total,
            tax_rate: totals.tax_rate,
            tax_amount: totals.tax_amount,
            total_amount: totals.total_amount,
            status: invoice.status(),
            paid_at: invoice.paid_at().map(|t| *t.as_datetime()),
            created_at: *invoice.created_at().as_datetime(),
            updated_at: *invoice.updated_at().as_datetime(),
            payment_events: Vec::new(),
        }
    }
}

impl InvoiceResponse {
    pub fn with_events(mut self, events: Vec<PaymentEventRecord>) -> Self {
        self.payment_events = events.into_iter().map(PaymentEventResponse::from).collect();
        self
    }
}

/// Body the checkout page expects from the token endpoint.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentTokenResponse {
    pub success: bool,
    pub token: String,
    pub client_key: String,
    pub is_sandbox: bool,
    pub checkout_script_url: String,
    pub order_id: String,
}

impl From<PaymentTokenResult> for PaymentTokenResponse {
    fn from(r: PaymentTokenResult) -> Self {
        Self {
            success: true,
            token: r.token,
            client_key: r.client_key,
            is_sandbox: r.mode.is_sandbox(),
            checkout_script_url: r.checkout_script_url,
            order_id: r.order_id.as_str().to_string(),
        }
    }
}

/// Failure body for the token endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct PaymentTokenFailure {
    pub success: bool,
    pub code: String,
    pub message: String,
}
