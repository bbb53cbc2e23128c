//! Shared builders for handler tests.

use chrono::NaiveDate;

use crate::domain::foundation::{CustomerId, InvoiceId, UserId};
use crate::domain::invoice::{
    CustomerContact, Invoice, InvoiceDraft, InvoiceLineItem, InvoiceStatus, TaxRate,
};

pub fn owner() -> UserId {
    UserId::new("owner-1").unwrap()
}

pub fn stranger() -> UserId {
    UserId::new("intruder").unwrap()
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Two items at 50 000 with 10 % tax: total 110 000.
pub fn draft() -> InvoiceDraft {
    InvoiceDraft {
        invoice_number: "INV-2024-001".to_string(),
        customer: CustomerContact::new("Budi", "budi@example.com", None).unwrap(),
        issue_date: date(2024, 5, 1),
        due_date: date(2024, 5, 15),
        tax_rate: TaxRate::from_percent_str("10").unwrap(),
        items: vec![InvoiceLineItem {
            description: "Logo design".to_string(),
            quantity: 2,
            unit_price: 50_000,
        }],
    }
}

pub fn invoice_with_status(status: InvoiceStatus) -> Invoice {
    let invoice = Invoice::create(
        InvoiceId::new(),
        owner(),
        CustomerId::new(),
        draft(),
        InvoiceStatus::Pending,
    )
    .unwrap();
    with_status(invoice, status)
}

/// Rebuilds `invoice` with a different stored status.
fn with_status(invoice: Invoice, status: InvoiceStatus) -> Invoice {
    use crate::domain::invoice::InvoiceRecord;

    let totals = *invoice.totals();
    Invoice::reconstitute(InvoiceRecord {
        id: invoice.id(),
        owner_id: owner(),
        invoice_number: invoice.invoice_number().to_string(),
        customer_id: invoice.customer_id(),
        customer: invoice.customer().clone(),
        issue_date: invoice.issue_date(),
        due_date: invoice.due_date(),
        items: invoice.items().to_vec(),
        sub_total: totals.sub_total,
        tax_rate: totals.tax_rate,
        tax_amount: totals.tax_amount,
        total_amount: totals.total_amount,
        status,
        paid_at: None,
        created_at: invoice.created_at(),
        updated_at: invoice.updated_at(),
    })
    .unwrap()
}

pub const SERVER_KEY: &str = "SB-Mid-server-fixture";

/// A notification signed with `SERVER_KEY` the way the gateway signs it.
pub fn signed_notification(
    invoice: &Invoice,
    transaction_status: &str,
    gross_amount: &str,
) -> crate::domain::payment::PaymentNotification {
    use crate::domain::payment::{expected_signature, OrderId, PaymentNotification};
    use secrecy::SecretString;

    let order_id = OrderId::for_invoice(invoice.invoice_number(), invoice.id()).to_string();
    let status_code = "200";
    let signature_key = expected_signature(
        &order_id,
        status_code,
        gross_amount,
        &SecretString::new(SERVER_KEY.to_string()),
    );
    PaymentNotification {
        order_id,
        status_code: status_code.to_string(),
        gross_amount: gross_amount.to_string(),
        signature_key,
        transaction_status: transaction_status.to_string(),
        fraud_status: None,
        transaction_id: Some("tx-fixture".to_string()),
        payment_type: Some("bank_transfer".to_string()),
        transaction_time: None,
    }
}
