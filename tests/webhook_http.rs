//! Integration tests for payment notifications and the cron endpoint.

mod common;

use http::{Method, StatusCode};
use secrecy::SecretString;
use serde_json::{json, Value};

use invoicer::domain::foundation::InvoiceId;
use invoicer::domain::payment::{expected_signature, OrderId};

use common::{TestApp, CRON_SECRET, OWNER, SERVER_KEY};

fn notification(invoice: &Value, transaction_status: &str, gross_amount: &str) -> Vec<u8> {
    let id: InvoiceId = invoice["id"].as_str().unwrap().parse().unwrap();
    let number = invoice["invoice_number"].as_str().unwrap();
    let order_id = OrderId::for_invoice(number, id);
    let signature = expected_signature(
        order_id.as_str(),
        "200",
        gross_amount,
        &SecretString::new(SERVER_KEY.to_string()),
    );
    serde_json::to_vec(&json!({
        "order_id": order_id.as_str(),
        "status_code": "200",
        "gross_amount": gross_amount,
        "signature_key": signature,
        "transaction_status": transaction_status,
        "transaction_id": "tx-123",
        "payment_type": "bank_transfer"
    }))
    .unwrap()
}

async fn invoice_status(app: &TestApp, invoice: &Value) -> Value {
    let uri = format!("/api/invoices/{}", invoice["id"].as_str().unwrap());
    let (_, body) = app.send(Method::GET, &uri, Some(OWNER), None).await;
    body
}

#[tokio::test]
async fn settlement_marks_paid_and_emails_once() {
    let app = TestApp::new();
    app.save_gateway_keys().await;
    let invoice = app.create_invoice("INV-001", "pending", "2024-03-31").await;
    let body = notification(&invoice, "settlement", "111000.00");

    let (status, ack) = app.post_raw("/webhooks/payment", body.clone()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ack["ok"], true);
    assert_eq!(ack["outcome"], "applied");

    let (status, ack) = app.post_raw("/webhooks/payment", body).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ack["outcome"], "unchanged");

    let current = invoice_status(&app, &invoice).await;
    assert_eq!(current["status"], "paid");
    assert!(current["paid_at"].is_string());
    assert_eq!(current["payment_events"].as_array().unwrap().len(), 2);

    let paid = app.notifier.paid.lock().unwrap();
    assert_eq!(paid.len(), 1);
    assert_eq!(paid[0].to, "budi@example.com");
    assert_eq!(paid[0].amount, 111000);
}

#[tokio::test]
async fn tampered_amount_is_forbidden() {
    let app = TestApp::new();
    app.save_gateway_keys().await;
    let invoice = app.create_invoice("INV-001", "pending", "2024-03-31").await;

    let mut body: Value =
        serde_json::from_slice(&notification(&invoice, "settlement", "111000.00")).unwrap();
    body["gross_amount"] = json!("1000.00");
    let (status, ack) = app
        .post_raw("/webhooks/payment", serde_json::to_vec(&body).unwrap())
        .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(ack["ok"], false);
    assert_eq!(invoice_status(&app, &invoice).await["status"], "pending");
    assert!(app.notifier.paid.lock().unwrap().is_empty());
}

#[tokio::test]
async fn signed_but_wrong_amount_is_a_bad_request() {
    let app = TestApp::new();
    app.save_gateway_keys().await;
    let invoice = app.create_invoice("INV-001", "pending", "2024-03-31").await;

    let (status, _) = app
        .post_raw(
            "/webhooks/payment",
            notification(&invoice, "settlement", "1000.00"),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(invoice_status(&app, &invoice).await["status"], "pending");
}

#[tokio::test]
async fn unknown_order_is_not_found() {
    let app = TestApp::new();
    let body = serde_json::to_vec(&json!({
        "order_id": "no-separator-here",
        "status_code": "200",
        "gross_amount": "1000.00",
        "signature_key": "abc",
        "transaction_status": "settlement"
    }))
    .unwrap();

    let (status, _) = app.post_raw("/webhooks/payment", body).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn malformed_body_is_a_bad_request() {
    let app = TestApp::new();
    let (status, ack) = app.post_raw("/webhooks/payment", b"not json".to_vec()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(ack["ok"], false);
}

#[tokio::test]
async fn expiry_voids_and_pending_status_is_acknowledged() {
    let app = TestApp::new();
    app.save_gateway_keys().await;
    let invoice = app.create_invoice("INV-001", "pending", "2024-03-31").await;

    let (status, ack) = app
        .post_raw(
            "/webhooks/payment",
            notification(&invoice, "pending", "111000.00"),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ack["outcome"], "unchanged");

    let (status, ack) = app
        .post_raw(
            "/webhooks/payment",
            notification(&invoice, "expire", "111000.00"),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ack["outcome"], "applied");
    assert_eq!(invoice_status(&app, &invoice).await["status"], "void");
    assert!(app.notifier.paid.lock().unwrap().is_empty());
}

#[tokio::test]
async fn cron_requires_the_shared_key() {
    let app = TestApp::new();

    let (status, _) = app
        .send(Method::GET, "/internal/cron/invoices", None, None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app
        .send(Method::GET, "/internal/cron/invoices?key=wrong", None, None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn cron_sends_reminders_and_marks_overdue() {
    let app = TestApp::new();
    let late = app.create_invoice("INV-001", "pending", "2024-03-05").await;
    let upcoming = app.create_invoice("INV-002", "pending", "2024-03-20").await;

    let uri = format!(
        "/internal/cron/invoices?key={}&date=2024-03-10",
        CRON_SECRET
    );
    let (status, summary) = app.send(Method::POST, &uri, None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(summary["date"], "2024-03-10");
    assert_eq!(summary["reminders_sent"], 1);
    assert_eq!(summary["marked_overdue"], 1);

    assert_eq!(invoice_status(&app, &late).await["status"], "overdue");
    assert_eq!(invoice_status(&app, &upcoming).await["status"], "pending");

    let reminders = app.notifier.reminders.lock().unwrap();
    assert_eq!(reminders.len(), 1);
    assert_eq!(reminders[0].invoice_number, "INV-002");
}

#[tokio::test]
async fn overdue_invoice_can_still_be_paid() {
    let app = TestApp::new();
    app.save_gateway_keys().await;
    let invoice = app.create_invoice("INV-001", "pending", "2024-03-05").await;

    let uri = format!(
        "/internal/cron/invoices?key={}&date=2024-03-10",
        CRON_SECRET
    );
    app.send(Method::GET, &uri, None, None).await;
    assert_eq!(invoice_status(&app, &invoice).await["status"], "overdue");

    let (status, _) = app
        .post_raw(
            "/webhooks/payment",
            notification(&invoice, "settlement", "111000.00"),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(invoice_status(&app, &invoice).await["status"], "paid");
}
