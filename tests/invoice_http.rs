//! Integration tests for the owner-facing invoice API.

mod common;

use http::{Method, StatusCode};
use serde_json::json;

use common::{invoice_body, TestApp, OWNER};

#[tokio::test]
async fn create_computes_totals_server_side() {
    let app = TestApp::new();
    let invoice = app.create_invoice("INV-001", "draft", "2024-03-31").await;

    assert_eq!(invoice["sub_total"], 100000);
    assert_eq!(invoice["tax_rate"], "11");
    assert_eq!(invoice["tax_amount"], 11000);
    assert_eq!(invoice["total_amount"], 111000);
    assert_eq!(invoice["status"], "draft");
    assert_eq!(invoice["items"][0]["line_total"], 50000);
}

#[tokio::test]
async fn requests_without_owner_are_rejected() {
    let app = TestApp::new();
    let (status, body) = app
        .send(
            Method::POST,
            "/api/invoices",
            None,
            Some(invoice_body("INV-001", "draft", "2024-03-31")),
        )
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "AUTHENTICATION_REQUIRED");
}

#[tokio::test]
async fn validation_errors_name_the_field() {
    let app = TestApp::new();
    let mut body = invoice_body("INV-001", "draft", "2024-03-31");
    body["customer"]["email"] = json!("not-an-email");

    let (status, body) = app
        .send(Method::POST, "/api/invoices", Some(OWNER), Some(body))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_FAILED");
    assert_eq!(body["field"], "customer.email");
}

#[tokio::test]
async fn new_invoice_cannot_start_paid() {
    let app = TestApp::new();
    let (status, body) = app
        .send(
            Method::POST,
            "/api/invoices",
            Some(OWNER),
            Some(invoice_body("INV-001", "paid", "2024-03-31")),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["field"], "status");
}

#[tokio::test]
async fn other_owners_cannot_read_an_invoice() {
    let app = TestApp::new();
    let invoice = app.create_invoice("INV-001", "draft", "2024-03-31").await;
    let uri = format!("/api/invoices/{}", invoice["id"].as_str().unwrap());

    let (status, _) = app.send(Method::GET, &uri, Some("someone-else"), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app.send(Method::GET, &uri, Some(OWNER), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["invoice_number"], "INV-001");
}

#[tokio::test]
async fn edit_recomputes_totals() {
    let app = TestApp::new();
    let invoice = app.create_invoice("INV-001", "pending", "2024-03-31").await;
    let uri = format!("/api/invoices/{}", invoice["id"].as_str().unwrap());

    let mut body = invoice_body("INV-001", "pending", "2024-03-31");
    body["items"] = json!([{"description": "Retainer", "quantity": 3, "unit_price": 100000}]);
    body["tax_rate"] = json!("0");
    let (status, body) = app.send(Method::PUT, &uri, Some(OWNER), Some(body)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_amount"], 300000);
    assert_eq!(body["status"], "pending");
}

#[tokio::test]
async fn mark_sent_then_owner_voids() {
    let app = TestApp::new();
    let invoice = app.create_invoice("INV-001", "draft", "2024-03-31").await;
    let id = invoice["id"].as_str().unwrap();

    let (status, body) = app
        .send(Method::POST, &format!("/api/invoices/{}/sent", id), Some(OWNER), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "pending");

    let (status, body) = app
        .send(
            Method::POST,
            &format!("/api/invoices/{}/status", id),
            Some(OWNER),
            Some(json!({"status": "void"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "void");

    let (status, body) = app
        .send(
            Method::POST,
            &format!("/api/invoices/{}/status", id),
            Some(OWNER),
            Some(json!({"status": "pending"})),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "INVALID_STATE_TRANSITION");
}

#[tokio::test]
async fn delete_removes_unpaid_invoice() {
    let app = TestApp::new();
    let invoice = app.create_invoice("INV-001", "draft", "2024-03-31").await;
    let uri = format!("/api/invoices/{}", invoice["id"].as_str().unwrap());

    let (status, _) = app.send(Method::DELETE, &uri, Some(OWNER), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = app.send(Method::GET, &uri, Some(OWNER), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn payment_token_requires_gateway_keys() {
    let app = TestApp::new();
    let invoice = app.create_invoice("INV-001", "pending", "2024-03-31").await;
    let uri = format!(
        "/api/invoices/{}/payment-token",
        invoice["id"].as_str().unwrap()
    );

    let (status, body) = app.send(Method::POST, &uri, Some(OWNER), None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["success"], false);
    assert!(body["message"].as_str().unwrap().contains("not configured"));

    app.save_gateway_keys().await;
    let (status, body) = app.send(Method::POST, &uri, Some(OWNER), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["token"], "snap-token-1");
    assert_eq!(body["clientKey"], "SB-Mid-client-xyz");
    assert_eq!(body["isSandbox"], true);
    assert_eq!(
        body["checkoutScriptUrl"],
        "https://app.sandbox.midtrans.com/snap/snap.js"
    );

    let requests = app.gateway.requests.lock().unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].gross_amount, 111000);
    assert!(requests[0].order_id.as_str().starts_with("INV-001_"));
}

#[tokio::test]
async fn settings_reject_blank_server_key() {
    let app = TestApp::new();
    let (status, body) = app
        .send(
            Method::PUT,
            "/api/settings/gateway",
            Some(OWNER),
            Some(json!({"client_key": "SB-Mid-client-xyz", "server_key": "  "})),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["field"], "server_key");
}

#[tokio::test]
async fn health_reports_ok() {
    let app = TestApp::new();
    let (status, body) = app.send(Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}
