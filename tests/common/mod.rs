//! Shared setup for HTTP integration tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::Router;
use http::{Method, Request, StatusCode};
use secrecy::SecretString;
use serde_json::{json, Value};
use tower::ServiceExt;

use invoicer::adapters::http::{app_router, AppState, HttpSettings, OWNER_HEADER};
use invoicer::adapters::memory::{
    InMemoryCredentialStore, InMemoryInvoiceRepository, InMemoryPaymentEventLog,
};
use invoicer::domain::invoice::{GatewayCredentials, GatewayMode};
use invoicer::ports::{
    DueReminderNotice, GatewayError, NotificationError, NotificationSender, PaymentGateway,
    PaymentReceivedNotice, TransactionRequest, TransactionToken,
};

pub const OWNER: &str = "owner-1";
pub const CRON_SECRET: &str = "cron-secret";
pub const SERVER_KEY: &str = "SB-Mid-server-abc123";

/// Records every email instead of sending it.
#[derive(Default)]
pub struct RecordingNotifier {
    pub paid: Mutex<Vec<PaymentReceivedNotice>>,
    pub reminders: Mutex<Vec<DueReminderNotice>>,
}

#[async_trait]
impl NotificationSender for RecordingNotifier {
    async fn send_payment_received(
        &self,
        notice: &PaymentReceivedNotice,
    ) -> Result<(), NotificationError> {
        self.paid.lock().unwrap().push(notice.clone());
        Ok(())
    }

    async fn send_due_reminder(&self, notice: &DueReminderNotice) -> Result<(), NotificationError> {
        self.reminders.lock().unwrap().push(notice.clone());
        Ok(())
    }
}

/// Gateway stub that issues a fixed token and records requests.
#[derive(Default)]
pub struct StubGateway {
    pub requests: Mutex<Vec<TransactionRequest>>,
}

#[async_trait]
impl PaymentGateway for StubGateway {
    async fn create_transaction_token(
        &self,
        _credentials: &GatewayCredentials,
        request: &TransactionRequest,
    ) -> Result<TransactionToken, GatewayError> {
        self.requests.lock().unwrap().push(request.clone());
        Ok(TransactionToken {
            token: "snap-token-1".to_string(),
            redirect_url: None,
        })
    }

    fn checkout_script_url(&self, mode: GatewayMode) -> String {
        if mode.is_sandbox() {
            "https://app.sandbox.midtrans.com/snap/snap.js".to_string()
        } else {
            "https://app.midtrans.com/snap/snap.js".to_string()
        }
    }
}

pub struct TestApp {
    pub router: Router,
    pub notifier: Arc<RecordingNotifier>,
    pub gateway: Arc<StubGateway>,
}

impl TestApp {
    pub fn new() -> Self {
        let notifier = Arc::new(RecordingNotifier::default());
        let gateway = Arc::new(StubGateway::default());
        let state = AppState {
            invoices: Arc::new(InMemoryInvoiceRepository::new()),
            credentials: Arc::new(InMemoryCredentialStore::new()),
            gateway: gateway.clone(),
            notifier: notifier.clone(),
            event_log: Arc::new(InMemoryPaymentEventLog::new()),
            settings: HttpSettings {
                cron_secret: SecretString::new(CRON_SECRET.to_string()),
                reminder_days_ahead: 10,
                notification_timeout: Duration::from_secs(2),
            },
        };
        Self {
            router: app_router(state, Duration::from_secs(10)),
            notifier,
            gateway,
        }
    }

    /// Sends a request, as `owner` when given, and returns status and JSON body.
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        owner: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(owner) = owner {
            builder = builder.header(OWNER_HEADER, owner);
        }
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_vec(&body).unwrap()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        self.dispatch(request).await
    }

    pub async fn post_raw(&self, uri: &str, body: Vec<u8>) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body))
            .unwrap();
        self.dispatch(request).await
    }

    async fn dispatch(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, value)
    }

    /// Creates an invoice for OWNER and returns its JSON.
    pub async fn create_invoice(&self, number: &str, status: &str, due_date: &str) -> Value {
        let (code, body) = self
            .send(
                Method::POST,
                "/api/invoices",
                Some(OWNER),
                Some(invoice_body(number, status, due_date)),
            )
            .await;
        assert_eq!(code, StatusCode::CREATED, "create failed: {}", body);
        body
    }

    pub async fn save_gateway_keys(&self) {
        let (code, body) = self
            .send(
                Method::PUT,
                "/api/settings/gateway",
                Some(OWNER),
                Some(json!({"client_key": "SB-Mid-client-xyz", "server_key": SERVER_KEY})),
            )
            .await;
        assert_eq!(code, StatusCode::OK, "saving keys failed: {}", body);
    }
}

/// Two items at 50,000 plus 11% tax: total 111,000.
pub fn invoice_body(number: &str, status: &str, due_date: &str) -> Value {
    json!({
        "invoice_number": number,
        "customer": {"name": "Budi Santoso", "email": "budi@example.com"},
        "issue_date": "2024-03-01",
        "due_date": due_date,
        "tax_rate": 11,
        "items": [
            {"description": "Logo design", "quantity": 1, "unit_price": 50000},
            {"description": "Business cards", "quantity": 1, "unit_price": 50000}
        ],
        "status": status
    })
}
