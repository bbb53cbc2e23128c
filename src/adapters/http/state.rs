//! Shared application state for every HTTP route.

use std::sync::Arc;
use std::time::Duration;

use secrecy::SecretString;

use crate::application::handlers::{
    ChangeInvoiceStatusHandler, CreateInvoiceHandler, CreatePaymentTokenHandler,
    DeleteInvoiceHandler, GetInvoiceHandler, MarkInvoiceSentHandler, MarkOverdueInvoicesHandler,
    PaymentNotificationVerifier, ReconcilePaymentHandler, SaveGatewayCredentialsHandler,
    SendDueRemindersHandler, UpdateInvoiceHandler,
};
use crate::ports::{
    GatewayCredentialStore, InvoiceRepository, NotificationSender, PaymentEventLog, PaymentGateway,
};

/// Non-port settings the routes need.
#[derive(Clone)]
pub struct HttpSettings {
    /// Shared secret for the cron endpoint. Empty disables the endpoint.
    pub cron_secret: SecretString,
    pub reminder_days_ahead: u64,
    pub notification_timeout: Duration,
}

/// Shared application state containing all dependencies.
///
/// Cloned for each request; every dependency is behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub invoices: Arc<dyn InvoiceRepository>,
    pub credentials: Arc<dyn GatewayCredentialStore>,
    pub gateway: Arc<dyn PaymentGateway>,
    pub notifier: Arc<dyn NotificationSender>,
    pub event_log: Arc<dyn PaymentEventLog>,
    pub settings: HttpSettings,
}

impl AppState {
    /// Create handlers on demand from the shared state.
    pub fn create_invoice_handler(&self) -> CreateInvoiceHandler {
        CreateInvoiceHandler::new(self.invoices.clone())
    }

    pub fn update_invoice_handler(&self) -> UpdateInvoiceHandler {
        UpdateInvoiceHandler::new(self.invoices.clone())
    }

    pub fn delete_invoice_handler(&self) -> DeleteInvoiceHandler {
        DeleteInvoiceHandler::new(self.invoices.clone())
    }

    pub fn get_invoice_handler(&self) -> GetInvoiceHandler {
        GetInvoiceHandler::new(self.invoices.clone(), self.event_log.clone())
    }

    pub fn change_status_handler(&self) -> ChangeInvoiceStatusHandler {
        ChangeInvoiceStatusHandler::new(self.invoices.clone())
    }

    pub fn mark_sent_handler(&self) -> MarkInvoiceSentHandler {
        MarkInvoiceSentHandler::new(self.invoices.clone())
    }

    pub fn payment_token_handler(&self) -> CreatePaymentTokenHandler {
        CreatePaymentTokenHandler::new(
            self.invoices.clone(),
            self.credentials.clone(),
            self.gateway.clone(),
        )
    }

    pub fn reconcile_handler(&self) -> ReconcilePaymentHandler {
        ReconcilePaymentHandler::new(
            PaymentNotificationVerifier::new(self.invoices.clone(), self.credentials.clone()),
            self.invoices.clone(),
            self.notifier.clone(),
            self.event_log.clone(),
            self.settings.notification_timeout,
        )
    }

    pub fn due_reminders_handler(&self) -> SendDueRemindersHandler {
        SendDueRemindersHandler::new(
            self.invoices.clone(),
            self.notifier.clone(),
            self.settings.reminder_days_ahead,
        )
    }

    pub fn overdue_handler(&self) -> MarkOverdueInvoicesHandler {
        MarkOverdueInvoicesHandler::new(self.invoices.clone())
    }

    pub fn save_credentials_handler(&self) -> SaveGatewayCredentialsHandler {
        SaveGatewayCredentialsHandler::new(self.credentials.clone())
    }
}
