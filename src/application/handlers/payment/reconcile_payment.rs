//! ReconcilePaymentHandler - applies gateway payment notifications to invoices.
//!
//! Deliveries are at-least-once and may arrive out of order, so the handler
//! only moves an invoice through a compare-and-set write and only sends the
//! payment-received email when its own write landed on Paid.
//!
//! Trust failures are errors (mapped to 4xx); lifecycle refusals and
//! notification failures still acknowledge the delivery.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::{error, info, warn};

use crate::domain::invoice::{Invoice, InvoiceStatus, TransitionAuthority, TransitionOutcome};
use crate::domain::payment::{PaymentNotification, VerifiedPaymentEvent, WebhookError};
use crate::ports::{
    InvoiceRepository, NotificationSender, PaymentEventLog, PaymentEventOutcome,
    PaymentEventRecord, PaymentReceivedNotice,
};

use super::PaymentNotificationVerifier;

/// Command carrying the raw notification body.
#[derive(Debug, Clone)]
pub struct ReconcilePaymentCommand {
    pub payload: Vec<u8>,
}

/// How an accepted notification was handled. Every variant is acknowledged
/// to the gateway with a success response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// Status moved by this delivery.
    Applied {
        from: InvoiceStatus,
        to: InvoiceStatus,
        /// Whether the payment-received email went out.
        notified: bool,
    },
    /// Already in the target status, or a concurrent delivery got there first.
    Unchanged,
    /// Gateway status with no lifecycle meaning.
    Ignored { transaction_status: String },
    /// The lifecycle table refused the transition.
    Rejected {
        current: InvoiceStatus,
        target: InvoiceStatus,
    },
}

pub struct ReconcilePaymentHandler {
    verifier: PaymentNotificationVerifier,
    invoices: Arc<dyn InvoiceRepository>,
    notifier: Arc<dyn NotificationSender>,
    event_log: Arc<dyn PaymentEventLog>,
    notification_timeout: Duration,
}

impl ReconcilePaymentHandler {
    pub fn new(
        verifier: PaymentNotificationVerifier,
        invoices: Arc<dyn InvoiceRepository>,
        notifier: Arc<dyn NotificationSender>,
        event_log: Arc<dyn PaymentEventLog>,
        notification_timeout: Duration,
    ) -> Self {
        Self {
            verifier,
            invoices,
            notifier,
            event_log,
            notification_timeout,
        }
    }

    #[tracing::instrument(skip_all)]
    pub async fn handle(
        &self,
        cmd: ReconcilePaymentCommand,
    ) -> Result<ReconcileOutcome, WebhookError> {
        let notification = PaymentNotification::parse(&cmd.payload)?;

        let verified = match self.verifier.verify(notification.clone()).await {
            Ok(verified) => verified,
            Err(err) => {
                self.audit(&notification, None, PaymentEventOutcome::Rejected, Some(err.to_string()))
                    .await;
                return Err(err);
            }
        };

        let event = verified.event;
        let result = self.apply(&event, verified.invoice).await;

        let (outcome, detail) = match &result {
            Ok(ReconcileOutcome::Applied { .. }) => (PaymentEventOutcome::Applied, None),
            Ok(ReconcileOutcome::Unchanged) => (PaymentEventOutcome::Unchanged, None),
            Ok(ReconcileOutcome::Ignored { transaction_status }) => (
                PaymentEventOutcome::Ignored,
                Some(format!("no mapping for '{}'", transaction_status)),
            ),
            Ok(ReconcileOutcome::Rejected { current, target }) => (
                PaymentEventOutcome::Rejected,
                Some(format!("{} cannot move to {}", current, target)),
            ),
            Err(err @ WebhookError::AmountMismatch { .. }) => {
                (PaymentEventOutcome::Rejected, Some(err.to_string()))
            }
            Err(err) => (PaymentEventOutcome::Failed, Some(err.to_string())),
        };
        self.audit(&notification, Some(&event), outcome, detail).await;

        result
    }

    async fn apply(
        &self,
        event: &VerifiedPaymentEvent,
        mut invoice: Invoice,
    ) -> Result<ReconcileOutcome, WebhookError> {
        let Some(target) = event.target() else {
            info!(
                invoice_id = %invoice.id(),
                transaction_status = event.transaction_status(),
                "Payment notification has no lifecycle mapping"
            );
            return Ok(ReconcileOutcome::Ignored {
                transaction_status: event.transaction_status().to_string(),
            });
        };

        let current = invoice.status();
        let outcome = match invoice.transition(target, TransitionAuthority::Gateway(event)) {
            Ok(outcome) => outcome,
            Err(err) => {
                warn!(
                    invoice_id = %invoice.id(),
                    current = %current,
                    target = %target,
                    error = %err,
                    "Payment notification transition refused"
                );
                return Ok(ReconcileOutcome::Rejected { current, target });
            }
        };

        let TransitionOutcome::Moved { from, to } = outcome else {
            return Ok(ReconcileOutcome::Unchanged);
        };

        let landed = self
            .invoices
            .save_status(&invoice, from)
            .await
            .map_err(|e| WebhookError::Database(e.to_string()))?;
        if !landed {
            return self.after_lost_write(event, &invoice).await;
        }

        info!(invoice_id = %invoice.id(), from = %from, to = %to, "Invoice status reconciled");

        let notified = to == InvoiceStatus::Paid && self.notify_paid(&invoice).await;
        Ok(ReconcileOutcome::Applied { from, to, notified })
    }

    /// Explains a compare-and-set miss. An owner edit that changed the total
    /// between verification and write invalidates the payment amount; any
    /// other miss is a concurrent delivery and counts as a duplicate.
    async fn after_lost_write(
        &self,
        event: &VerifiedPaymentEvent,
        invoice: &Invoice,
    ) -> Result<ReconcileOutcome, WebhookError> {
        let stored = self
            .invoices
            .find_by_id(invoice.id())
            .await
            .map_err(|e| WebhookError::Database(e.to_string()))?;

        if let Some(stored) = stored {
            if stored.total_amount() != event.gross_amount() {
                warn!(
                    invoice_id = %invoice.id(),
                    expected = stored.total_amount(),
                    received = event.gross_amount(),
                    "Invoice total changed before payment was applied"
                );
                return Err(WebhookError::AmountMismatch {
                    expected: stored.total_amount(),
                    received: event.gross_amount(),
                });
            }
        }

        info!(
            invoice_id = %invoice.id(),
            "Invoice changed concurrently, notification treated as duplicate"
        );
        Ok(ReconcileOutcome::Unchanged)
    }

    /// Sends the payment-received email. Failures are logged, never returned.
    async fn notify_paid(&self, invoice: &Invoice) -> bool {
        let notice = PaymentReceivedNotice {
            to: invoice.customer().email.clone(),
            customer_name: invoice.customer().name.clone(),
            invoice_number: invoice.invoice_number().to_string(),
            amount: invoice.total_amount(),
            payment_date: invoice
                .paid_at()
                .map(|t| t.date())
                .unwrap_or_else(|| Utc::now().date_naive()),
        };

        match tokio::time::timeout(
            self.notification_timeout,
            self.notifier.send_payment_received(&notice),
        )
        .await
        {
            Ok(Ok(())) => true,
            Ok(Err(err)) => {
                warn!(invoice_id = %invoice.id(), error = %err, "Payment received email failed");
                false
            }
            Err(_) => {
                warn!(
                    invoice_id = %invoice.id(),
                    timeout_secs = self.notification_timeout.as_secs(),
                    "Payment received email timed out"
                );
                false
            }
        }
    }

    async fn audit(
        &self,
        notification: &PaymentNotification,
        event: Option<&VerifiedPaymentEvent>,
        outcome: PaymentEventOutcome,
        detail: Option<String>,
    ) {
        let record = PaymentEventRecord {
            order_id: notification.order_id.clone(),
            invoice_id: event
                .map(|e| e.invoice_id())
                .or_else(|| notification.order_id().invoice_id()),
            transaction_status: notification.transaction_status.clone(),
            fraud_status: notification.fraud_status.clone(),
            gross_amount: notification.gross_amount.clone(),
            transaction_id: notification.transaction_id.clone(),
            outcome,
            detail,
            received_at: Utc::now(),
        };
        if let Err(err) = self.event_log.record(&record).await {
            error!(order_id = %record.order_id, error = %err, "Failed to record payment event");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{
        InMemoryCredentialStore, InMemoryInvoiceRepository, InMemoryPaymentEventLog,
    };
    use crate::application::handlers::test_fixtures::{
        draft, invoice_with_status, owner, signed_notification, SERVER_KEY,
    };
    use crate::domain::foundation::{CustomerId, DomainError, InvoiceId, UserId};
    use crate::domain::invoice::{CustomerContact, GatewayCredentials};
    use chrono::NaiveDate;
    use crate::domain::payment::PaymentNotification;
    use crate::ports::{DueReminderNotice, GatewayCredentialStore, NotificationError};
    use async_trait::async_trait;
    use std::sync::Mutex;

    // ════════════════════════════════════════════════════════════════════════════
    // Mock Implementation
    // ════════════════════════════════════════════════════════════════════════════

    #[derive(Default)]
    struct MockNotifier {
        sent: Mutex<Vec<PaymentReceivedNotice>>,
        fail: bool,
        delay: Option<Duration>,
    }

    impl MockNotifier {
        fn failing() -> Self {
            Self {
                fail: true,
                ..Default::default()
            }
        }

        fn slow(delay: Duration) -> Self {
            Self {
                delay: Some(delay),
                ..Default::default()
            }
        }

        fn sent(&self) -> Vec<PaymentReceivedNotice> {
            self.sent.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl NotificationSender for MockNotifier {
        async fn send_payment_received(
            &self,
            notice: &PaymentReceivedNotice,
        ) -> Result<(), NotificationError> {
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            if self.fail {
                return Err(NotificationError::Network("smtp down".into()));
            }
            self.sent.lock().unwrap().push(notice.clone());
            Ok(())
        }

        async fn send_due_reminder(&self, _notice: &DueReminderNotice) -> Result<(), NotificationError> {
            Ok(())
        }
    }

    struct Setup {
        handler: ReconcilePaymentHandler,
        invoices: Arc<InMemoryInvoiceRepository>,
        notifier: Arc<MockNotifier>,
        log: Arc<InMemoryPaymentEventLog>,
        invoice: Invoice,
    }

    async fn setup(status: InvoiceStatus, notifier: MockNotifier) -> Setup {
        let invoices = Arc::new(InMemoryInvoiceRepository::new());
        let credentials = Arc::new(InMemoryCredentialStore::new());
        let notifier = Arc::new(notifier);
        let log = Arc::new(InMemoryPaymentEventLog::new());

        let invoice = invoice_with_status(status);
        invoices.save(&invoice).await.unwrap();
        credentials
            .save(&GatewayCredentials::new(owner(), "SB-client", SERVER_KEY))
            .await
            .unwrap();

        let verifier = PaymentNotificationVerifier::new(invoices.clone(), credentials);
        let handler = ReconcilePaymentHandler::new(
            verifier,
            invoices.clone(),
            notifier.clone(),
            log.clone(),
            Duration::from_millis(50),
        );

        Setup {
            handler,
            invoices,
            notifier,
            log,
            invoice,
        }
    }

    fn cmd(notification: &PaymentNotification) -> ReconcilePaymentCommand {
        let body = serde_json::json!({
            "order_id": notification.order_id,
            "status_code": notification.status_code,
            "gross_amount": notification.gross_amount,
            "signature_key": notification.signature_key,
            "transaction_status": notification.transaction_status,
            "fraud_status": notification.fraud_status,
            "transaction_id": notification.transaction_id,
        });
        ReconcilePaymentCommand {
            payload: serde_json::to_vec(&body).unwrap(),
        }
    }

    async fn stored_status(s: &Setup) -> InvoiceStatus {
        s.invoices
            .find_by_id(s.invoice.id())
            .await
            .unwrap()
            .unwrap()
            .status()
    }

    #[tokio::test]
    async fn settlement_marks_pending_invoice_paid_and_notifies_once() {
        let s = setup(InvoiceStatus::Pending, MockNotifier::default()).await;
        let n = signed_notification(&s.invoice, "settlement", "110000.00");

        let outcome = s.handler.handle(cmd(&n)).await.unwrap();

        assert_eq!(
            outcome,
            ReconcileOutcome::Applied {
                from: InvoiceStatus::Pending,
                to: InvoiceStatus::Paid,
                notified: true
            }
        );
        assert_eq!(stored_status(&s).await, InvoiceStatus::Paid);

        let sent = s.notifier.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "budi@example.com");
        assert_eq!(sent[0].invoice_number, "INV-2024-001");
        assert_eq!(sent[0].amount, 110_000);
    }

    #[tokio::test]
    async fn redelivery_is_idempotent() {
        let s = setup(InvoiceStatus::Pending, MockNotifier::default()).await;
        let n = signed_notification(&s.invoice, "settlement", "110000.00");

        s.handler.handle(cmd(&n)).await.unwrap();
        let second = s.handler.handle(cmd(&n)).await.unwrap();

        assert_eq!(second, ReconcileOutcome::Unchanged);
        assert_eq!(stored_status(&s).await, InvoiceStatus::Paid);
        assert_eq!(s.notifier.sent().len(), 1);
    }

    #[tokio::test]
    async fn concurrent_deliveries_notify_once() {
        let s = setup(InvoiceStatus::Pending, MockNotifier::default()).await;
        let n = signed_notification(&s.invoice, "settlement", "110000.00");

        let (a, b) = tokio::join!(s.handler.handle(cmd(&n)), s.handler.handle(cmd(&n)));
        a.unwrap();
        b.unwrap();

        assert_eq!(stored_status(&s).await, InvoiceStatus::Paid);
        assert_eq!(s.notifier.sent().len(), 1);
    }

    #[tokio::test]
    async fn cancel_after_paid_is_refused_but_acknowledged() {
        let s = setup(InvoiceStatus::Paid, MockNotifier::default()).await;
        let n = signed_notification(&s.invoice, "cancel", "110000.00");

        let outcome = s.handler.handle(cmd(&n)).await.unwrap();

        assert_eq!(
            outcome,
            ReconcileOutcome::Rejected {
                current: InvoiceStatus::Paid,
                target: InvoiceStatus::Void
            }
        );
        assert_eq!(stored_status(&s).await, InvoiceStatus::Paid);
        assert!(s.notifier.sent().is_empty());
    }

    #[tokio::test]
    async fn settlement_cannot_revive_void_invoice() {
        let s = setup(InvoiceStatus::Void, MockNotifier::default()).await;
        let n = signed_notification(&s.invoice, "settlement", "110000.00");

        let outcome = s.handler.handle(cmd(&n)).await.unwrap();
        assert!(matches!(outcome, ReconcileOutcome::Rejected { .. }));
        assert_eq!(stored_status(&s).await, InvoiceStatus::Void);
    }

    #[tokio::test]
    async fn overdue_invoice_can_still_be_paid() {
        let s = setup(InvoiceStatus::Overdue, MockNotifier::default()).await;
        let n = signed_notification(&s.invoice, "settlement", "110000.00");

        s.handler.handle(cmd(&n)).await.unwrap();
        assert_eq!(stored_status(&s).await, InvoiceStatus::Paid);
        assert_eq!(s.notifier.sent().len(), 1);
    }

    #[tokio::test]
    async fn expire_voids_pending_invoice_without_email() {
        let s = setup(InvoiceStatus::Pending, MockNotifier::default()).await;
        let n = signed_notification(&s.invoice, "expire", "110000.00");

        let outcome = s.handler.handle(cmd(&n)).await.unwrap();
        assert!(matches!(outcome, ReconcileOutcome::Applied { to: InvoiceStatus::Void, notified: false, .. }));
        assert!(s.notifier.sent().is_empty());
    }

    #[tokio::test]
    async fn unmapped_status_is_ignored() {
        let s = setup(InvoiceStatus::Pending, MockNotifier::default()).await;
        let n = signed_notification(&s.invoice, "refund", "110000.00");

        let outcome = s.handler.handle(cmd(&n)).await.unwrap();
        assert!(matches!(outcome, ReconcileOutcome::Ignored { .. }));
        assert_eq!(stored_status(&s).await, InvoiceStatus::Pending);
    }

    #[tokio::test]
    async fn tampered_amount_is_rejected_and_audited() {
        let s = setup(InvoiceStatus::Pending, MockNotifier::default()).await;
        let mut n = signed_notification(&s.invoice, "settlement", "110000.00");
        n.gross_amount = "999999".to_string();

        let err = s.handler.handle(cmd(&n)).await.unwrap_err();

        assert!(matches!(err, WebhookError::InvalidSignature));
        assert_eq!(stored_status(&s).await, InvoiceStatus::Pending);
        assert!(s.notifier.sent().is_empty());

        let records = s.log.records().await;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].outcome, PaymentEventOutcome::Rejected);
        assert_eq!(records[0].invoice_id, Some(s.invoice.id()));
    }

    #[tokio::test]
    async fn email_failure_does_not_fail_the_delivery() {
        let s = setup(InvoiceStatus::Pending, MockNotifier::failing()).await;
        let n = signed_notification(&s.invoice, "settlement", "110000.00");

        let outcome = s.handler.handle(cmd(&n)).await.unwrap();
        assert!(matches!(outcome, ReconcileOutcome::Applied { notified: false, .. }));
        assert_eq!(stored_status(&s).await, InvoiceStatus::Paid);
    }

    #[tokio::test]
    async fn slow_email_is_abandoned_after_timeout() {
        let s = setup(InvoiceStatus::Pending, MockNotifier::slow(Duration::from_secs(5))).await;
        let n = signed_notification(&s.invoice, "settlement", "110000.00");

        let outcome = s.handler.handle(cmd(&n)).await.unwrap();
        assert!(matches!(outcome, ReconcileOutcome::Applied { notified: false, .. }));
        assert_eq!(stored_status(&s).await, InvoiceStatus::Paid);
    }

    #[tokio::test]
    async fn applied_events_are_audited() {
        let s = setup(InvoiceStatus::Pending, MockNotifier::default()).await;
        let n = signed_notification(&s.invoice, "settlement", "110000.00");
        s.handler.handle(cmd(&n)).await.unwrap();
        s.handler.handle(cmd(&n)).await.unwrap();

        let outcomes: Vec<_> = s.log.records().await.into_iter().map(|r| r.outcome).collect();
        assert_eq!(
            outcomes,
            vec![PaymentEventOutcome::Applied, PaymentEventOutcome::Unchanged]
        );
    }

    /// Revises the stored invoice to a new total just before the status
    /// write, the way an owner edit racing a delivery would.
    struct EditBeforeWrite {
        inner: InMemoryInvoiceRepository,
    }

    #[async_trait]
    impl InvoiceRepository for EditBeforeWrite {
        async fn resolve_customer(
            &self,
            owner_id: &UserId,
            contact: &CustomerContact,
        ) -> Result<CustomerId, DomainError> {
            self.inner.resolve_customer(owner_id, contact).await
        }

        async fn save(&self, invoice: &Invoice) -> Result<(), DomainError> {
            self.inner.save(invoice).await
        }

        async fn update(
            &self,
            invoice: &Invoice,
            expected_status: InvoiceStatus,
        ) -> Result<(), DomainError> {
            self.inner.update(invoice, expected_status).await
        }

        async fn save_status(
            &self,
            invoice: &Invoice,
            expected_status: InvoiceStatus,
        ) -> Result<bool, DomainError> {
            let mut edited = self.inner.find_by_id(invoice.id()).await?.unwrap();
            let mut revised = draft();
            revised.items[0].quantity = 3;
            edited.revise(&owner(), revised).unwrap();
            self.inner.update(&edited, expected_status).await?;

            self.inner.save_status(invoice, expected_status).await
        }

        async fn find_by_id(&self, id: InvoiceId) -> Result<Option<Invoice>, DomainError> {
            self.inner.find_by_id(id).await
        }

        async fn delete(&self, id: InvoiceId, owner_id: &UserId) -> Result<bool, DomainError> {
            self.inner.delete(id, owner_id).await
        }

        async fn find_by_status_due_on(
            &self,
            status: InvoiceStatus,
            due_date: NaiveDate,
        ) -> Result<Vec<Invoice>, DomainError> {
            self.inner.find_by_status_due_on(status, due_date).await
        }

        async fn find_by_status_due_before(
            &self,
            status: InvoiceStatus,
            date: NaiveDate,
        ) -> Result<Vec<Invoice>, DomainError> {
            self.inner.find_by_status_due_before(status, date).await
        }
    }

    #[tokio::test]
    async fn total_edited_during_delivery_is_reported_as_mismatch() {
        let repo = Arc::new(EditBeforeWrite {
            inner: InMemoryInvoiceRepository::new(),
        });
        let credentials = Arc::new(InMemoryCredentialStore::new());
        let notifier = Arc::new(MockNotifier::default());
        let log = Arc::new(InMemoryPaymentEventLog::new());

        let invoice = invoice_with_status(InvoiceStatus::Pending);
        repo.save(&invoice).await.unwrap();
        credentials
            .save(&GatewayCredentials::new(owner(), "SB-client", SERVER_KEY))
            .await
            .unwrap();

        let handler = ReconcilePaymentHandler::new(
            PaymentNotificationVerifier::new(repo.clone(), credentials),
            repo.clone(),
            notifier.clone(),
            log.clone(),
            Duration::from_millis(50),
        );
        let n = signed_notification(&invoice, "settlement", "110000.00");

        let err = handler.handle(cmd(&n)).await.unwrap_err();

        assert!(matches!(
            err,
            WebhookError::AmountMismatch {
                expected: 165_000,
                received: 110_000
            }
        ));
        let stored = repo.find_by_id(invoice.id()).await.unwrap().unwrap();
        assert_eq!(stored.status(), InvoiceStatus::Pending);
        assert_eq!(stored.total_amount(), 165_000);
        assert!(notifier.sent().is_empty());

        let records = log.records().await;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].outcome, PaymentEventOutcome::Rejected);
    }

    #[tokio::test]
    async fn malformed_body_is_rejected_before_lookup() {
        let s = setup(InvoiceStatus::Pending, MockNotifier::default()).await;
        let err = s
            .handler
            .handle(ReconcilePaymentCommand {
                payload: b"{\"order_id\": 42".to_vec(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, WebhookError::Malformed(_)));
        assert!(s.log.records().await.is_empty());
    }
}
