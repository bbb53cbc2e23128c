//! CreatePaymentTokenHandler - starts a hosted checkout for an invoice.

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::foundation::{InvoiceId, OwnedByUser, UserId};
use crate::domain::invoice::{GatewayMode, InvoiceError, InvoiceStatus};
use crate::domain::payment::OrderId;
use crate::ports::{
    GatewayCredentialStore, GatewayError, InvoiceRepository, PaymentGateway, TransactionRequest,
};

#[derive(Debug, Clone)]
pub struct CreatePaymentTokenCommand {
    pub invoice_id: InvoiceId,
    pub owner_id: UserId,
}

/// What the browser needs to open the gateway's checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentTokenResult {
    pub token: String,
    pub client_key: String,
    pub mode: GatewayMode,
    pub checkout_script_url: String,
    pub order_id: OrderId,
}

/// Handler for issuing gateway checkout tokens.
///
/// Uses the invoice owner's own gateway keys; the gateway adapter is shared
/// and holds none.
pub struct CreatePaymentTokenHandler {
    invoices: Arc<dyn InvoiceRepository>,
    credentials: Arc<dyn GatewayCredentialStore>,
    gateway: Arc<dyn PaymentGateway>,
}

impl CreatePaymentTokenHandler {
    pub fn new(
        invoices: Arc<dyn InvoiceRepository>,
        credentials: Arc<dyn GatewayCredentialStore>,
        gateway: Arc<dyn PaymentGateway>,
    ) -> Self {
        Self {
            invoices,
            credentials,
            gateway,
        }
    }

    #[tracing::instrument(skip(self, cmd), fields(invoice_id = %cmd.invoice_id))]
    pub async fn handle(
        &self,
        cmd: CreatePaymentTokenCommand,
    ) -> Result<PaymentTokenResult, InvoiceError> {
        let invoice = self
            .invoices
            .find_by_id(cmd.invoice_id)
            .await?
            .ok_or(InvoiceError::NotFound(cmd.invoice_id))?;
        invoice.check_ownership(&cmd.owner_id)?;

        if matches!(invoice.status(), InvoiceStatus::Paid | InvoiceStatus::Void) {
            return Err(InvoiceError::invalid_state(invoice.status(), "start a payment for"));
        }

        let credentials = self
            .credentials
            .find_by_owner(&cmd.owner_id)
            .await?
            .filter(|c| c.is_complete())
            .ok_or(InvoiceError::GatewayNotConfigured)?;
        let mode = credentials.mode();

        let request = TransactionRequest {
            order_id: OrderId::for_invoice(invoice.invoice_number(), invoice.id()),
            gross_amount: invoice.total_amount(),
            customer_name: invoice.customer().name.clone(),
            customer_email: invoice.customer().email.clone(),
        };

        let token = self
            .gateway
            .create_transaction_token(&credentials, &request)
            .await
            .map_err(|e| {
                warn!(error = %e, sandbox = mode.is_sandbox(), "Payment token request failed");
                match e {
                    GatewayError::Unauthorized { mode } => InvoiceError::GatewayAuth {
                        hint: GatewayError::auth_hint(mode).to_string(),
                    },
                    other => InvoiceError::Gateway(other.to_string()),
                }
            })?;

        info!(
            order_id = %request.order_id,
            sandbox = mode.is_sandbox(),
            "Payment token issued"
        );

        Ok(PaymentTokenResult {
            token: token.token,
            client_key: credentials.client_key().to_string(),
            mode,
            checkout_script_url: self.gateway.checkout_script_url(mode),
            order_id: request.order_id,
        })
    }
}
