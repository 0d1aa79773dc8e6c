use crate::domain::invoice::Invoice;
use crate::domain::ports::{MailTransport, OutgoingEmail, TransportArc};
use crate::domain::transfer::Transfer;
use crate::interfaces::email::templates;
use serde::Serialize;
use tracing::{info, warn};

/// Result of one dispatch attempt. Failures live here and are never
/// escalated into the ledger operation that triggered the send.
#[derive(Debug, Serialize, Clone)]
pub struct DispatchOutcome {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DispatchOutcome {
    fn sent(message_id: String) -> Self {
        Self {
            success: true,
            message_id: Some(message_id),
            error: None,
        }
    }

    fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            message_id: None,
            error: Some(error.into()),
        }
    }
}

/// Stateless renderer-and-sender for the three notification kinds.
///
/// Holds the transport and the operator address; everything else comes from
/// the transfer or invoice being rendered.
pub struct Dispatcher {
    transport: TransportArc,
    owner_email: Option<String>,
}

impl Dispatcher {
    pub fn new(transport: TransportArc, owner_email: Option<String>) -> Self {
        Self {
            transport,
            owner_email,
        }
    }

    async fn send(&self, to: String, subject: String, html: String) -> DispatchOutcome {
        match self
            .transport
            .send(OutgoingEmail {
                to: to.clone(),
                subject: subject.clone(),
                html,
            })
            .await
        {
            Ok(message_id) => {
                info!(%to, %subject, %message_id, "email sent");
                DispatchOutcome::sent(message_id)
            }
            Err(e) => {
                warn!(%to, %subject, error = %e, "email send failed");
                DispatchOutcome::failed(e.to_string())
            }
        }
    }

    /// Notifies the platform operator that a transfer was recorded.
    /// `to_override` lets the test endpoint target a specific address.
    pub async fn payment_initiated(
        &self,
        transfer: &Transfer,
        to_override: Option<String>,
    ) -> DispatchOutcome {
        let Some(to) = to_override.or_else(|| self.owner_email.clone()) else {
            warn!("no operator address configured, skipping initiated notification");
            return DispatchOutcome::failed("OWNER_EMAIL is not configured");
        };
        let subject = format!(
            "⚡ Transfer Initiated: {} to {}",
            templates::format_amount(transfer.amount, &transfer.currency),
            transfer.recipient_name,
        );
        self.send(to, subject, templates::payment_initiated(transfer))
            .await
    }

    /// Notifies the transfer's recipient that funds are en route.
    pub async fn payment_received(
        &self,
        transfer: &Transfer,
        to_override: Option<String>,
    ) -> DispatchOutcome {
        let to = to_override.unwrap_or_else(|| transfer.recipient_email.clone());
        if to.is_empty() {
            warn!(transfer = %transfer.id, "no recipient email on transfer");
            return DispatchOutcome::failed("No recipient email on transfer");
        }
        let subject = format!(
            "💸 Payment Received: {}",
            templates::format_amount(transfer.amount, &transfer.currency),
        );
        self.send(to, subject, templates::payment_received(transfer))
            .await
    }

    /// Sends an itemised invoice.
    pub async fn invoice(&self, to: String, invoice: &Invoice) -> DispatchOutcome {
        let subject = format!(
            "📄 Invoice #{}: {}",
            invoice.number(),
            templates::format_amount(invoice.total(), &invoice.currency),
        );
        self.send(to, subject, templates::invoice(invoice)).await
    }
}
