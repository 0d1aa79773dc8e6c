use crate::domain::recipient::{Recipient, unix_now};
use crate::error::{PayoutError, Result};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Advisory arrival estimate: 5 days after creation.
const ARRIVAL_OFFSET_SECS: i64 = 86_400 * 5;

/// Transfer lifecycle. Pending at creation; the operator marks it paid once
/// the money has actually been sent. That is the only transition.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum TransferStatus {
    Pending,
    Paid,
}

/// A recorded payout event against a recipient. Represents intent and
/// bookkeeping, not an executed bank transaction; the actual money movement
/// happens outside the system.
///
/// The `recipient_*` and bank fields are snapshots copied at creation time
/// and never refreshed, so a transfer stays accurate even if the recipient
/// record later changes or is deleted.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Transfer {
    pub id: String,
    /// Minor currency units (e.g. cents), half-up rounded from the major
    /// unit input.
    pub amount: i64,
    /// Lowercased 3-letter code.
    pub currency: String,
    /// The recipient id this payout was recorded against.
    pub destination: String,
    pub recipient_name: String,
    pub recipient_email: String,
    pub bank_name: String,
    pub last4: String,
    pub country: String,
    pub iban: Option<String>,
    pub account_number: Option<String>,
    pub routing_number: Option<String>,
    pub sort_code: Option<String>,
    pub swift: Option<String>,
    pub description: String,
    pub status: TransferStatus,
    /// Unix seconds.
    pub created: i64,
    /// Advisory only.
    pub arrival_date: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paid_at: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paid_note: Option<String>,
    pub sender_name: String,
}

/// Input for recording a transfer. `amount` is in major units.
#[derive(Debug, Deserialize, Default, Clone)]
pub struct NewTransfer {
    pub recipient_id: Option<String>,
    pub amount: Option<Decimal>,
    pub currency: Option<String>,
    pub description: Option<String>,
}

impl Transfer {
    /// Builds a pending transfer from validated parts, snapshotting the
    /// recipient's fields at this instant.
    pub fn create(
        input: &NewTransfer,
        amount_minor: i64,
        recipient: &Recipient,
        sender_name: &str,
    ) -> Self {
        let created = unix_now();
        Self {
            id: format!("tr_{}", Uuid::new_v4().simple()),
            amount: amount_minor,
            currency: input
                .currency
                .as_deref()
                .filter(|c| !c.is_empty())
                .unwrap_or("usd")
                .to_lowercase(),
            destination: recipient.id.clone(),
            recipient_name: recipient.name.clone(),
            recipient_email: recipient.email.clone(),
            bank_name: recipient.bank_name.clone(),
            last4: recipient.last4.clone(),
            country: recipient.country.clone(),
            iban: recipient.iban.clone(),
            account_number: recipient.account_number.clone(),
            routing_number: recipient.routing_number.clone(),
            sort_code: recipient.sort_code.clone(),
            swift: recipient.swift.clone(),
            description: input
                .description
                .clone()
                .filter(|d| !d.is_empty())
                .unwrap_or_else(|| "Transfer".into()),
            status: TransferStatus::Pending,
            created,
            arrival_date: created + ARRIVAL_OFFSET_SECS,
            paid_at: None,
            paid_note: None,
            sender_name: sender_name.to_string(),
        }
    }

    /// Applies the pending -> paid transition. Re-applying on an already
    /// paid transfer is permitted and simply refreshes the timestamp/note.
    pub fn mark_paid(&mut self, note: Option<String>) {
        self.status = TransferStatus::Paid;
        self.paid_at = Some(unix_now());
        self.paid_note = Some(note.unwrap_or_default());
    }
}

/// Converts a major-unit amount to minor units via half-up rounding.
/// Rejects anything below 0.01 major units.
pub fn to_minor_units(amount: Decimal) -> Result<i64> {
    if amount < Decimal::new(1, 2) {
        return Err(PayoutError::Validation("Invalid amount".into()));
    }
    (amount * Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .ok_or_else(|| PayoutError::Validation("Invalid amount".into()))
}
