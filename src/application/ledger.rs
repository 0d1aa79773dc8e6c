use crate::application::dispatcher::{DispatchOutcome, Dispatcher};
use crate::config::Config;
use crate::domain::invoice::{Invoice, InvoiceInput, Party};
use crate::domain::ports::{COLLECTION_RECIPIENTS, COLLECTION_TRANSFERS, PayoutStore, StoreBox};
use crate::domain::recipient::{NewRecipient, Recipient, unix_now};
use crate::domain::transfer::{NewTransfer, Transfer, to_minor_units};
use crate::error::{PayoutError, Result};
use rust_decimal::Decimal;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use tracing::warn;

/// The recipient/transfer ledger.
///
/// Owns both collections exclusively and persists them through whichever
/// storage backend was selected at startup; read/write semantics are
/// identical across backends (full-collection replace). A failed read
/// degrades to an empty collection rather than failing the operation; a
/// failed write surfaces to the caller.
///
/// Concurrency note: the full-collection read-modify-write pattern is not
/// protected against lost updates. Two concurrent transfers to the same
/// recipient can race on `total_paid` (last writer wins), and two concurrent
/// recipient creations with the same email can both pass the uniqueness
/// scan. Document-level, not field-level, consistency is the contract.
pub struct Ledger {
    store: StoreBox,
    dispatcher: Arc<Dispatcher>,
    platform_name: String,
    platform_email: Option<String>,
}

impl Ledger {
    pub fn new(store: StoreBox, dispatcher: Arc<Dispatcher>, config: &Config) -> Self {
        Self {
            store,
            dispatcher,
            platform_name: config.platform_name.clone(),
            platform_email: config.owner_email.clone(),
        }
    }

    async fn read_collection<T: DeserializeOwned>(&self, collection: &str) -> Vec<T> {
        let documents = match self.store.read(collection).await {
            Ok(documents) => documents,
            Err(e) => {
                warn!(collection, error = %e, "storage read failed, treating collection as empty");
                return Vec::new();
            }
        };
        match serde_json::from_value(Value::Array(documents)) {
            Ok(items) => items,
            Err(e) => {
                warn!(collection, error = %e, "stored documents failed to decode, treating collection as empty");
                Vec::new()
            }
        }
    }

    async fn write_collection<T: Serialize>(&self, collection: &str, items: &[T]) -> Result<()> {
        let documents = items
            .iter()
            .map(serde_json::to_value)
            .collect::<std::result::Result<Vec<_>, _>>()?;
        self.store.write(collection, documents).await
    }

    /// Registers a payee. Fails with `Validation` on a missing name/email/
    /// country and with `Conflict` when another recipient already uses the
    /// email (case-sensitive exact match, full scan).
    pub async fn create_recipient(&self, input: NewRecipient) -> Result<Recipient> {
        let recipient = Recipient::create(input)?;

        let mut recipients: Vec<Recipient> = self.read_collection(COLLECTION_RECIPIENTS).await;
        if recipients.iter().any(|r| r.email == recipient.email) {
            return Err(PayoutError::Conflict(
                "A recipient with this email already exists".into(),
            ));
        }

        recipients.push(recipient.clone());
        self.write_collection(COLLECTION_RECIPIENTS, &recipients)
            .await?;
        Ok(recipient)
    }

    /// All recipients in insertion order.
    pub async fn list_recipients(&self) -> Result<Vec<Recipient>> {
        Ok(self.read_collection(COLLECTION_RECIPIENTS).await)
    }

    /// Removes a recipient. Idempotent: deleting an unknown id leaves the
    /// collection unchanged. Past transfers keep their snapshot fields.
    pub async fn delete_recipient(&self, id: &str) -> Result<()> {
        let mut recipients: Vec<Recipient> = self.read_collection(COLLECTION_RECIPIENTS).await;
        recipients.retain(|r| r.id != id);
        self.write_collection(COLLECTION_RECIPIENTS, &recipients)
            .await
    }

    /// Records a payout and fires the two transfer notifications.
    ///
    /// The transfer append and the recipient `total_paid` update are two
    /// separate full-collection writes; a crash between them leaves the
    /// total unincremented while the transfer exists. Notifications are
    /// dispatched on a detached task after both writes, so the returned
    /// transfer does not wait on mail-transport latency.
    pub async fn create_transfer(&self, input: NewTransfer) -> Result<Transfer> {
        let recipient_id = input
            .recipient_id
            .as_deref()
            .filter(|id| !id.is_empty())
            .ok_or_else(|| PayoutError::Validation("recipient_id is required".into()))?
            .to_string();
        let amount_minor = to_minor_units(
            input
                .amount
                .ok_or_else(|| PayoutError::Validation("Invalid amount".into()))?,
        )?;

        let mut recipients: Vec<Recipient> = self.read_collection(COLLECTION_RECIPIENTS).await;
        let recipient = recipients
            .iter()
            .find(|r| r.id == recipient_id)
            .ok_or_else(|| PayoutError::NotFound("Recipient not found".into()))?
            .clone();

        let transfer = Transfer::create(&input, amount_minor, &recipient, &self.platform_name);

        let mut transfers: Vec<Transfer> = self.read_collection(COLLECTION_TRANSFERS).await;
        transfers.push(transfer.clone());
        self.write_collection(COLLECTION_TRANSFERS, &transfers)
            .await?;

        if let Some(r) = recipients.iter_mut().find(|r| r.id == recipient_id) {
            r.total_paid += amount_minor;
            self.write_collection(COLLECTION_RECIPIENTS, &recipients)
                .await?;
        }

        let dispatcher = Arc::clone(&self.dispatcher);
        let dispatched = transfer.clone();
        tokio::spawn(async move {
            dispatcher.payment_initiated(&dispatched, None).await;
            dispatcher.payment_received(&dispatched, None).await;
        });

        Ok(transfer)
    }

    /// All transfers, most recent first.
    pub async fn list_transfers(&self) -> Result<Vec<Transfer>> {
        let mut transfers: Vec<Transfer> = self.read_collection(COLLECTION_TRANSFERS).await;
        transfers.reverse();
        Ok(transfers)
    }

    /// Confirms the money actually left: pending -> paid, with a timestamp
    /// and an optional operator note. Re-applying on a paid transfer is not
    /// an error; it re-applies the same terminal state.
    pub async fn mark_transfer_paid(&self, id: &str, note: Option<String>) -> Result<Transfer> {
        let mut transfers: Vec<Transfer> = self.read_collection(COLLECTION_TRANSFERS).await;
        let transfer = transfers
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| PayoutError::NotFound("Transfer not found".into()))?;

        transfer.mark_paid(note);
        let updated = transfer.clone();
        self.write_collection(COLLECTION_TRANSFERS, &transfers)
            .await?;
        Ok(updated)
    }

    /// Renders and sends an invoice email. Independent of transfer creation;
    /// a referenced transfer id fills in billee defaults when it resolves.
    /// The send is awaited and its outcome returned, it is not fire-and-
    /// forget like the transfer notifications.
    pub async fn send_invoice(&self, input: InvoiceInput) -> Result<DispatchOutcome> {
        let to = input
            .to
            .clone()
            .filter(|t| !t.is_empty())
            .ok_or_else(|| PayoutError::Validation("to is required".into()))?;
        if input.items.is_empty() {
            return Err(PayoutError::Validation("items array is required".into()));
        }

        let referenced = match input.transfer_id.as_deref() {
            Some(id) => {
                let transfers: Vec<Transfer> = self.read_collection(COLLECTION_TRANSFERS).await;
                transfers.into_iter().find(|t| t.id == id)
            }
            None => None,
        };

        let invoice = Invoice {
            invoice_number: input.invoice_number,
            transfer_id: input.transfer_id,
            issued_date: unix_now(),
            due_date: input.due_date,
            sender: input.sender.unwrap_or_else(|| Party {
                name: Some(self.platform_name.clone()),
                email: self.platform_email.clone(),
                ..Default::default()
            }),
            recipient: input.recipient.unwrap_or_else(|| Party {
                name: referenced.as_ref().map(|t| t.recipient_name.clone()),
                email: referenced.as_ref().map(|t| t.recipient_email.clone()),
                ..Default::default()
            }),
            items: input.items,
            currency: input.currency.unwrap_or_else(|| "usd".into()),
            tax_rate: input.tax_rate.unwrap_or(Decimal::ZERO),
            notes: input.notes,
        };

        Ok(self.dispatcher.invoice(to, &invoice).await)
    }

    /// Sends one of the three message kinds with canned demo data, for
    /// verifying the mail transport end to end.
    pub async fn send_test_message(&self, kind: &str, to: &str) -> Result<DispatchOutcome> {
        if to.is_empty() {
            return Err(PayoutError::Validation("to is required".into()));
        }
        let demo = demo_transfer(&self.platform_name, to);
        match kind {
            "initiated" => Ok(self
                .dispatcher
                .payment_initiated(&demo, Some(to.to_string()))
                .await),
            "received" => Ok(self.dispatcher.payment_received(&demo, None).await),
            "invoice" => {
                let invoice = demo_invoice(&self.platform_name, self.platform_email.clone(), to);
                Ok(self.dispatcher.invoice(to.to_string(), &invoice).await)
            }
            other => Err(PayoutError::Validation(format!(
                "unknown message kind: {other}"
            ))),
        }
    }
}

fn demo_transfer(platform_name: &str, to: &str) -> Transfer {
    use crate::domain::transfer::TransferStatus;
    let created = unix_now();
    Transfer {
        id: "tr_demo_001".into(),
        amount: 250_000,
        currency: "usd".into(),
        destination: "recip_demo_001".into(),
        recipient_name: "Test Recipient".into(),
        recipient_email: to.to_string(),
        bank_name: "Test Bank".into(),
        last4: "4242".into(),
        country: "GB".into(),
        iban: Some("GB29NWBK60161331926819".into()),
        account_number: None,
        routing_number: None,
        sort_code: None,
        swift: None,
        description: "Invoice #1042, Web Development".into(),
        status: TransferStatus::Pending,
        created,
        arrival_date: created + 86_400 * 5,
        paid_at: None,
        paid_note: None,
        sender_name: platform_name.to_string(),
    }
}

fn demo_invoice(platform_name: &str, platform_email: Option<String>, to: &str) -> Invoice {
    use crate::domain::invoice::LineItem;
    use rust_decimal_macros::dec;
    Invoice {
        invoice_number: None,
        transfer_id: Some("tr_demo_001".into()),
        issued_date: unix_now(),
        due_date: None,
        sender: Party {
            name: Some(platform_name.to_string()),
            email: platform_email,
            address: Some("Dubai, UAE".into()),
            tax_id: Some("TRN-123456".into()),
        },
        recipient: Party {
            name: Some("Test Recipient".into()),
            email: Some(to.to_string()),
            address: Some("London, UK".into()),
            tax_id: None,
        },
        items: vec![
            LineItem {
                description: "Web Development Services".into(),
                quantity: 1,
                unit_price: 200_000,
            },
            LineItem {
                description: "UI/UX Design".into(),
                quantity: 2,
                unit_price: 75_000,
            },
        ],
        currency: "usd".into(),
        tax_rate: dec!(5),
        notes: Some("Payment due within 30 days.".into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{MailTransport, OutgoingEmail, PayoutStore};
    use crate::infrastructure::in_memory::InMemoryStore;
    use async_trait::async_trait;
    use rust_decimal_macros::dec;

    struct NullTransport;

    #[async_trait]
    impl MailTransport for NullTransport {
        async fn send(&self, _email: OutgoingEmail) -> Result<String> {
            Ok("msg_null".into())
        }
    }

    struct FailingStore;

    #[async_trait]
    impl PayoutStore for FailingStore {
        async fn read(&self, _collection: &str) -> Result<Vec<Value>> {
            Err(PayoutError::Storage("backend unreachable".into()))
        }
        async fn write(&self, _collection: &str, _documents: Vec<Value>) -> Result<()> {
            Err(PayoutError::Storage("backend unreachable".into()))
        }
    }

    fn test_config() -> Config {
        Config {
            kv_rest_url: None,
            kv_rest_token: None,
            data_path: None,
            platform_name: "PayGlobal Platform".into(),
            owner_email: Some("owner@example.com".into()),
            email_from: "noreply@payglobal.test".into(),
            resend_api_key: None,
            stripe_secret_key: None,
        }
    }

    fn test_ledger(store: StoreBox) -> Ledger {
        let dispatcher = Arc::new(Dispatcher::new(
            Arc::new(NullTransport),
            Some("owner@example.com".into()),
        ));
        Ledger::new(store, dispatcher, &test_config())
    }

    #[tokio::test]
    async fn test_unreadable_backend_lists_as_empty() {
        let ledger = test_ledger(Box::new(FailingStore));
        assert!(ledger.list_recipients().await.unwrap().is_empty());
        assert!(ledger.list_transfers().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_write_failure_surfaces_on_create() {
        let ledger = test_ledger(Box::new(FailingStore));
        let result = ledger
            .create_recipient(NewRecipient {
                name: Some("Ada".into()),
                email: Some("ada@example.com".into()),
                country: Some("GB".into()),
                ..Default::default()
            })
            .await;
        assert!(matches!(result, Err(PayoutError::Storage(_))));
    }

    #[tokio::test]
    async fn test_undecodable_documents_degrade_to_empty() {
        let store = InMemoryStore::new();
        store
            .write(COLLECTION_RECIPIENTS, vec![serde_json::json!({"bogus": true})])
            .await
            .unwrap();
        let ledger = test_ledger(Box::new(store));
        assert!(ledger.list_recipients().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_send_invoice_requires_items_and_address() {
        let ledger = test_ledger(Box::new(InMemoryStore::new()));

        let no_to = ledger.send_invoice(InvoiceInput::default()).await;
        assert!(matches!(no_to, Err(PayoutError::Validation(_))));

        let no_items = ledger
            .send_invoice(InvoiceInput {
                to: Some("billee@example.com".into()),
                ..Default::default()
            })
            .await;
        assert!(matches!(no_items, Err(PayoutError::Validation(_))));
    }

    #[tokio::test]
    async fn test_send_invoice_outcome() {
        use crate::domain::invoice::LineItem;
        let ledger = test_ledger(Box::new(InMemoryStore::new()));
        let outcome = ledger
            .send_invoice(InvoiceInput {
                to: Some("billee@example.com".into()),
                items: vec![LineItem {
                    description: "Consulting".into(),
                    quantity: 3,
                    unit_price: 10_000,
                }],
                tax_rate: Some(dec!(5)),
                ..Default::default()
            })
            .await
            .unwrap();
        assert!(outcome.success);
    }

    #[tokio::test]
    async fn test_send_test_message_rejects_unknown_kind() {
        let ledger = test_ledger(Box::new(InMemoryStore::new()));
        assert!(matches!(
            ledger.send_test_message("bogus", "a@b.c").await,
            Err(PayoutError::Validation(_))
        ));
        assert!(
            ledger
                .send_test_message("initiated", "a@b.c")
                .await
                .unwrap()
                .success
        );
    }
}
