mod common;

use common::{
    RecordingTransport, in_memory_ledger, ledger_with, recipient_input, wait_for_sends,
};
use payglobal::domain::invoice::{InvoiceInput, LineItem};
use payglobal::domain::transfer::NewTransfer;
use payglobal::infrastructure::in_memory::InMemoryStore;
use rust_decimal_macros::dec;

#[tokio::test]
async fn test_create_transfer_dispatches_both_notifications() {
    let (ledger, transport) = in_memory_ledger();
    let recipient = ledger
        .create_recipient(recipient_input("Ada Lovelace", "ada@example.com", "GB"))
        .await
        .unwrap();

    ledger
        .create_transfer(NewTransfer {
            recipient_id: Some(recipient.id.clone()),
            amount: Some(dec!(25)),
            description: Some("October invoice".into()),
            ..Default::default()
        })
        .await
        .unwrap();

    let sent = wait_for_sends(&transport, 2).await;
    assert_eq!(sent.len(), 2);

    let initiated = sent
        .iter()
        .find(|e| e.subject.contains("Transfer Initiated"))
        .expect("initiated notification missing");
    assert_eq!(initiated.to, "owner@example.com");
    assert!(initiated.html.contains("Ada Lovelace"));
    assert!(initiated.html.contains("October invoice"));

    let received = sent
        .iter()
        .find(|e| e.subject.contains("Payment Received"))
        .expect("received notification missing");
    assert_eq!(received.to, "ada@example.com");
    assert!(received.subject.contains("$25.00"));
}

#[tokio::test]
async fn test_transport_failure_never_fails_the_transfer() {
    let transport = RecordingTransport::failing();
    let ledger = ledger_with(Box::new(InMemoryStore::new()), transport);

    let recipient = ledger
        .create_recipient(recipient_input("Ada", "ada@example.com", "GB"))
        .await
        .unwrap();
    let transfer = ledger
        .create_transfer(NewTransfer {
            recipient_id: Some(recipient.id.clone()),
            amount: Some(dec!(10)),
            ..Default::default()
        })
        .await;

    // The ledger write commits and the transfer is returned even though
    // every dispatch is rejected by the transport.
    assert!(transfer.is_ok());
    assert_eq!(ledger.list_transfers().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_invoice_email_carries_totals() {
    let (ledger, transport) = in_memory_ledger();

    let outcome = ledger
        .send_invoice(InvoiceInput {
            to: Some("billee@example.com".into()),
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
            tax_rate: Some(dec!(5)),
            ..Default::default()
        })
        .await
        .unwrap();
    assert!(outcome.success);

    let sent = wait_for_sends(&transport, 1).await;
    assert_eq!(sent[0].to, "billee@example.com");
    // subtotal 350000, tax 17500, total 367500
    assert!(sent[0].subject.contains("$3,675.00"));
    assert!(sent[0].html.contains("$3,500.00"));
    assert!(sent[0].html.contains("$175.00"));
}

#[tokio::test]
async fn test_invoice_failure_is_an_outcome_not_an_error() {
    let transport = RecordingTransport::failing();
    let ledger = ledger_with(Box::new(InMemoryStore::new()), transport);

    let outcome = ledger
        .send_invoice(InvoiceInput {
            to: Some("billee@example.com".into()),
            items: vec![LineItem {
                description: "Consulting".into(),
                quantity: 1,
                unit_price: 5_000,
            }],
            ..Default::default()
        })
        .await
        .unwrap();

    assert!(!outcome.success);
    assert!(
        outcome
            .error
            .as_deref()
            .unwrap()
            .contains("transport rejected")
    );
}

#[tokio::test]
async fn test_invoice_defaults_billee_from_referenced_transfer() {
    let (ledger, transport) = in_memory_ledger();
    let recipient = ledger
        .create_recipient(recipient_input("Ada Lovelace", "ada@example.com", "GB"))
        .await
        .unwrap();
    let transfer = ledger
        .create_transfer(NewTransfer {
            recipient_id: Some(recipient.id.clone()),
            amount: Some(dec!(10)),
            ..Default::default()
        })
        .await
        .unwrap();
    // Drain the two transfer notifications first
    wait_for_sends(&transport, 2).await;

    ledger
        .send_invoice(InvoiceInput {
            to: Some("billee@example.com".into()),
            transfer_id: Some(transfer.id.clone()),
            items: vec![LineItem {
                description: "Consulting".into(),
                quantity: 1,
                unit_price: 5_000,
            }],
            ..Default::default()
        })
        .await
        .unwrap();

    let sent = wait_for_sends(&transport, 3).await;
    let invoice_email = sent.last().unwrap();
    assert!(invoice_email.html.contains("Ada Lovelace"));
    assert!(invoice_email.html.contains(&transfer.id));
}
