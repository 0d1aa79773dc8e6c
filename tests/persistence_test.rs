mod common;

use common::{RecordingTransport, ledger_with, recipient_input};
use payglobal::domain::transfer::NewTransfer;
use payglobal::infrastructure::json_file::JsonFileStore;
use rust_decimal_macros::dec;
use tempfile::tempdir;

#[tokio::test]
async fn test_file_store_state_survives_reopen() {
    let dir = tempdir().unwrap();
    let data_path = dir.path().join("payouts.json");

    // First "process": register a recipient and record a transfer
    let transfer_id = {
        let ledger = ledger_with(
            Box::new(JsonFileStore::open(&data_path)),
            RecordingTransport::new(),
        );
        let recipient = ledger
            .create_recipient(recipient_input("Ada", "ada@example.com", "GB"))
            .await
            .unwrap();
        let transfer = ledger
            .create_transfer(NewTransfer {
                recipient_id: Some(recipient.id.clone()),
                amount: Some(dec!(100)),
                ..Default::default()
            })
            .await
            .unwrap();
        transfer.id
    };

    // Second "process" over the same file: everything is still there
    let ledger = ledger_with(
        Box::new(JsonFileStore::open(&data_path)),
        RecordingTransport::new(),
    );

    let recipients = ledger.list_recipients().await.unwrap();
    assert_eq!(recipients.len(), 1);
    assert_eq!(recipients[0].email, "ada@example.com");
    assert_eq!(recipients[0].total_paid, 10_000);

    let transfers = ledger.list_transfers().await.unwrap();
    assert_eq!(transfers.len(), 1);
    assert_eq!(transfers[0].id, transfer_id);

    // And the paid transition persists too
    ledger
        .mark_transfer_paid(&transfer_id, Some("done".into()))
        .await
        .unwrap();

    let reopened = ledger_with(
        Box::new(JsonFileStore::open(&data_path)),
        RecordingTransport::new(),
    );
    let transfers = reopened.list_transfers().await.unwrap();
    assert_eq!(
        transfers[0].status,
        payglobal::domain::transfer::TransferStatus::Paid
    );
    assert_eq!(transfers[0].paid_note.as_deref(), Some("done"));
}
