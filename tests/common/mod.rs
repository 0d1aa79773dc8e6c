#![allow(dead_code)]

use async_trait::async_trait;
use payglobal::application::dispatcher::Dispatcher;
use payglobal::application::ledger::Ledger;
use payglobal::config::Config;
use payglobal::domain::ports::{MailTransport, OutgoingEmail, StoreBox};
use payglobal::domain::recipient::NewRecipient;
use payglobal::error::Result;
use payglobal::infrastructure::in_memory::InMemoryStore;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

/// Captures every outgoing email instead of sending it.
pub struct RecordingTransport {
    pub sent: Mutex<Vec<OutgoingEmail>>,
    pub fail: bool,
}

impl RecordingTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            sent: Mutex::new(Vec::new()),
            fail: false,
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            sent: Mutex::new(Vec::new()),
            fail: true,
        })
    }
}

#[async_trait]
impl MailTransport for RecordingTransport {
    async fn send(&self, email: OutgoingEmail) -> Result<String> {
        if self.fail {
            return Err(payglobal::error::PayoutError::Dispatch(
                "transport rejected the message".into(),
            ));
        }
        let mut sent = self.sent.lock().await;
        sent.push(email);
        Ok(format!("msg_{}", sent.len()))
    }
}

pub fn test_config() -> Config {
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

/// A ledger over the given store, wired to a recording transport.
pub fn ledger_with(store: StoreBox, transport: Arc<RecordingTransport>) -> Ledger {
    let dispatcher = Arc::new(Dispatcher::new(transport, Some("owner@example.com".into())));
    Ledger::new(store, dispatcher, &test_config())
}

/// In-memory ledger plus the transport it records into.
pub fn in_memory_ledger() -> (Ledger, Arc<RecordingTransport>) {
    let transport = RecordingTransport::new();
    (
        ledger_with(Box::new(InMemoryStore::new()), transport.clone()),
        transport,
    )
}

pub fn recipient_input(name: &str, email: &str, country: &str) -> NewRecipient {
    NewRecipient {
        name: Some(name.into()),
        email: Some(email.into()),
        country: Some(country.into()),
        ..Default::default()
    }
}

/// Polls the recording transport until `n` messages arrived or a short
/// deadline passes. Dispatch is fire-and-forget, so tests cannot await it
/// directly.
pub async fn wait_for_sends(transport: &RecordingTransport, n: usize) -> Vec<OutgoingEmail> {
    for _ in 0..100 {
        {
            let sent = transport.sent.lock().await;
            if sent.len() >= n {
                return sent.clone();
            }
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    transport.sent.lock().await.clone()
}
