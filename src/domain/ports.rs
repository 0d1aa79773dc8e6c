use crate::error::Result;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

/// Collection name for recipient documents.
pub const COLLECTION_RECIPIENTS: &str = "recipients";
/// Collection name for transfer documents.
pub const COLLECTION_TRANSFERS: &str = "transfers";

/// A pluggable key-to-documents store.
///
/// The store knows nothing about entity semantics: it persists opaque ordered
/// collections of JSON documents keyed by a collection name. Writes are
/// full-collection replaces, never field-level patches, and every
/// implementation must behave identically under that contract so the ledger
/// stays unaware of which backend is active.
#[async_trait]
pub trait PayoutStore: Send + Sync {
    /// Returns the collection in insertion order, or an empty sequence when
    /// the key has never been written.
    async fn read(&self, collection: &str) -> Result<Vec<Value>>;

    /// Replaces the whole collection.
    async fn write(&self, collection: &str, documents: Vec<Value>) -> Result<()>;
}

pub type StoreBox = Box<dyn PayoutStore>;

/// An outbound email, fully rendered.
#[derive(Debug, Clone)]
pub struct OutgoingEmail {
    pub to: String,
    pub subject: String,
    pub html: String,
}

/// The external mail transport, specified only at its boundary: send a
/// templated HTML document to an address, get back a message id or an error.
#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn send(&self, email: OutgoingEmail) -> Result<String>;
}

pub type TransportArc = Arc<dyn MailTransport>;
