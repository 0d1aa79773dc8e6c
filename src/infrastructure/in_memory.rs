use crate::domain::ports::PayoutStore;
use crate::error::Result;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// A thread-safe in-memory document store.
///
/// Uses `Arc<RwLock<HashMap<String, Vec<Value>>>>` to allow shared concurrent
/// access. This is the transient fallback used when no durable backend is
/// configured, and the default store in tests.
#[derive(Default, Clone)]
pub struct InMemoryStore {
    collections: Arc<RwLock<HashMap<String, Vec<Value>>>>,
}

impl InMemoryStore {
    /// Creates a new, empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PayoutStore for InMemoryStore {
    async fn read(&self, collection: &str) -> Result<Vec<Value>> {
        let collections = self.collections.read().await;
        Ok(collections.get(collection).cloned().unwrap_or_default())
    }

    async fn write(&self, collection: &str, documents: Vec<Value>) -> Result<()> {
        let mut collections = self.collections.write().await;
        collections.insert(collection.to_string(), documents);
        Ok(())
    }
}
