use crate::domain::ports::PayoutStore;
use crate::error::{PayoutError, Result};
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

/// A durable local store backed by a single JSON file.
///
/// The file holds one object mapping collection name to document array:
/// `{"recipients": [...], "transfers": [...]}`. Writes go through a
/// temp-file-then-rename so a crash mid-write never truncates the data file.
pub struct JsonFileStore {
    path: PathBuf,
    // Serializes the file-level read-modify-write so two collection writes
    // from the same process cannot clobber each other.
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    /// Opens (or lazily creates on first write) the store at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            write_lock: Mutex::new(()),
        }
    }

    async fn load(&self) -> Result<Map<String, Value>> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => {
                let root: Value = serde_json::from_slice(&bytes)?;
                match root {
                    Value::Object(map) => Ok(map),
                    other => Err(PayoutError::Storage(format!(
                        "data file {} is not a JSON object (found {})",
                        self.path.display(),
                        type_name(&other),
                    ))),
                }
            }
            // A store that has never been written to is simply empty.
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Map::new()),
            Err(e) => Err(e.into()),
        }
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[async_trait]
impl PayoutStore for JsonFileStore {
    async fn read(&self, collection: &str) -> Result<Vec<Value>> {
        let root = self.load().await?;
        match root.get(collection) {
            Some(Value::Array(docs)) => Ok(docs.clone()),
            Some(other) => Err(PayoutError::Storage(format!(
                "collection {collection} is not an array (found {})",
                type_name(other),
            ))),
            None => Ok(Vec::new()),
        }
    }

    async fn write(&self, collection: &str, documents: Vec<Value>) -> Result<()> {
        let _guard = self.write_lock.lock().await;

        let mut root = self.load().await.unwrap_or_default();
        root.insert(collection.to_string(), Value::Array(documents));

        let tmp = self.path.with_extension("tmp");
        let bytes = serde_json::to_vec_pretty(&Value::Object(root))?;
        tokio::fs::write(&tmp, bytes).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_missing_file_reads_empty() {
        let dir = tempdir().unwrap();
        let store = JsonFileStore::open(dir.path().join("data.json"));
        assert!(store.read("recipients").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_write_then_read_roundtrip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data.json");

        let store = JsonFileStore::open(&path);
        store
            .write("recipients", vec![json!({"id": "a", "name": "Ada"})])
            .await
            .unwrap();
        store.write("transfers", vec![json!({"id": "t1"})]).await.unwrap();

        // Reopen from disk: both collections survive
        let reopened = JsonFileStore::open(&path);
        let recipients = reopened.read("recipients").await.unwrap();
        assert_eq!(recipients.len(), 1);
        assert_eq!(recipients[0]["name"], "Ada");
        assert_eq!(reopened.read("transfers").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_corrupt_file_is_a_storage_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data.json");
        std::fs::write(&path, b"not json").unwrap();

        let store = JsonFileStore::open(&path);
        assert!(store.read("recipients").await.is_err());
    }
}
