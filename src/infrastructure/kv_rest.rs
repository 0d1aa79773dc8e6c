use crate::domain::ports::PayoutStore;
use crate::error::{PayoutError, Result};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

/// The durable remote store: an Upstash/Vercel-style KV over REST.
///
/// Each collection is one key whose value is the JSON-serialized document
/// array. `GET {url}/get/{key}` returns `{"result": <value-or-null>}`;
/// `POST {url}/set/{key}` stores the request body. The value round-trips as a
/// string on the wire, so reads tolerate both the stringified and the plain
/// array shape.
#[derive(Clone)]
pub struct KvRestStore {
    client: reqwest::Client,
    base_url: String,
    token: String,
}

#[derive(Deserialize)]
struct KvEnvelope {
    result: Option<Value>,
}

impl KvRestStore {
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
        }
    }

    fn unwrap_result(result: Option<Value>) -> Result<Vec<Value>> {
        match result {
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(Value::Array(docs)) => Ok(docs),
            // The KV protocol returns stored values as strings
            Some(Value::String(raw)) => match serde_json::from_str(&raw)? {
                Value::Array(docs) => Ok(docs),
                Value::Null => Ok(Vec::new()),
                other => Err(PayoutError::Storage(format!(
                    "KV value is not a document array: {other}"
                ))),
            },
            Some(other) => Err(PayoutError::Storage(format!(
                "KV value is not a document array: {other}"
            ))),
        }
    }
}

#[async_trait]
impl PayoutStore for KvRestStore {
    async fn read(&self, collection: &str) -> Result<Vec<Value>> {
        let response = self
            .client
            .get(format!("{}/get/{collection}", self.base_url))
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(|e| PayoutError::Storage(format!("KV get failed: {e}")))?;

        if !response.status().is_success() {
            return Err(PayoutError::Storage(format!(
                "KV get returned HTTP {}",
                response.status()
            )));
        }

        let envelope: KvEnvelope = response
            .json()
            .await
            .map_err(|e| PayoutError::Storage(format!("KV get body: {e}")))?;
        Self::unwrap_result(envelope.result)
    }

    async fn write(&self, collection: &str, documents: Vec<Value>) -> Result<()> {
        let body = serde_json::to_string(&Value::Array(documents))?;
        let response = self
            .client
            .post(format!("{}/set/{collection}", self.base_url))
            .bearer_auth(&self.token)
            .body(body)
            .send()
            .await
            .map_err(|e| PayoutError::Storage(format!("KV set failed: {e}")))?;

        if !response.status().is_success() {
            return Err(PayoutError::Storage(format!(
                "KV set returned HTTP {}",
                response.status()
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unwrap_null_result_is_empty() {
        assert!(KvRestStore::unwrap_result(None).unwrap().is_empty());
        assert!(
            KvRestStore::unwrap_result(Some(Value::Null))
                .unwrap()
                .is_empty()
        );
    }

    #[test]
    fn test_unwrap_plain_array() {
        let docs = KvRestStore::unwrap_result(Some(json!([{"id": "a"}]))).unwrap();
        assert_eq!(docs.len(), 1);
    }

    #[test]
    fn test_unwrap_stringified_array() {
        let docs =
            KvRestStore::unwrap_result(Some(json!("[{\"id\":\"a\"},{\"id\":\"b\"}]"))).unwrap();
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[1]["id"], "b");
    }

    #[test]
    fn test_unwrap_non_array_is_storage_error() {
        assert!(KvRestStore::unwrap_result(Some(json!(42))).is_err());
        assert!(KvRestStore::unwrap_result(Some(json!("{\"id\":\"a\"}"))).is_err());
    }
}
