//! Remote key-value store client.
//!
//! The store is a single shared HTTP endpoint holding whole JSON documents
//! under string keys. `set_item` POSTs `{key, value, token}`; `get_item`
//! GETs `?key=..&token=..` and receives the stored value back as a JSON
//! string inside the response envelope, so it is decoded twice. A
//! non-success envelope means "no data yet" and maps to `None`, never an
//! error. Transport failures are surfaced to the caller and not retried.
//!
//! There is no versioning and no conflict detection: concurrent writers
//! overwrite each other at whole-document granularity.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::Mutex;

use crate::config::StoreConfig;
use crate::error::Result;

/// Acknowledgement returned by the store for a write.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreAck {
    pub status: String,
    #[serde(default)]
    pub message: String,
}

/// Get/set of a JSON document under a string key.
///
/// `RemoteStore` talks to the shared HTTP service; `MemoryStore` backs
/// tests and offline use with the same contract.
#[async_trait]
pub trait StoreBackend: Send + Sync {
    async fn set_item(&self, key: &str, value: Value) -> Result<StoreAck>;

    /// `Ok(None)` means the key holds no data yet.
    async fn get_item(&self, key: &str) -> Result<Option<Value>>;
}

#[async_trait]
impl<S: StoreBackend + ?Sized> StoreBackend for std::sync::Arc<S> {
    async fn set_item(&self, key: &str, value: Value) -> Result<StoreAck> {
        (**self).set_item(key, value).await
    }

    async fn get_item(&self, key: &str) -> Result<Option<Value>> {
        (**self).get_item(key).await
    }
}

#[derive(Serialize)]
struct SetRequest<'a> {
    key: &'a str,
    value: Value,
    token: &'a str,
}

#[derive(Deserialize)]
struct GetEnvelope {
    status: String,
    #[serde(default)]
    data: Option<GetPayload>,
}

#[derive(Deserialize)]
struct GetPayload {
    value: String,
}

/// Decode the GET envelope: the stored document travels as a JSON string
/// inside `data.value` and has to be parsed a second time.
fn decode_envelope(envelope: GetEnvelope) -> Result<Option<Value>> {
    if envelope.status != "success" {
        return Ok(None);
    }
    match envelope.data {
        Some(payload) => Ok(Some(serde_json::from_str(&payload.value)?)),
        None => Ok(None),
    }
}

/// Client for the shared remote store.
#[derive(Debug, Clone)]
pub struct RemoteStore {
    client: reqwest::Client,
    url: String,
    token: String,
}

impl RemoteStore {
    pub fn new(config: &StoreConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            url: config.url.clone(),
            token: config.token.clone(),
        })
    }
}

#[async_trait]
impl StoreBackend for RemoteStore {
    async fn set_item(&self, key: &str, value: Value) -> Result<StoreAck> {
        let payload = SetRequest {
            key,
            value,
            token: &self.token,
        };
        let response = self
            .client
            .post(&self.url)
            .json(&payload)
            .send()
            .await?
            .error_for_status()?;
        let ack = response.json::<StoreAck>().await?;
        tracing::debug!(key, status = %ack.status, "stored document");
        Ok(ack)
    }

    async fn get_item(&self, key: &str) -> Result<Option<Value>> {
        let response = self
            .client
            .get(&self.url)
            .query(&[("key", key), ("token", self.token.as_str())])
            .send()
            .await?;

        if !response.status().is_success() {
            tracing::debug!(key, status = %response.status(), "no data for key");
            return Ok(None);
        }

        let envelope = response.json::<GetEnvelope>().await?;
        decode_envelope(envelope)
    }
}

/// In-memory store with the remote contract, for tests and offline use.
#[derive(Debug, Default)]
pub struct MemoryStore {
    items: Mutex<HashMap<String, Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StoreBackend for MemoryStore {
    async fn set_item(&self, key: &str, value: Value) -> Result<StoreAck> {
        self.items.lock().await.insert(key.to_string(), value);
        Ok(StoreAck {
            status: "success".to_string(),
            message: "ok".to_string(),
        })
    }

    async fn get_item(&self, key: &str) -> Result<Option<Value>> {
        Ok(self.items.lock().await.get(key).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn memory_store_round_trips_documents() {
        let store = MemoryStore::new();
        assert!(store.get_item("tasks").await.expect("get").is_none());

        let ack = store
            .set_item("tasks", json!([{"taskName": "Design"}]))
            .await
            .expect("set");
        assert_eq!(ack.status, "success");

        let value = store
            .get_item("tasks")
            .await
            .expect("get")
            .expect("stored value");
        assert_eq!(value[0]["taskName"], "Design");
    }

    #[test]
    fn envelope_decodes_double_encoded_value() {
        let envelope: GetEnvelope = serde_json::from_value(json!({
            "status": "success",
            "data": { "value": "[{\"name\":\"write spec\",\"isComplete\":0}]" }
        }))
        .expect("envelope");

        let value = decode_envelope(envelope).expect("decode").expect("value");
        assert_eq!(value[0]["name"], "write spec");
    }

    #[test]
    fn non_success_envelope_means_no_data() {
        let envelope: GetEnvelope = serde_json::from_value(json!({
            "status": "error",
            "message": "key not found"
        }))
        .expect("envelope");

        assert!(decode_envelope(envelope).expect("decode").is_none());
    }

    #[test]
    fn malformed_stored_value_is_an_error() {
        let envelope: GetEnvelope = serde_json::from_value(json!({
            "status": "success",
            "data": { "value": "not json" }
        }))
        .expect("envelope");

        assert!(decode_envelope(envelope).is_err());
    }
}
