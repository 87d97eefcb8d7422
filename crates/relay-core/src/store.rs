//! Transport to the object store and the remote functions it fronts.
//!
//! `RemoteStore` is the single seam between the dispatch core and the
//! outside world: read a JSON document by key, invoke a named function with
//! a payload. `HttpRemoteStore` is the production implementation; tests
//! substitute in-memory fakes. No caching, no retries — layers above decide
//! both.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

// ---------------------------------------------------------------------------
// Errors / response envelope
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("document not found: {0}")]
    NotFound(String),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("malformed document at {0}: {1}")]
    Malformed(String, String),
}

/// Raw result of a remote invocation: the function's status code and parsed
/// JSON body, before any normalization.
#[derive(Debug, Clone)]
pub struct RemoteResponse {
    pub status_code: u16,
    pub body: Value,
}

// ---------------------------------------------------------------------------
// RemoteStore trait
// ---------------------------------------------------------------------------

#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Read and parse a JSON document from the keyed object store.
    async fn fetch_json(&self, key: &str) -> Result<Value, StoreError>;

    /// Invoke the named remote function with a JSON payload.
    ///
    /// A non-success HTTP status from the function is not an error — it is
    /// returned as-is so the dispatcher can echo it verbatim. Only
    /// connect/protocol/parse failures produce `StoreError::Transport`.
    async fn invoke(&self, target: &str, payload: &Value) -> Result<RemoteResponse, StoreError>;
}

// ---------------------------------------------------------------------------
// HttpRemoteStore
// ---------------------------------------------------------------------------

/// Serves documents from `GET {store_url}/{key}` and invocations from
/// `POST {functions_url}/{target}`.
pub struct HttpRemoteStore {
    client: reqwest::Client,
    store_url: String,
    functions_url: String,
}

impl HttpRemoteStore {
    pub fn new(store_url: &str, functions_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            store_url: store_url.trim_end_matches('/').to_string(),
            functions_url: functions_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl RemoteStore for HttpRemoteStore {
    async fn fetch_json(&self, key: &str) -> Result<Value, StoreError> {
        let url = format!("{}/{}", self.store_url, key);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| StoreError::Transport(e.to_string()))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(StoreError::NotFound(key.to_string()));
        }
        if !response.status().is_success() {
            return Err(StoreError::Transport(format!(
                "GET {url} returned {}",
                response.status()
            )));
        }
        response
            .json()
            .await
            .map_err(|e| StoreError::Malformed(key.to_string(), e.to_string()))
    }

    async fn invoke(&self, target: &str, payload: &Value) -> Result<RemoteResponse, StoreError> {
        let url = format!("{}/{}", self.functions_url, target);
        let response = self
            .client
            .post(&url)
            .json(payload)
            .send()
            .await
            .map_err(|e| StoreError::Transport(e.to_string()))?;

        let status_code = response.status().as_u16();
        let body = response
            .json()
            .await
            .map_err(|e| StoreError::Transport(format!("invalid JSON from '{target}': {e}")))?;

        Ok(RemoteResponse { status_code, body })
    }
}

// ---------------------------------------------------------------------------
// Test double — shared by the core's unit tests
// ---------------------------------------------------------------------------


#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn fetch_json_parses_document() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/kb/actions/catalog.json")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"version": 1, "catalog": []}"#)
            .create_async()
            .await;

        let store = HttpRemoteStore::new(&format!("{}/kb", server.url()), &server.url());
        let doc = store.fetch_json("actions/catalog.json").await.unwrap();

        mock.assert_async().await;
        assert_eq!(doc["version"], 1);
    }

    #[tokio::test]
    async fn fetch_json_404_is_not_found() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/kb/personas/ghost.json")
            .with_status(404)
            .create_async()
            .await;

        let store = HttpRemoteStore::new(&format!("{}/kb", server.url()), &server.url());
        let err = store.fetch_json("personas/ghost.json").await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn fetch_json_garbage_is_malformed() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/kb/actions/catalog.json")
            .with_status(200)
            .with_body("not json at all")
            .create_async()
            .await;

        let store = HttpRemoteStore::new(&format!("{}/kb", server.url()), &server.url());
        let err = store.fetch_json("actions/catalog.json").await.unwrap_err();
        assert!(matches!(err, StoreError::Malformed(_, _)));
    }

    #[tokio::test]
    async fn invoke_passes_non_success_status_through() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/fn/act-summarize")
            .with_status(422)
            .with_body(r#"{"error": "missing required param(s): documentUris"}"#)
            .create_async()
            .await;

        let store = HttpRemoteStore::new(&server.url(), &format!("{}/fn", server.url()));
        let response = store
            .invoke("act-summarize", &json!({ "action": "summarize-docs" }))
            .await
            .unwrap();

        assert_eq!(response.status_code, 422);
        assert_eq!(
            response.body["error"],
            "missing required param(s): documentUris"
        );
    }

    #[tokio::test]
    async fn invoke_unreachable_endpoint_is_transport_error() {
        // Port 9 (discard) refuses connections on any sane test machine.
        let store = HttpRemoteStore::new("http://127.0.0.1:9", "http://127.0.0.1:9");
        let err = store.invoke("anything", &json!({})).await.unwrap_err();
        assert!(matches!(err, StoreError::Transport(_)));
    }
}
