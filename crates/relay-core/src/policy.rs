//! Optional pre-check against an external policy decision service.
//!
//! The gate is defense in depth, not the authority of record — the invoked
//! action enforces its own authorization. A transport or parse failure
//! therefore allows the request through ("fail open"), loudly, at `warn`.

use serde_json::{json, Value};
use tracing::warn;

// ---------------------------------------------------------------------------
// Verdict
// ---------------------------------------------------------------------------

/// Why an allowed request was allowed. Kept as a named reason so logs and
/// tests can tell "no policy configured" from "policy errored, failing open"
/// from "policy explicitly allowed".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllowReason {
    /// No policy endpoint configured; the gate is disabled.
    NoEndpoint,
    /// The policy service explicitly allowed the request.
    Decision,
    /// The policy service was unreachable or returned an unreadable body.
    FailOpen,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyVerdict {
    Allowed(AllowReason),
    Denied,
}

impl PolicyVerdict {
    pub fn is_allowed(&self) -> bool {
        matches!(self, PolicyVerdict::Allowed(_))
    }
}

// ---------------------------------------------------------------------------
// PolicyGate
// ---------------------------------------------------------------------------

pub struct PolicyGate {
    endpoint: Option<String>,
    client: reqwest::Client,
}

impl PolicyGate {
    pub fn new(endpoint: Option<String>) -> Self {
        Self {
            endpoint,
            client: reqwest::Client::new(),
        }
    }

    /// Ask the policy service whether `payload` may proceed.
    ///
    /// Sends `{"input": payload}` to `{endpoint}/allow` and reads the boolean
    /// `result` field. A well-formed response without a truthy `result` is an
    /// explicit denial; anything that prevents reading a response fails open.
    pub async fn check(&self, payload: &Value) -> PolicyVerdict {
        let Some(endpoint) = &self.endpoint else {
            return PolicyVerdict::Allowed(AllowReason::NoEndpoint);
        };

        let url = format!("{}/allow", endpoint.trim_end_matches('/'));
        let response = match self
            .client
            .post(&url)
            .json(&json!({ "input": payload }))
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "policy endpoint unreachable, allowing by default");
                return PolicyVerdict::Allowed(AllowReason::FailOpen);
            }
        };

        let body: Value = match response.json().await {
            Ok(body) => body,
            Err(e) => {
                warn!(error = %e, "policy response unreadable, allowing by default");
                return PolicyVerdict::Allowed(AllowReason::FailOpen);
            }
        };

        if body.get("result").and_then(Value::as_bool).unwrap_or(false) {
            PolicyVerdict::Allowed(AllowReason::Decision)
        } else {
            PolicyVerdict::Denied
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn no_endpoint_allows_without_io() {
        let gate = PolicyGate::new(None);
        let verdict = gate.check(&json!({ "action": "summarize-docs" })).await;
        assert_eq!(verdict, PolicyVerdict::Allowed(AllowReason::NoEndpoint));
    }

    #[tokio::test]
    async fn explicit_true_result_is_a_decision() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/allow")
            .match_body(mockito::Matcher::PartialJson(json!({
                "input": { "action": "summarize-docs" }
            })))
            .with_status(200)
            .with_body(r#"{"result": true}"#)
            .create_async()
            .await;

        let gate = PolicyGate::new(Some(server.url()));
        let verdict = gate.check(&json!({ "action": "summarize-docs" })).await;

        mock.assert_async().await;
        assert_eq!(verdict, PolicyVerdict::Allowed(AllowReason::Decision));
    }

    #[tokio::test]
    async fn explicit_false_result_denies() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/allow")
            .with_status(200)
            .with_body(r#"{"result": false}"#)
            .create_async()
            .await;

        let gate = PolicyGate::new(Some(server.url()));
        let verdict = gate.check(&json!({ "action": "compliance-pack" })).await;
        assert_eq!(verdict, PolicyVerdict::Denied);
    }

    #[tokio::test]
    async fn unreadable_response_fails_open() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/allow")
            .with_status(500)
            .with_body("<html>Internal Server Error</html>")
            .create_async()
            .await;

        let gate = PolicyGate::new(Some(server.url()));
        let verdict = gate.check(&json!({ "action": "summarize-docs" })).await;
        assert_eq!(verdict, PolicyVerdict::Allowed(AllowReason::FailOpen));
    }

    #[tokio::test]
    async fn unreachable_endpoint_fails_open() {
        let gate = PolicyGate::new(Some("http://127.0.0.1:9".to_string()));
        let verdict = gate.check(&json!({ "action": "summarize-docs" })).await;
        assert_eq!(verdict, PolicyVerdict::Allowed(AllowReason::FailOpen));
    }
}
