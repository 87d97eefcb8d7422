//! The dispatch core: one request through the gateway, in fixed order.
//!
//! Validate → resolve persona → load catalog → validate entry → build
//! payload → policy check → invoke → normalize. Everything before the
//! invocation is side-effect free, so a missing, disabled, or denied action
//! never reaches the remote target.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::catalog::CatalogService;
use crate::config::GatewayConfig;
use crate::error::{GatewayError, Result};
use crate::payload;
use crate::persona::{PersonaCache, PersonaResolver, SystemClock, SystemContext};
use crate::policy::{PolicyGate, PolicyVerdict};
use crate::store::RemoteStore;

// ---------------------------------------------------------------------------
// Request / payload / outcome types
// ---------------------------------------------------------------------------

/// One inbound invocation request, already lifted off the wire.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvokeRequest {
    #[serde(default)]
    pub action_id: String,
    #[serde(default)]
    pub caller_id: Option<String>,
    #[serde(default)]
    pub groups: Vec<String>,
    #[serde(default)]
    pub selected_uris: Vec<String>,
    /// Caller-supplied params, overlaid entry-by-entry on the built ones.
    #[serde(default)]
    pub params: Option<Map<String, Value>>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PayloadUser {
    pub id: String,
    pub group: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PayloadContext {
    pub request_id: String,
    pub persona_id: String,
    pub system: SystemContext,
}

/// The normalized envelope sent to the remote action.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvocationPayload {
    pub action: String,
    pub user: PayloadUser,
    pub context: PayloadContext,
    pub params: Map<String, Value>,
}

/// Final result of a dispatch: the remote call's status verbatim plus the
/// normalized body.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DispatchOutcome {
    pub status_code: u16,
    pub body: Value,
}

// ---------------------------------------------------------------------------
// Dispatcher
// ---------------------------------------------------------------------------

/// Composition root of the dispatch core.
pub struct Dispatcher {
    config: GatewayConfig,
    store: Arc<dyn RemoteStore>,
    personas: PersonaResolver,
    catalog: CatalogService,
    policy: PolicyGate,
}

impl Dispatcher {
    /// Wire up the core against a store implementation. Production callers
    /// pass an `HttpRemoteStore`; tests pass fakes.
    pub fn new(config: GatewayConfig, store: Arc<dyn RemoteStore>) -> Self {
        let cache = PersonaCache::new(
            Duration::from_secs(config.persona_ttl_secs),
            Arc::new(SystemClock),
        );
        Self::with_cache(config, store, cache)
    }

    /// Variant taking an externally built cache, so tests can inject a fake
    /// clock.
    pub fn with_cache(
        config: GatewayConfig,
        store: Arc<dyn RemoteStore>,
        cache: PersonaCache,
    ) -> Self {
        let personas = PersonaResolver::new(Arc::clone(&store), cache);
        let catalog = CatalogService::new(Arc::clone(&store));
        let policy = PolicyGate::new(config.policy_url.clone());
        Self {
            config,
            store,
            personas,
            catalog,
            policy,
        }
    }

    pub fn personas(&self) -> &PersonaResolver {
        &self.personas
    }

    pub fn catalog(&self) -> &CatalogService {
        &self.catalog
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Run one request through the gateway.
    ///
    /// Steps execute strictly in the order above; the policy check sees the
    /// final payload, including the resolved persona's context, before the
    /// remote call is made.
    pub async fn dispatch(&self, request: &InvokeRequest) -> Result<DispatchOutcome> {
        if request.action_id.trim().is_empty() {
            return Err(GatewayError::Validation("actionId is required".to_string()));
        }
        let action_id = request.action_id.as_str();
        let request_id = new_request_id();

        // Persona resolution; the default group stands in for callers that
        // supply none.
        let groups: Vec<String> = if request.groups.is_empty() {
            vec![self.config.default_group.clone()]
        } else {
            request.groups.clone()
        };
        let persona = self.personas.resolve(&groups).await?;
        tracing::debug!(%request_id, action = action_id, persona = %persona.id, "persona resolved");

        // Catalog lookup — unfiltered: a present-but-disabled entry is a
        // different failure than an absent one.
        let catalog = self.catalog.get_catalog(false).await?;
        let entry = catalog
            .find(action_id)
            .ok_or_else(|| GatewayError::ActionNotFound(action_id.to_string()))?;
        if !entry.enabled {
            return Err(GatewayError::ActionDisabled(action_id.to_string()));
        }
        tracing::debug!(%request_id, action = action_id, target = %entry.remote_target, "action validated");

        // Payload construction.
        let mut params =
            payload::build_params(action_id, &request.selected_uris, &groups, Utc::now());
        if let Some(overrides) = &request.params {
            for (key, value) in overrides {
                params.insert(key.clone(), value.clone());
            }
        }
        let invocation = InvocationPayload {
            action: action_id.to_string(),
            user: PayloadUser {
                id: request
                    .caller_id
                    .clone()
                    .unwrap_or_else(|| self.config.default_user_id.clone()),
                group: groups[0].clone(),
            },
            context: PayloadContext {
                request_id: request_id.clone(),
                persona_id: persona.id.clone(),
                system: persona.system_context(),
            },
            params,
        };
        let payload_value = serde_json::to_value(&invocation)
            .map_err(|e| GatewayError::Invocation(format!("payload serialization: {e}")))?;

        // Policy pre-check on the final payload.
        let verdict = self.policy.check(&payload_value).await;
        tracing::debug!(%request_id, action = action_id, ?verdict, "policy checked");
        if verdict == PolicyVerdict::Denied {
            return Err(GatewayError::PolicyDenied(action_id.to_string()));
        }

        // Remote invocation.
        let response = self
            .store
            .invoke(&entry.remote_target, &payload_value)
            .await
            .map_err(|e| GatewayError::Invocation(e.to_string()))?;
        tracing::debug!(%request_id, action = action_id, status = response.status_code, "invoked");

        Ok(DispatchOutcome {
            status_code: response.status_code,
            body: normalize_body(response.body),
        })
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// `rq-<epoch-ms>-<suffix>`: unique enough for log correlation, no global
/// uniqueness guarantee intended.
fn new_request_id() -> String {
    let ms = Utc::now().timestamp_millis();
    let suffix = Uuid::new_v4().simple().to_string();
    format!("rq-{ms}-{}", &suffix[..9])
}

/// Undo downstream double-encoding: a `body` field (or an entire body) that
/// is a JSON-encoded string is parsed back into JSON. Parse failures leave
/// the raw string, so plain text passes through unchanged.
fn normalize_body(body: Value) -> Value {
    match body {
        Value::String(raw) => match serde_json::from_str(&raw) {
            Ok(parsed) => parsed,
            Err(_) => Value::String(raw),
        },
        Value::Object(mut envelope) => {
            if let Some(Value::String(inner)) = envelope.get("body") {
                if let Ok(parsed) = serde_json::from_str::<Value>(inner) {
                    envelope.insert("body".to_string(), parsed);
                }
            }
            Value::Object(envelope)
        }
        other => other,
    }
}
