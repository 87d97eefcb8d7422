//! The action catalog: the versioned list of invocable actions and their
//! remote targets, fetched from the object store on every request.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{GatewayError, Result};
use crate::store::RemoteStore;

/// Object-store key of the catalog document.
pub const CATALOG_KEY: &str = "actions/catalog.json";

// ---------------------------------------------------------------------------
// SafetyTier
// ---------------------------------------------------------------------------

/// Risk classification attached to a catalog entry. Consumed only by
/// presentation layers; never enforced by the gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SafetyTier {
    Green,
    Yellow,
    Other(String),
}

impl From<String> for SafetyTier {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "GREEN" => SafetyTier::Green,
            "YELLOW" => SafetyTier::Yellow,
            _ => SafetyTier::Other(raw),
        }
    }
}

impl From<SafetyTier> for String {
    fn from(tier: SafetyTier) -> Self {
        match tier {
            SafetyTier::Green => "GREEN".to_string(),
            SafetyTier::Yellow => "YELLOW".to_string(),
            SafetyTier::Other(raw) => raw,
        }
    }
}

// ---------------------------------------------------------------------------
// Catalog / CatalogEntry
// ---------------------------------------------------------------------------

/// Presentation hints for how a UI should hand an action off.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvocationHint {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub handoff_text: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogEntry {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub safety_tier: Option<SafetyTier>,
    /// Absent means enabled.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Opaque id of the downstream function executing this action.
    pub remote_target: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invocation: Option<InvocationHint>,
}

fn default_enabled() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<Value>,
    #[serde(rename = "catalog", default)]
    pub entries: Vec<CatalogEntry>,
}

impl Catalog {
    pub fn find(&self, action_id: &str) -> Option<&CatalogEntry> {
        self.entries.iter().find(|e| e.id == action_id)
    }
}

// ---------------------------------------------------------------------------
// CatalogService
// ---------------------------------------------------------------------------

/// Fetches the catalog from the object store.
///
/// Deliberately un-cached: catalog edits must be visible on the next
/// request. Callers needing a staleness budget add their own layer.
pub struct CatalogService {
    store: Arc<dyn RemoteStore>,
}

impl CatalogService {
    pub fn new(store: Arc<dyn RemoteStore>) -> Self {
        Self { store }
    }

    /// Fetch the catalog. With `filter_disabled` set, entries whose
    /// `enabled` is `false` are dropped.
    pub async fn get_catalog(&self, filter_disabled: bool) -> Result<Catalog> {
        let doc = self
            .store
            .fetch_json(CATALOG_KEY)
            .await
            .map_err(|e| GatewayError::UpstreamLoad(format!("catalog: {e}")))?;
        let mut catalog: Catalog = serde_json::from_value(doc)
            .map_err(|e| GatewayError::UpstreamLoad(format!("catalog: {e}")))?;

        if filter_disabled {
            catalog.entries.retain(|e| e.enabled);
        }
        Ok(catalog)
    }
}
