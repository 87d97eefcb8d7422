//! Persona resolution: role-derived behavioral profiles selected by group
//! membership, loaded from the object store through a TTL cache.
//!
//! Personas shape the tone, preferred sources, and answer guidance a
//! downstream consumer sees, without fragmenting content by role.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{GatewayError, Result};
use crate::store::RemoteStore;

/// Persona ids tried in order during resolution. The order is a business
/// constant: a caller whose groups match several personas always gets the
/// earliest entry, not the most specific match.
pub const PERSONA_PRIORITY: [&str; 3] = ["engineer", "delivery-manager", "compliance"];

/// Persona returned when no candidate matches the caller's groups.
pub const DEFAULT_PERSONA_ID: &str = "engineer";

// ---------------------------------------------------------------------------
// Persona / SystemContext
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Persona {
    pub id: String,
    pub name: String,
    pub allowed_groups: Vec<String>,
    pub tone: String,
    #[serde(default)]
    pub preferred_sources: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formatting: Option<String>,
    #[serde(default)]
    pub answer_guidance: Vec<String>,
    #[serde(default)]
    pub glossary_aliases: HashMap<String, Vec<String>>,
}

impl Persona {
    /// Project the fields a downstream consumer needs.
    pub fn system_context(&self) -> SystemContext {
        SystemContext {
            tone: self.tone.clone(),
            preferred_sources: self.preferred_sources.clone(),
            answer_guidance: self.answer_guidance.clone(),
            glossary_aliases: self.glossary_aliases.clone(),
        }
    }

    fn allows_any(&self, groups: &[String]) -> bool {
        self.allowed_groups.iter().any(|g| groups.contains(g))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemContext {
    pub tone: String,
    pub preferred_sources: Vec<String>,
    pub answer_guidance: Vec<String>,
    pub glossary_aliases: HashMap<String, Vec<String>>,
}

// ---------------------------------------------------------------------------
// Clock
// ---------------------------------------------------------------------------

/// Millisecond clock, injectable so cache expiry is testable without sleeping.
pub trait Clock: Send + Sync {
    fn now_ms(&self) -> u64;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        use std::time::{SystemTime, UNIX_EPOCH};
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64
    }
}

// ---------------------------------------------------------------------------
// PersonaCache
// ---------------------------------------------------------------------------

struct CacheEntry {
    fetched_at_ms: u64,
    persona: Arc<Persona>,
}

/// Time-bounded memoization of persona documents, keyed by persona id.
///
/// A write is a full-entry replace, so concurrent misses may both fetch and
/// both insert; that is acceptable staleness bounded by the TTL. Expiry is
/// the only eviction path — nothing else writes personas.
pub struct PersonaCache {
    ttl: Duration,
    clock: Arc<dyn Clock>,
    entries: Mutex<HashMap<String, CacheEntry>>,
}

impl PersonaCache {
    pub fn new(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            ttl,
            clock,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Fresh hit or nothing. Stale entries stay in place; the caller's
    /// re-fetch replaces them.
    pub fn get(&self, id: &str) -> Option<Arc<Persona>> {
        let entries = self.entries.lock().expect("persona cache lock poisoned");
        let entry = entries.get(id)?;
        let age_ms = self.clock.now_ms().saturating_sub(entry.fetched_at_ms);
        if age_ms < self.ttl.as_millis() as u64 {
            Some(Arc::clone(&entry.persona))
        } else {
            None
        }
    }

    pub fn put(&self, id: &str, persona: Arc<Persona>) {
        let mut entries = self.entries.lock().expect("persona cache lock poisoned");
        entries.insert(
            id.to_string(),
            CacheEntry {
                fetched_at_ms: self.clock.now_ms(),
                persona,
            },
        );
    }
}

// ---------------------------------------------------------------------------
// PersonaResolver
// ---------------------------------------------------------------------------

pub struct PersonaResolver {
    store: Arc<dyn RemoteStore>,
    cache: PersonaCache,
}

impl PersonaResolver {
    pub fn new(store: Arc<dyn RemoteStore>, cache: PersonaCache) -> Self {
        Self { store, cache }
    }

    /// Resolve the persona for a caller's group memberships.
    ///
    /// Candidates are tried in [`PERSONA_PRIORITY`] order; the first whose
    /// `allowedGroups` intersects `groups` wins. No match falls back to the
    /// default persona. A persona document that fails to load propagates as
    /// `UpstreamLoad` — unknown groups fail open to the default, missing
    /// persona documents do not.
    pub async fn resolve(&self, groups: &[String]) -> Result<Arc<Persona>> {
        for id in PERSONA_PRIORITY {
            let persona = self.load(id).await?;
            if persona.allows_any(groups) {
                return Ok(persona);
            }
        }
        self.load(DEFAULT_PERSONA_ID).await
    }

    /// Load a persona through the cache.
    pub async fn load(&self, id: &str) -> Result<Arc<Persona>> {
        if let Some(hit) = self.cache.get(id) {
            return Ok(hit);
        }
        tracing::debug!(persona = id, "persona cache miss, fetching");

        let key = persona_key(id);
        let doc = self
            .store
            .fetch_json(&key)
            .await
            .map_err(|e| GatewayError::UpstreamLoad(format!("persona '{id}': {e}")))?;
        let persona: Persona = serde_json::from_value(doc)
            .map_err(|e| GatewayError::UpstreamLoad(format!("persona '{id}': {e}")))?;

        let persona = Arc::new(persona);
        self.cache.put(id, Arc::clone(&persona));
        Ok(persona)
    }
}

fn persona_key(id: &str) -> String {
    format!("personas/{id}.json")
}

/// Map loose group spellings to canonical group names. Unknown names pass
/// through untouched.
pub fn normalize_groups(raw: &[String]) -> Vec<String> {
    raw.iter()
        .map(|g| match g.to_lowercase().as_str() {
            "engineering" => "Engineering".to_string(),
            "delivery" => "Delivery".to_string(),
            "compliance" => "Compliance".to_string(),
            "management" => "Management".to_string(),
            _ => g.clone(),
        })
        .collect()
}
