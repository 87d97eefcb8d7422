use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// GatewayConfig
// ---------------------------------------------------------------------------

/// Runtime configuration for the gateway.
///
/// Every field has a default so a bare `relay serve` comes up against local
/// endpoints; production deployments override via `RELAY_*` environment
/// variables. An absent `policy_url` disables the policy gate entirely.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Base URL of the keyed object store serving catalog and persona documents.
    #[serde(default = "default_store_url")]
    pub store_url: String,

    /// Base URL under which remote action targets are invoked.
    #[serde(default = "default_functions_url")]
    pub functions_url: String,

    /// Policy decision endpoint. `None` means always-allow.
    #[serde(default)]
    pub policy_url: Option<String>,

    /// Identity attached to payloads when the caller supplies none.
    #[serde(default = "default_user_id")]
    pub default_user_id: String,

    /// Group assumed when the caller supplies no groups.
    #[serde(default = "default_group")]
    pub default_group: String,

    /// Persona cache TTL in seconds.
    #[serde(default = "default_persona_ttl_secs")]
    pub persona_ttl_secs: u64,
}

fn default_store_url() -> String {
    "http://127.0.0.1:9000/kb".to_string()
}

fn default_functions_url() -> String {
    "http://127.0.0.1:9001/functions".to_string()
}

fn default_user_id() -> String {
    "anon@relay.local".to_string()
}

fn default_group() -> String {
    "Engineering".to_string()
}

fn default_persona_ttl_secs() -> u64 {
    300
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            store_url: default_store_url(),
            functions_url: default_functions_url(),
            policy_url: None,
            default_user_id: default_user_id(),
            default_group: default_group(),
            persona_ttl_secs: default_persona_ttl_secs(),
        }
    }
}

impl GatewayConfig {
    /// Read configuration from `RELAY_*` environment variables, falling back
    /// to defaults for anything unset. An unparseable TTL keeps the default.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(v) = std::env::var("RELAY_STORE_URL") {
            config.store_url = v;
        }
        if let Ok(v) = std::env::var("RELAY_FUNCTIONS_URL") {
            config.functions_url = v;
        }
        if let Ok(v) = std::env::var("RELAY_POLICY_URL") {
            if !v.is_empty() {
                config.policy_url = Some(v);
            }
        }
        if let Ok(v) = std::env::var("RELAY_DEFAULT_USER") {
            config.default_user_id = v;
        }
        if let Ok(v) = std::env::var("RELAY_DEFAULT_GROUP") {
            config.default_group = v;
        }
        if let Ok(v) = std::env::var("RELAY_PERSONA_TTL_SECS") {
            if let Ok(secs) = v.parse() {
                config.persona_ttl_secs = secs;
            }
        }
        config
    }
}
