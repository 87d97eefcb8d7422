use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use relay_core::persona::normalize_groups;

use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ResolveQuery {
    /// Comma-separated group names.
    #[serde(default)]
    pub groups: Option<String>,
}

/// GET /api/personas/resolve?groups=a,b — debugging/UI view of persona
/// resolution. Group aliases are normalized first; no groups means the
/// configured default group.
pub async fn resolve_persona(
    State(app): State<AppState>,
    Query(query): Query<ResolveQuery>,
) -> Result<Json<serde_json::Value>, AppError> {
    let groups: Vec<String> = query
        .groups
        .as_deref()
        .unwrap_or("")
        .split(',')
        .map(str::trim)
        .filter(|g| !g.is_empty())
        .map(String::from)
        .collect();

    let groups = if groups.is_empty() {
        vec![app.dispatcher.config().default_group.clone()]
    } else {
        normalize_groups(&groups)
    };

    let persona = app.dispatcher.personas().resolve(&groups).await?;
    Ok(Json(json!({ "personaId": persona.id, "persona": &*persona })))
}
