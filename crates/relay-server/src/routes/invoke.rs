use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use serde_json::{Map, Value};

use relay_core::dispatch::InvokeRequest;

use crate::error::AppError;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// POST /api/actions/invoke
// ---------------------------------------------------------------------------

/// Wire shape accepted by the invoke endpoint.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvokeBody {
    #[serde(default)]
    pub action_id: Option<String>,
    #[serde(default)]
    pub params: Option<Map<String, Value>>,
    #[serde(default)]
    pub user: Option<WireUser>,
    #[serde(default)]
    pub selected_uris: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct WireUser {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub groups: Option<Vec<String>>,
}

/// Dispatch one action and echo the remote call's status and normalized
/// body. Gateway-level failures come back as `{"error": …}` with the status
/// from the error taxonomy.
pub async fn invoke_action(
    State(app): State<AppState>,
    Json(body): Json<InvokeBody>,
) -> Result<Response, AppError> {
    let user = body.user.unwrap_or_default();
    let request = InvokeRequest {
        action_id: body.action_id.unwrap_or_default(),
        caller_id: user.id,
        groups: user.groups.unwrap_or_default(),
        selected_uris: body.selected_uris,
        params: body.params,
    };

    let outcome = app.dispatcher.dispatch(&request).await?;

    let status = StatusCode::from_u16(outcome.status_code).unwrap_or(StatusCode::BAD_GATEWAY);
    Ok((status, Json(outcome.body)).into_response())
}
