use axum::extract::State;
use axum::Json;

use relay_core::catalog::Catalog;

use crate::error::AppError;
use crate::state::AppState;

/// GET /api/actions/catalog — the enabled slice of the action catalog.
///
/// Disabled entries are filtered out; presentation layers render what is
/// left, including safety tiers and handoff hints.
pub async fn get_catalog(State(app): State<AppState>) -> Result<Json<Catalog>, AppError> {
    let catalog = app.dispatcher.catalog().get_catalog(true).await?;
    Ok(Json(catalog))
}
