use axum::{
    extract::State,
    response::Json,
    Extension,
};
use serde_json::{json, Value};
use crate::app::AppState;
use crate::errors::AppResult;
use crate::middleware::AuthUser;
use crate::models::PublicUser;

pub async fn list_users(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> AppResult<Json<Vec<PublicUser>>> {
    tracing::info!("User {} listing accounts", user.user_id);
    Ok(Json(state.credentials.list_all_users().await?))
}

// Bulk deletion is deliberately not wired to the store.
pub async fn delete_all(Extension(user): Extension<AuthUser>) -> &'static str {
    tracing::warn!("User {} called /del; nothing was deleted", user.user_id);
    "Deleted successfully"
}

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
