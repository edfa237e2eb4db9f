use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
};
use axum_extra::extract::WithRejection;
use crate::app::AppState;
use crate::errors::{AppError, AppResult};
use crate::models::{CredentialsForm, MessageResponse, TokenResponse};

pub async fn handle_register(
    State(state): State<AppState>,
    WithRejection(Json(form), _): WithRejection<Json<CredentialsForm>, AppError>,
) -> AppResult<(StatusCode, Json<MessageResponse>)> {
    tracing::info!("Registration attempt for user: {}", form.username);

    state.credentials.register(&form.username, &form.password).await?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("Registration successful")),
    ))
}

pub async fn handle_login(
    State(state): State<AppState>,
    WithRejection(Json(form), _): WithRejection<Json<CredentialsForm>, AppError>,
) -> AppResult<Json<TokenResponse>> {
    tracing::info!("Login attempt for user: {}", form.username);

    let user_id = state
        .credentials
        .verify_login(&form.username, &form.password)
        .await?;
    let token = state.tokens.issue(&user_id)?;

    tracing::info!("User {} logged in", form.username);
    Ok(Json(TokenResponse { token }))
}
