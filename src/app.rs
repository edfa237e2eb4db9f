use axum::{
    extract::DefaultBodyLimit,
    middleware::from_fn_with_state,
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer, trace::TraceLayer};
use crate::{
    handlers,
    middleware::require_auth,
    services::{CredentialStore, TokenService},
};

// Application state shared between handlers
#[derive(Clone)]
pub struct AppState {
    pub credentials: CredentialStore,
    pub tokens: Arc<TokenService>,
}

pub fn build_router(state: AppState, max_body_size: usize) -> Router {
    // Everything here passes through the bearer-token gate first
    let protected = Router::new()
        .route("/addtodo", post(handlers::add_todo))
        .route("/removetodo", delete(handlers::remove_todo))
        .route("/tasks", get(handlers::list_tasks))
        .route("/updatetodo/:index", put(handlers::update_todo))
        .route("/users", get(handlers::list_users))
        .route("/del", post(handlers::delete_all))
        .route_layer(from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .route("/register", post(handlers::handle_register))
        .route("/login", post(handlers::handle_login))
        .route("/health", get(handlers::health))
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(max_body_size))
        .with_state(state)
}
