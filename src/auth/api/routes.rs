//! Auth routes.

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use super::handlers;
use crate::api::server::AppState;
use crate::auth::middleware::require_auth;

pub fn create_auth_routes(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/api/auth/me", get(handlers::me))
        .route_layer(middleware::from_fn_with_state(state, require_auth));

    Router::new()
        .route("/api/auth/register", post(handlers::register))
        .route("/api/auth/login", post(handlers::login))
        .merge(protected)
}
