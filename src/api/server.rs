//! HTTP server: shared state, router and layer stack.

use std::any::Any;
use std::sync::Arc;

use anyhow::Context;
use axum::{
    error_handling::HandleErrorLayer,
    http::{header, HeaderValue, Method, StatusCode, Uri},
    middleware,
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
    Json, Router,
};
use tokio::net::TcpListener;
use tower::{limit::ConcurrencyLimitLayer, timeout::TimeoutLayer, BoxError, ServiceBuilder};
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{AllowOrigin, Any as AnyOrigin, CorsLayer},
    limit::RequestBodyLimitLayer,
    trace::TraceLayer,
};
use tracing::{error, info, warn};

use super::handlers::{bookings, health, services, users};
use super::server_config::{CORS_MAX_AGE, MAX_BODY_SIZE, MAX_CONCURRENCY, REQUEST_TIMEOUT};
use super::types::ErrorResponse;
use crate::auth::{create_auth_routes, require_admin, require_auth, AccountService, PasswordService, TokenService};
use crate::config::AppConfig;
use crate::errors::ApiError;
use crate::storage::{AccountStore, BookingStore, ServiceStore, SqliteStorage};

/// State shared by every handler. Cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub auth: Arc<AccountService>,
    pub accounts: Arc<dyn AccountStore>,
    pub services: Arc<dyn ServiceStore>,
    pub bookings: Arc<dyn BookingStore>,
}

impl AppState {
    /// Wire services and stores together. Fails on an unusable signing secret.
    pub fn new(config: AppConfig, storage: SqliteStorage) -> anyhow::Result<Self> {
        let tokens = TokenService::new(&config.auth.jwt_secret, config.auth.token_expiry)
            .context("invalid JWT_SECRET")?;
        let storage = Arc::new(storage);
        let passwords = PasswordService::new(config.auth.password.clone());
        let auth = AccountService::new(storage.clone(), passwords, Arc::new(tokens));

        Ok(Self {
            config: Arc::new(config),
            auth: Arc::new(auth),
            accounts: storage.clone(),
            services: storage.clone(),
            bookings: storage,
        })
    }
}

/// The spa API server.
#[derive(Clone)]
pub struct SpaServer {
    pub host: String,
    pub port: u16,
    pub state: AppState,
}

impl SpaServer {
    /// Open the database and build the shared state.
    pub async fn new(config: AppConfig) -> anyhow::Result<Self> {
        config.validate_for_server()?;
        let storage = SqliteStorage::connect(&config.database.url, config.database.max_connections)
            .await
            .context("failed to open database")?;

        Ok(Self {
            host: config.server.host.clone(),
            port: config.server.port,
            state: AppState::new(config, storage)?,
        })
    }

    pub fn create_router(&self) -> Router {
        create_router(self.state.clone())
    }

    /// Serve until Ctrl-C.
    pub async fn start(self) -> anyhow::Result<()> {
        let app = self.create_router();
        let addr = format!("{}:{}", self.host, self.port);
        let listener = TcpListener::bind(&addr)
            .await
            .with_context(|| format!("failed to bind {addr}"))?;

        info!("AquaLux Spa API listening on {}", addr);
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;
        info!("server stopped");
        Ok(())
    }
}

/// Build the full router.
///
/// Guard order on protected routes: `require_auth` always runs first, then
/// `require_admin` where present, then the handler.
pub fn create_router(state: AppState) -> Router {
    let auth_layer = middleware::from_fn_with_state(state.clone(), require_auth);

    let public = Router::new()
        .route("/api/health", get(health::health_check))
        .route("/api/services", get(services::list_services))
        .route("/api/services/:id", get(services::get_service))
        .merge(create_auth_routes(state.clone()));

    let authenticated = Router::new()
        .route("/api/users/:id", get(users::get_user).put(users::update_user))
        .route("/api/bookings", post(bookings::create_booking))
        .route("/api/bookings/my", get(bookings::my_bookings))
        .route(
            "/api/bookings/:id",
            get(bookings::get_booking)
                .put(bookings::update_booking)
                .delete(bookings::delete_booking),
        )
        .route_layer(auth_layer.clone());

    let admin = Router::new()
        .route("/api/users", get(users::list_users))
        .route("/api/users/:id", delete(users::delete_user))
        .route("/api/services", post(services::create_service))
        .route(
            "/api/services/:id",
            put(services::update_service).delete(services::delete_service),
        )
        .route("/api/bookings", get(bookings::list_bookings))
        .route_layer(middleware::from_fn(require_admin))
        .route_layer(auth_layer);

    let cors = cors_layer(&state.config.server.cors_allow_origin);

    Router::new()
        .merge(public)
        .merge(authenticated)
        .merge(admin)
        .fallback(route_not_found)
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(handle_layer_error))
                .layer(ConcurrencyLimitLayer::new(MAX_CONCURRENCY))
                .layer(RequestBodyLimitLayer::new(MAX_BODY_SIZE))
                .layer(TimeoutLayer::new(REQUEST_TIMEOUT))
                .layer(TraceLayer::new_for_http())
                .layer(CatchPanicLayer::custom(handle_panic)),
        )
        .layer(cors)
}

/// `*` allows any origin; otherwise a comma separated allow-list.
fn cors_layer(allow_origin: &str) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .max_age(CORS_MAX_AGE);

    if allow_origin.trim() == "*" {
        return layer.allow_origin(AnyOrigin);
    }

    let origins: Vec<HeaderValue> = allow_origin
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .filter_map(|s| match HeaderValue::from_str(s) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = s, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    info!(count = origins.len(), "CORS allow-list configured");
    layer.allow_origin(AllowOrigin::list(origins))
}

async fn route_not_found(uri: Uri) -> ApiError {
    let path = uri.path_and_query().map_or(uri.path(), |pq| pq.as_str());
    ApiError::RouteNotFound(path.to_string())
}

async fn handle_layer_error(err: BoxError) -> (StatusCode, Json<ErrorResponse>) {
    if err.is::<tower::timeout::error::Elapsed>() {
        (
            StatusCode::REQUEST_TIMEOUT,
            Json(ErrorResponse::new("Request timed out")),
        )
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ErrorResponse::new("Service overloaded")),
        )
    }
}

fn handle_panic(payload: Box<dyn Any + Send + 'static>) -> Response {
    let detail = payload
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| payload.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic payload");
    error!(panic = detail, "handler panicked");

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse::new("Something went wrong!")),
    )
        .into_response()
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
