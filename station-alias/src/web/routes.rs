//! HTTP route handlers.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;
use tracing::debug;

use crate::alias::ResolverError;
use crate::domain::{PoolCode, StationKey};

use super::dto::{AliasDump, MessageResponse};
use super::error::AppError;
use super::extract::{Authenticated, StationPath};
use super::state::AppState;

/// Create the application router.
///
/// Alias routes are nested under `/{api_version}`.
pub fn create_router(state: AppState) -> Router {
    let versioned = Router::new()
        .route("/credentials-check", get(credentials_check))
        .route("/station-alias", get(list_aliases))
        .route(
            "/station-alias/:pool_code/:station_name",
            get(get_station_alias).delete(delete_station_alias),
        )
        .route(
            "/station-alias/:pool_code/:station_name/:station_alias",
            post(create_station_alias).put(update_station_alias),
        );

    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .nest(&format!("/{}", state.api_version), versioned)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Liveness message.
async fn root() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: "Server is running".to_string(),
    })
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Greet the authenticated caller.
async fn credentials_check(Authenticated(principal): Authenticated) -> Json<MessageResponse> {
    Json(MessageResponse {
        message: format!("Welcome, {}!", principal.username),
    })
}

/// Every aliased station.
async fn list_aliases(
    Authenticated(_): Authenticated,
    State(state): State<AppState>,
) -> Json<Vec<AliasDump>> {
    Json(
        state
            .resolver
            .list()
            .into_iter()
            .map(AliasDump::from)
            .collect(),
    )
}

/// Name to report for a station; the station name itself if no alias is defined.
async fn get_station_alias(
    Authenticated(_): Authenticated,
    State(state): State<AppState>,
    StationPath((pool_code, station_name)): StationPath<(PoolCode, String)>,
) -> Result<Json<AliasDump>, AppError> {
    let key = StationKey::new(pool_code, station_name)?;
    let name = state.resolver.resolve(&key);
    Ok(Json(AliasDump::resolved(&key, name)))
}

/// Define a new alias for a station.
async fn create_station_alias(
    Authenticated(principal): Authenticated,
    State(state): State<AppState>,
    StationPath((pool_code, station_name, station_alias)): StationPath<(PoolCode, String, String)>,
) -> Result<(StatusCode, Json<AliasDump>), AppError> {
    let key = StationKey::new(pool_code, station_name)?;
    debug!(user = %principal.username, station = %key, "create alias");

    let resolver = state.resolver.clone();
    let record = run_blocking(move || resolver.create(key, station_alias)).await?;
    Ok((StatusCode::CREATED, Json(record.into())))
}

/// Replace the alias of a station.
async fn update_station_alias(
    Authenticated(principal): Authenticated,
    State(state): State<AppState>,
    StationPath((pool_code, station_name, station_alias)): StationPath<(PoolCode, String, String)>,
) -> Result<Json<AliasDump>, AppError> {
    let key = StationKey::new(pool_code, station_name)?;
    debug!(user = %principal.username, station = %key, "update alias");

    let resolver = state.resolver.clone();
    let record = run_blocking(move || resolver.update(key, station_alias)).await?;
    Ok(Json(record.into()))
}

/// Remove the alias of a station, returning the removed value.
async fn delete_station_alias(
    Authenticated(principal): Authenticated,
    State(state): State<AppState>,
    StationPath((pool_code, station_name)): StationPath<(PoolCode, String)>,
) -> Result<Json<AliasDump>, AppError> {
    let key = StationKey::new(pool_code, station_name)?;
    debug!(user = %principal.username, station = %key, "delete alias");

    let resolver = state.resolver.clone();
    let record = run_blocking(move || resolver.delete(key)).await?;
    Ok(Json(record.into()))
}

/// Run a resolver mutation on the blocking pool; store writes are synchronous.
async fn run_blocking<T, F>(f: F) -> Result<T, AppError>
where
    F: FnOnce() -> Result<T, ResolverError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| AppError::Internal {
            message: format!("resolver task failed: {e}"),
        })?
        .map_err(AppError::from)
}
