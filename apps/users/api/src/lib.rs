//! Users API service.
//!
//! Wires the in-memory user store into the v1 and v2 controllers and wraps
//! them with the shared server setup from `axum-helpers`.

use axum::Router;
use axum_helpers::server::{create_router, health_router};
use std::io;

pub mod api;
pub mod config;
pub mod openapi;
pub mod state;

use config::ApiSurface;
use state::AppState;

/// Builds the complete application router for `state`.
///
/// - `/api/v1/users` always, `/api/v2/users` unless the surface is v1-only
/// - `/health` liveness and `/` overview
/// - docs for exactly the mounted versions
pub async fn build_app(state: &AppState) -> io::Result<Router> {
    let api_routes = api::routes(state);
    let cors = &state.config.cors;

    // create_router adds docs/middleware to our composed routes
    let router = match state.config.surface {
        ApiSurface::Full => create_router::<openapi::ApiDoc>(api_routes, cors).await?,
        ApiSurface::V1Only => create_router::<openapi::V1ApiDoc>(api_routes, cors).await?,
    };

    Ok(router
        .merge(health_router(state.config.app))
        .merge(api::root::router(state)))
}
