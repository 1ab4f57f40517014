use axum::Router;
use domain_users::handlers;

use crate::state::AppState;

pub fn v1_router(state: &AppState) -> Router {
    handlers::v1::router(state.users.clone())
}

pub fn v2_router(state: &AppState) -> Router {
    handlers::v2::router(state.users.clone())
}
