use axum::Router;

pub mod root;
pub mod users;

/// Creates the API routes without the `/api` prefix.
/// The `/api` prefix will be added by the `create_router` helper.
///
/// Returns a stateless Router (all sub-routers have state already applied).
pub fn routes(state: &crate::state::AppState) -> Router {
    let router = Router::new().nest("/v1/users", users::v1_router(state));

    if state.config.surface.includes_v2() {
        router.nest("/v2/users", users::v2_router(state))
    } else {
        router
    }
}
