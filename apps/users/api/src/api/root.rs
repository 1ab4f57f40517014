use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;
use utoipa::ToSchema;

use crate::state::AppState;

/// Entry points of the mounted API versions
#[derive(Clone, Copy, Debug, Serialize, ToSchema)]
pub struct ApiLinks {
    pub users_v1: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub users_v2: Option<&'static str>,
}

/// Service overview returned at `/`
#[derive(Clone, Copy, Debug, Serialize, ToSchema)]
pub struct ApiInfo {
    pub name: &'static str,
    pub version: &'static str,
    pub docs: &'static str,
    pub api: ApiLinks,
}

impl ApiInfo {
    pub fn from_state(state: &AppState) -> Self {
        Self {
            name: state.config.app.name,
            version: state.config.app.version,
            docs: "/swagger-ui",
            api: ApiLinks {
                users_v1: "/api/v1/users",
                users_v2: state
                    .config
                    .surface
                    .includes_v2()
                    .then_some("/api/v2/users"),
            },
        }
    }
}

async fn root(State(info): State<ApiInfo>) -> Json<ApiInfo> {
    Json(info)
}

/// Creates a router with the `/` overview endpoint
pub fn router(state: &AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .with_state(ApiInfo::from_state(state))
}
