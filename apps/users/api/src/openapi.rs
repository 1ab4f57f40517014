use domain_users::handlers::{v1, v2};
use utoipa::OpenApi;

/// Documentation for the full surface (v1 and v2)
#[derive(OpenApi)]
#[openapi(
    components(
        schemas(axum_helpers::ErrorResponse)
    ),
    info(
        title = "Users API",
        version = "1.0.0",
        description = "User management through two versioned surfaces sharing one store"
    ),
    servers(
        (url = "/api", description = "API base path")
    ),
    nest(
        (path = "/v1/users", api = v1::ApiDoc),
        (path = "/v2/users", api = v2::ApiDoc)
    )
)]
pub struct ApiDoc;

/// Documentation when only v1 is mounted
#[derive(OpenApi)]
#[openapi(
    components(
        schemas(axum_helpers::ErrorResponse)
    ),
    info(
        title = "Users API (v1)",
        version = "1.0.0",
        description = "User management, v1 surface only"
    ),
    servers(
        (url = "/api", description = "API base path")
    ),
    nest(
        (path = "/v1/users", api = v1::ApiDoc)
    )
)]
pub struct V1ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_doc_lists_both_versions() {
        let doc = ApiDoc::openapi();
        let paths: Vec<_> = doc.paths.paths.keys().cloned().collect();

        assert!(paths.iter().any(|p| p.starts_with("/v1/users")));
        assert!(paths.iter().any(|p| p == "/v2/users/health"));
    }

    #[test]
    fn test_v1_doc_has_no_v2_paths() {
        let doc = V1ApiDoc::openapi();

        assert!(doc.paths.paths.keys().all(|p| p.starts_with("/v1/users")));
    }
}
