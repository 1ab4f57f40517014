use axum::http::{HeaderValue, Method, header};
use core_config::cors::CorsConfig;
use std::io;
use std::time::Duration;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

const ALLOWED_METHODS: [Method; 5] = [
    Method::GET,
    Method::POST,
    Method::PUT,
    Method::DELETE,
    Method::OPTIONS,
];

/// Builds the CORS layer for the configured origins.
///
/// - `CorsConfig::Any`: any origin, no credentials (a wildcard origin cannot
///   be combined with credentials).
/// - `CorsConfig::Origins`: exact origin list, credentials allowed.
///
/// # Errors
/// Returns `InvalidInput` if an origin is not a valid header value.
pub fn create_cors_layer(config: &CorsConfig) -> io::Result<CorsLayer> {
    let layer = CorsLayer::new()
        .allow_methods(ALLOWED_METHODS)
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT, header::AUTHORIZATION])
        .max_age(Duration::from_secs(3600));

    match config {
        CorsConfig::Any => Ok(layer.allow_origin(Any)),
        CorsConfig::Origins(origins) => {
            let allowed = origins
                .iter()
                .map(|o| o.parse::<HeaderValue>())
                .collect::<Result<Vec<_>, _>>()
                .map_err(|e| {
                    io::Error::new(
                        io::ErrorKind::InvalidInput,
                        format!("Invalid CORS origin: {}", e),
                    )
                })?;

            Ok(layer
                .allow_origin(AllowOrigin::list(allowed))
                .allow_credentials(true))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cors_layer_accepts_origin_list() {
        let config = CorsConfig::Origins(vec!["http://localhost:3000".to_string()]);
        assert!(create_cors_layer(&config).is_ok());
    }

    #[test]
    fn test_cors_layer_rejects_invalid_origin() {
        let config = CorsConfig::Origins(vec!["bad\norigin".to_string()]);
        let err = create_cors_layer(&config).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    }
}
