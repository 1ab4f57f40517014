use crate::{env_or_default, ConfigError, FromEnv};

/// Which origins may call the API from a browser.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CorsConfig {
    /// `*` - any origin, no credentials
    Any,
    /// Explicit list of origins, e.g. `http://localhost:3000`
    Origins(Vec<String>),
}

impl FromEnv for CorsConfig {
    /// Reads `CORS_ALLOWED_ORIGINS` as a comma separated list (default `*`).
    fn from_env() -> Result<Self, ConfigError> {
        Self::parse(&env_or_default("CORS_ALLOWED_ORIGINS", "*"))
    }
}

impl CorsConfig {
    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        let origins: Vec<String> = raw
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();

        if origins.is_empty() {
            return Err(ConfigError::ParseError {
                key: "CORS_ALLOWED_ORIGINS".to_string(),
                details: "at least one origin (or '*') is required".to_string(),
            });
        }

        if origins.iter().any(|o| o == "*") {
            Ok(CorsConfig::Any)
        } else {
            Ok(CorsConfig::Origins(origins))
        }
    }
}

impl Default for CorsConfig {
    fn default() -> Self {
        CorsConfig::Any
    }
}
