use core_config::{
    AppInfo, ConfigError, FromEnv, app_info, cors::CorsConfig, env_parse_or, server::ServerConfig,
};
use std::fmt;
use std::str::FromStr;

// Re-export Environment for use in other modules
pub use core_config::Environment;

/// Which controller versions the process mounts
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ApiSurface {
    /// v1 and v2 side by side
    #[default]
    Full,
    /// Only the v1 controller
    V1Only,
}

impl ApiSurface {
    pub fn includes_v2(&self) -> bool {
        matches!(self, ApiSurface::Full)
    }
}

impl FromStr for ApiSurface {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "full" => Ok(ApiSurface::Full),
            "v1" => Ok(ApiSurface::V1Only),
            other => Err(format!("expected 'full' or 'v1', got '{}'", other)),
        }
    }
}

impl fmt::Display for ApiSurface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiSurface::Full => write!(f, "full"),
            ApiSurface::V1Only => write!(f, "v1"),
        }
    }
}

impl FromEnv for ApiSurface {
    fn from_env() -> Result<Self, ConfigError> {
        env_parse_or("API_SURFACE", ApiSurface::Full)
    }
}

/// Application-specific configuration
/// Composes shared config components from the `config` library
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub server: ServerConfig,
    pub cors: CorsConfig,
    pub environment: Environment,
    pub surface: ApiSurface,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        let environment = Environment::from_env();
        let server = ServerConfig::from_env()?; // Uses defaults: HOST=0.0.0.0, PORT=8080
        let cors = CorsConfig::from_env()?; // Defaults to any origin
        let surface = ApiSurface::from_env()?;

        Ok(Self {
            app: app_info!(),
            server,
            cors,
            environment,
            surface,
        })
    }
}
