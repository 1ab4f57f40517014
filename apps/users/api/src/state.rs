//! Application state management.
//!
//! The state owns the one and only user store. Both controller versions are
//! built from the same `users` handle, so they observe the same data.

use domain_users::{InMemoryUserRepository, UserService};
use std::sync::Arc;

use crate::config::Config;

/// Concrete service type wired by this binary
pub type Users = UserService<InMemoryUserRepository>;

/// Shared application state.
///
/// Cloning is cheap: the service sits behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration loaded from environment variables
    pub config: Config,
    /// User use cases over the process-wide in-memory store
    pub users: Arc<Users>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let repository = InMemoryUserRepository::new();

        Self {
            config,
            users: Arc::new(UserService::new(repository)),
        }
    }
}
