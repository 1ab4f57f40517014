//! Users Domain
//!
//! A single `User` entity exposed through two versioned HTTP surfaces that
//! share one application service and one store.
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────────────┐
//! │   Handlers (v1, v2)    │  ← HTTP endpoints, error → status mapping
//! └───────────┬────────────┘
//!             │
//! ┌───────────▼────────────┐
//! │        Service         │  ← Use cases, transport agnostic
//! └───────────┬────────────┘
//!             │
//! ┌───────────▼────────────┐
//! │  Repository (port)     │  ← Trait + in-memory adapter
//! └───────────┬────────────┘
//!             │
//! ┌───────────▼────────────┐
//! │        Models          │  ← Entity, validation, inputs
//! └────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use domain_users::{handlers, InMemoryUserRepository, UserService};
//!
//! // One store, one service, two surfaces
//! let service = Arc::new(UserService::new(InMemoryUserRepository::new()));
//!
//! let router = axum::Router::new()
//!     .nest("/v1/users", handlers::v1::router(service.clone()))
//!     .nest("/v2/users", handlers::v2::router(service));
//! ```

pub mod error;
pub mod handlers;
pub mod models;
pub mod repository;
pub mod service;

// Re-export commonly used types
pub use error::{UserError, UserResult};
pub use models::{CreateUser, NewUser, Pagination, UpdateUser, User, UserId};
pub use repository::{InMemoryUserRepository, UserRepository};
pub use service::UserService;
