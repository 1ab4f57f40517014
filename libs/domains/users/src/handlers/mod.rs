//! HTTP controllers.
//!
//! Each API version is an independent, thin translation layer over the same
//! [`UserService`](crate::service::UserService). The surfaces differ on purpose:
//! v2 drops `PUT` and adds pagination plus its own health check.

pub mod v1;
pub mod v2;

/// OpenAPI tag shared by both versions
pub const TAG: &str = "users";
