use axum::{
    Json, Router,
    extract::{Query, State, rejection::QueryRejection},
    http::{HeaderName, HeaderValue, StatusCode},
    response::IntoResponse,
    routing::get,
};
use axum_helpers::{
    AppError, IdPath, ValidatedJson,
    errors::responses::{
        BadRequestIdResponse, BadRequestValidationResponse, DuplicateResourceResponse,
        InternalServerErrorResponse, NotFoundResponse,
    },
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::{IntoParams, OpenApi, ToSchema};
use validator::Validate;

use super::TAG;
use crate::error::UserResult;
use crate::models::{CreateUser, NAME_MAX_CHARS, Pagination, User, UserId};
use crate::repository::UserRepository;
use crate::service::UserService;

/// Version reported by the v2 health endpoint
pub const API_VERSION: &str = "2.0.0";

pub const DEFAULT_PAGE_LIMIT: usize = 10;
pub const MAX_PAGE_LIMIT: usize = 100;

/// Response header carrying the size of the whole collection
pub const TOTAL_COUNT_HEADER: HeaderName = HeaderName::from_static("x-total-count");

/// OpenAPI documentation for Users API v2
#[derive(OpenApi)]
#[openapi(
    paths(health, list_users, create_user, get_user, delete_user),
    components(
        schemas(User, UserId, CreateUserRequestV2, HealthStatus),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            BadRequestIdResponse,
            DuplicateResourceResponse,
            InternalServerErrorResponse
        )
    ),
    tags((name = TAG, description = "User management endpoints"))
)]
pub struct ApiDoc;

/// Shortest name v2 accepts, counted after trimming
pub const MIN_NAME_CHARS: usize = 2;

/// Name length is measured on the trimmed value that will be stored
fn validate_trimmed_name(name: &str) -> Result<(), validator::ValidationError> {
    let len = name.trim().chars().count();
    if !(MIN_NAME_CHARS..=NAME_MAX_CHARS).contains(&len) {
        return Err(validator::ValidationError::new("length"));
    }
    Ok(())
}

/// Request body for creating a user through v2
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateUserRequestV2 {
    /// 2 to 100 characters once surrounding whitespace is removed
    #[validate(custom(function = "validate_trimmed_name"))]
    #[schema(min_length = 2, max_length = 100)]
    pub name: String,
    #[validate(length(min = 1, max = 255))]
    pub email: String,
}

impl From<CreateUserRequestV2> for CreateUser {
    fn from(req: CreateUserRequestV2) -> Self {
        CreateUser {
            name: req.name,
            email: req.email,
        }
    }
}

/// Pagination query parameters
#[derive(Debug, Clone, Copy, Default, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListParams {
    /// Number of users to skip (default 0)
    pub offset: Option<usize>,
    /// Maximum number of users to return (default 10, at most 100)
    #[validate(range(min = 1, max = 100))]
    pub limit: Option<usize>,
}

impl From<ListParams> for Pagination {
    fn from(params: ListParams) -> Self {
        Pagination::page(
            params.offset.unwrap_or(0),
            params.limit.unwrap_or(DEFAULT_PAGE_LIMIT),
        )
    }
}

/// Liveness payload of the v2 surface
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthStatus {
    pub status: String,
    pub version: String,
    pub timestamp: DateTime<Utc>,
}

/// Create the v2 router over a shared service.
///
/// There is no `PUT /{id}`; updates are only offered by v1.
pub fn router<R: UserRepository + 'static>(service: Arc<UserService<R>>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/", get(list_users).post(create_user))
        .route("/{id}", get(get_user).delete(delete_user))
        .with_state(service)
}

/// Liveness check; never touches the repository
#[utoipa::path(
    get,
    path = "/health",
    tag = TAG,
    operation_id = "health_v2",
    responses(
        (status = 200, description = "Service is up", body = HealthStatus)
    )
)]
async fn health() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok".to_string(),
        version: API_VERSION.to_string(),
        timestamp: Utc::now(),
    })
}

/// List users page by page
#[utoipa::path(
    get,
    path = "",
    tag = TAG,
    operation_id = "list_users_v2",
    params(ListParams),
    responses(
        (status = 200, description = "One page of users in creation order", body = Vec<User>,
            headers(("x-total-count" = usize, description = "Total number of users"))),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_users<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Query(params) = params.map_err(|e| AppError::BadRequest(e.body_text()))?;
    params.validate()?;

    let (users, total) = service.list_users_page(params.into()).await?;

    let total = HeaderValue::from(total);
    Ok(([(TOTAL_COUNT_HEADER, total)], Json(users)))
}

/// Create a new user
#[utoipa::path(
    post,
    path = "",
    tag = TAG,
    operation_id = "create_user_v2",
    request_body = CreateUserRequestV2,
    responses(
        (status = 201, description = "User created successfully", body = User),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_user<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    ValidatedJson(input): ValidatedJson<CreateUserRequestV2>,
) -> UserResult<impl IntoResponse> {
    let user = service.create_user(input.into()).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// Get a user by ID
#[utoipa::path(
    get,
    path = "/{id}",
    tag = TAG,
    operation_id = "get_user_v2",
    params(
        ("id" = u64, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User found", body = User),
        (status = 400, response = BadRequestIdResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_user<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    IdPath(id): IdPath<UserId>,
) -> UserResult<Json<User>> {
    let user = service.get_user(id).await?;
    Ok(Json(user))
}

/// Delete a user
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = TAG,
    operation_id = "delete_user_v2",
    params(
        ("id" = u64, Path, description = "User ID")
    ),
    responses(
        (status = 204, description = "User deleted successfully"),
        (status = 400, response = BadRequestIdResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_user<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    IdPath(id): IdPath<UserId>,
) -> UserResult<StatusCode> {
    service.delete_user(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
