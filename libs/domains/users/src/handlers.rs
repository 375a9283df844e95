use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use axum_helpers::{
    ValidatedJson,
    errors::responses::{
        BadRequestResponse, BadRequestValidationResponse, InternalServerErrorResponse,
        NotFoundResponse, UnauthorizedResponse,
    },
};
use domain_geo::{ClassifiedResult, DeleteConfirmation};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::models::{CreateUser, LoginRequest, SessionToken, UpdateUser, UserResponse};
use crate::repository::UserRepository;
use crate::service::UserService;
use crate::session::SessionService;

/// OpenAPI documentation for the Users API
#[derive(OpenApi)]
#[openapi(
    paths(list_users, create_user, get_user, update_user, delete_user),
    components(
        schemas(UserResponse, CreateUser, UpdateUser, DeleteConfirmation),
        responses(
            BadRequestResponse,
            BadRequestValidationResponse,
            NotFoundResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = "Users", description = "Accounts with a geocoded address")
    )
)]
pub struct ApiDoc;

/// OpenAPI documentation for the Sessions API
#[derive(OpenApi)]
#[openapi(
    paths(create_session),
    components(
        schemas(LoginRequest, SessionToken),
        responses(
            BadRequestResponse,
            NotFoundResponse,
            UnauthorizedResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = "Sessions", description = "Bearer token issuance")
    )
)]
pub struct SessionsApiDoc;

/// Create the users router with all HTTP endpoints
pub fn router<R: UserRepository + 'static>(service: UserService<R>) -> Router {
    Router::new()
        .route("/", get(list_users).post(create_user))
        .route("/{id}", get(get_user).put(update_user).delete(delete_user))
        .with_state(Arc::new(service))
}

/// Create the sessions router
pub fn sessions_router<R: UserRepository + 'static>(service: SessionService<R>) -> Router {
    Router::new()
        .route("/", post(create_session))
        .with_state(Arc::new(service))
}

/// List all users
#[utoipa::path(
    get,
    path = "",
    tag = "Users",
    responses(
        (status = 200, description = "List of users", body = Vec<UserResponse>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_users<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
) -> ClassifiedResult<Json<Vec<UserResponse>>> {
    let users = service.get_all_users().await?;
    Ok(Json(users))
}

/// Create a new user
///
/// Exactly one of `address` or `coordinates` must be supplied; the other is
/// resolved through the geocoder.
#[utoipa::path(
    post,
    path = "",
    tag = "Users",
    request_body = CreateUser,
    responses(
        (status = 201, description = "User created successfully", body = UserResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_user<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    ValidatedJson(input): ValidatedJson<CreateUser>,
) -> ClassifiedResult<impl IntoResponse> {
    let user = service.create_user(input).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// Get a user by ID
#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Users",
    params(
        ("id" = String, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User found", body = UserResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_user<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    Path(id): Path<String>,
) -> ClassifiedResult<Json<UserResponse>> {
    let user = service.get_user_by_id(&id).await?;
    Ok(Json(user))
}

/// Update a user
#[utoipa::path(
    put,
    path = "/{id}",
    tag = "Users",
    params(
        ("id" = String, Path, description = "User ID")
    ),
    request_body = UpdateUser,
    responses(
        (status = 200, description = "User updated successfully", body = UserResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_user<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    Path(id): Path<String>,
    ValidatedJson(input): ValidatedJson<UpdateUser>,
) -> ClassifiedResult<Json<UserResponse>> {
    let user = service.update_user(&id, input).await?;
    Ok(Json(user))
}

/// Delete a user and the regions they own
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Users",
    params(
        ("id" = String, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User deleted", body = DeleteConfirmation),
        (status = 400, response = BadRequestResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_user<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    Path(id): Path<String>,
) -> ClassifiedResult<Json<DeleteConfirmation>> {
    let confirmation = service.delete_user(&id).await?;
    Ok(Json(confirmation))
}

/// Log in with email and password
#[utoipa::path(
    post,
    path = "",
    tag = "Sessions",
    request_body = LoginRequest,
    responses(
        (status = 201, description = "Session created", body = SessionToken),
        (status = 400, response = BadRequestResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_session<R: UserRepository>(
    State(service): State<Arc<SessionService<R>>>,
    ValidatedJson(input): ValidatedJson<LoginRequest>,
) -> ClassifiedResult<impl IntoResponse> {
    let token = service.login(input).await?;
    Ok((StatusCode::CREATED, Json(token)))
}
