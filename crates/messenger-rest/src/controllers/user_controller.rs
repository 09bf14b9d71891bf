//! User and address controller.

use crate::{
    extractors::{ListUsersQuery, ValidatedJson},
    responses::{created, no_content, ok, ApiResult, AppError, CreatedResult},
    state::AppState,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Router,
};
use messenger_core::{AddressId, MessengerError, UserId};
use messenger_service::{
    AddressResponse, CreateAddressRequest, CreateUserRequest, UserPageResponse, UserResponse,
};
use tracing::debug;

/// Creates the user router, nested under `/api/users`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(find_all).post(save))
        .route("/:id", get(get_user_by_id).delete(delete_user_by_id))
        .route("/login/:login", get(get_user_by_login))
        .route("/existence/id/:id", get(exists_by_id))
        .route("/existence/login/:login", get(exists_by_login))
        .route("/address", post(add_address_by_user_id))
        .route(
            "/address/:id",
            get(get_address_list_by_user_id).delete(delete_address_by_id),
        )
}

/// List users, optionally restricted to owners of matching addresses.
#[utoipa::path(
    get,
    path = "/api/users",
    tag = "users",
    params(ListUsersQuery),
    responses(
        (status = 200, description = "One page of users", body = UserPageResponse),
        (status = 400, description = "Invalid page parameters")
    )
)]
pub async fn find_all(
    State(state): State<AppState>,
    Query(query): Query<ListUsersQuery>,
) -> ApiResult<UserPageResponse> {
    let (params, filter) = query.into_parts()?;
    debug!(
        "List users request: page {} size {}",
        params.page_number, params.page_size
    );

    let response = state.user_service.find_all(params, filter).await?;
    ok(response)
}

/// Get a user by id.
#[utoipa::path(
    get,
    path = "/api/users/{id}",
    tag = "users",
    params(("id" = i64, Path, description = "User id")),
    responses(
        (status = 200, description = "User found", body = UserResponse),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_user_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<UserResponse> {
    debug!("Get user request: {}", id);

    let user_id = parse_user_id(&id)?;
    let response = state.user_service.get_user_by_id(user_id).await?;
    ok(response)
}

/// Get a user by login.
#[utoipa::path(
    get,
    path = "/api/users/login/{login}",
    tag = "users",
    params(("login" = String, Path, description = "User login")),
    responses(
        (status = 200, description = "User found", body = UserResponse),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_user_by_login(
    State(state): State<AppState>,
    Path(login): Path<String>,
) -> ApiResult<UserResponse> {
    debug!("Get user by login request: {}", login);

    let response = state.user_service.get_user_by_login(&login).await?;
    ok(response)
}

/// Check whether a user id exists.
#[utoipa::path(
    get,
    path = "/api/users/existence/id/{id}",
    tag = "users",
    params(("id" = i64, Path, description = "User id")),
    responses((status = 200, description = "Existence flag", body = bool))
)]
pub async fn exists_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<bool> {
    let user_id = parse_user_id(&id)?;
    ok(state.user_service.exists_by_id(user_id).await?)
}

/// Check whether a login is taken.
#[utoipa::path(
    get,
    path = "/api/users/existence/login/{login}",
    tag = "users",
    params(("login" = String, Path, description = "User login")),
    responses((status = 200, description = "Existence flag", body = bool))
)]
pub async fn exists_by_login(
    State(state): State<AppState>,
    Path(login): Path<String>,
) -> ApiResult<bool> {
    ok(state.user_service.exists_by_login(&login).await?)
}

/// List the addresses of a user.
#[utoipa::path(
    get,
    path = "/api/users/address/{id}",
    tag = "addresses",
    params(("id" = i64, Path, description = "Owner user id")),
    responses((status = 200, description = "Addresses of the user", body = [AddressResponse]))
)]
pub async fn get_address_list_by_user_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Vec<AddressResponse>> {
    let user_id = parse_user_id(&id)?;
    let response = state.user_service.get_address_list_by_user_id(user_id).await?;
    ok(response)
}

/// Create a user.
#[utoipa::path(
    post,
    path = "/api/users",
    tag = "users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = UserResponse),
        (status = 400, description = "Invalid request or login taken")
    )
)]
pub async fn save(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<CreateUserRequest>,
) -> CreatedResult<UserResponse> {
    debug!("Create user request: {:?}", request.login);

    let response = state.user_service.save(request).await?;
    created(response)
}

/// Attach an address to an existing user.
#[utoipa::path(
    post,
    path = "/api/users/address",
    tag = "addresses",
    request_body = CreateAddressRequest,
    responses(
        (status = 201, description = "Address created", body = AddressResponse),
        (status = 400, description = "Invalid request"),
        (status = 404, description = "Owner not found")
    )
)]
pub async fn add_address_by_user_id(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<CreateAddressRequest>,
) -> CreatedResult<AddressResponse> {
    debug!("Add address request for user: {:?}", request.user_id);

    let response = state.user_service.add_address_by_user_id(request).await?;
    created(response)
}

/// Delete a user and all of its addresses.
#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    tag = "users",
    params(("id" = i64, Path, description = "User id")),
    responses(
        (status = 204, description = "User deleted"),
        (status = 404, description = "User not found")
    )
)]
pub async fn delete_user_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    debug!("Delete user request: {}", id);

    let user_id = parse_user_id(&id)?;
    state.user_service.delete_user_by_id(user_id).await?;

    Ok(no_content())
}

/// Delete an address.
#[utoipa::path(
    delete,
    path = "/api/users/address/{id}",
    tag = "addresses",
    params(("id" = i64, Path, description = "Address id")),
    responses(
        (status = 204, description = "Address deleted"),
        (status = 404, description = "Address not found")
    )
)]
pub async fn delete_address_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    debug!("Delete address request: {}", id);

    let address_id = AddressId::parse(&id)
        .map_err(|_| MessengerError::type_mismatch("id", id.as_str(), "integer"))?;
    state.user_service.delete_address_by_id(address_id).await?;

    Ok(no_content())
}

fn parse_user_id(id: &str) -> Result<UserId, AppError> {
    UserId::parse(id).map_err(|_| AppError(MessengerError::type_mismatch("id", id, "integer")))
}
