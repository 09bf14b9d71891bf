//! OpenAPI documentation, served as JSON at `/api-docs/openapi.json`.

use crate::controllers::HealthResponse;
use axum::Json;
use messenger_core::{AddressId, ErrorResponse, FieldError, UserId, UserRole};
use messenger_service::{
    AddressResponse, CreateAddressRequest, CreateUserRequest, UserPageResponse, UserResponse,
};
use utoipa::OpenApi;

/// OpenAPI documentation for the messenger API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Messenger Directory API",
        version = "1.0.0",
        description = "Users, their postal addresses and filtered user listings"
    ),
    paths(
        crate::controllers::user_controller::find_all,
        crate::controllers::user_controller::get_user_by_id,
        crate::controllers::user_controller::get_user_by_login,
        crate::controllers::user_controller::exists_by_id,
        crate::controllers::user_controller::exists_by_login,
        crate::controllers::user_controller::get_address_list_by_user_id,
        crate::controllers::user_controller::save,
        crate::controllers::user_controller::add_address_by_user_id,
        crate::controllers::user_controller::delete_user_by_id,
        crate::controllers::user_controller::delete_address_by_id,
        crate::controllers::health_controller::health_check,
    ),
    components(
        schemas(
            UserId,
            AddressId,
            UserRole,
            ErrorResponse,
            FieldError,
            CreateUserRequest,
            CreateAddressRequest,
            UserResponse,
            AddressResponse,
            UserPageResponse,
            HealthResponse,
        )
    ),
    tags(
        (name = "users", description = "User endpoints"),
        (name = "addresses", description = "Address endpoints"),
        (name = "health", description = "Health check endpoints")
    )
)]
pub struct ApiDoc;

/// Serves the generated OpenAPI document.
pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
