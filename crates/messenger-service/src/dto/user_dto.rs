//! User-related DTOs.

use chrono::{DateTime, Utc};
use messenger_core::{rules, User, UserId, UserRole};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Request to create a new user.
///
/// Fields are optional at the wire level so that a missing field is reported
/// as a validation failure against that field.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    #[validate(
        required(message = "login is required"),
        custom(function = "rules::not_blank", message = "login must not be blank"),
        length(min = 1, max = 50, message = "login must be 1-50 characters")
    )]
    pub login: Option<String>,

    #[validate(
        required(message = "password is required"),
        custom(function = "rules::not_blank", message = "password must not be blank"),
        length(min = 6, message = "password must be at least 6 characters")
    )]
    pub password: Option<String>,

    #[validate(required(message = "role is required"))]
    pub role: Option<UserRole>,
}

impl CreateUserRequest {
    /// Builds a complete request.
    #[must_use]
    pub fn new(login: impl Into<String>, password: impl Into<String>, role: UserRole) -> Self {
        Self {
            login: Some(login.into()),
            password: Some(password.into()),
            role: Some(role),
        }
    }
}

/// User response DTO. The stored password never leaves the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: UserId,
    pub login: String,
    pub role: UserRole,
    pub create_date: DateTime<Utc>,
    pub last_visit_date: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            login: user.login,
            role: user.role,
            create_date: user.create_date,
            last_visit_date: user.last_visit_date,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use messenger_core::{MessengerError, ValidateExt};

    fn failed_fields(request: &CreateUserRequest) -> Vec<String> {
        match request.validate_request() {
            Err(MessengerError::Validation { fields, .. }) => {
                fields.into_iter().map(|f| f.field).collect()
            }
            other => panic!("expected validation failure, got {other:?}"),
        }
    }

    #[test]
    fn test_valid_request() {
        let request = CreateUserRequest::new("testLogin", "secret1", UserRole::User);
        assert!(request.validate_request().is_ok());
    }

    #[test]
    fn test_missing_fields_are_reported() {
        let fields = failed_fields(&CreateUserRequest::default());
        assert_eq!(fields, vec!["login", "password", "role"]);
    }

    #[test]
    fn test_blank_login_and_short_password() {
        let request = CreateUserRequest::new("   ", "12345", UserRole::Admin);
        let fields = failed_fields(&request);
        assert!(fields.contains(&"login".to_string()));
        assert!(fields.contains(&"password".to_string()));
    }

    #[test]
    fn test_login_too_long() {
        let request = CreateUserRequest::new("x".repeat(51), "secret1", UserRole::User);
        assert_eq!(failed_fields(&request), vec!["login"]);
    }

    #[test]
    fn test_deserialize_camel_case() {
        let request: CreateUserRequest =
            serde_json::from_str(r#"{"login":"a","password":"secret1","role":"ADMIN"}"#).unwrap();
        assert_eq!(request.role, Some(UserRole::Admin));
    }

    #[test]
    fn test_response_hides_password() {
        let now = Utc::now();
        let user = User {
            id: UserId(5),
            login: "testLogin".to_string(),
            password: "$argon2id$...".to_string(),
            role: UserRole::User,
            create_date: now,
            last_visit_date: now,
        };

        let json = serde_json::to_value(UserResponse::from(user)).unwrap();
        assert_eq!(json["id"], 5);
        assert_eq!(json["role"], "USER");
        assert!(json.get("password").is_none());
        assert!(json.get("createDate").is_some());
    }
}
