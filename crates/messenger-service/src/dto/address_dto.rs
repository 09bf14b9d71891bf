//! Address-related DTOs.

use messenger_core::{
    rules, Address, AddressId, MessengerError, MessengerResult, NewAddress, UserId,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Request to attach a new address to an existing user.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateAddressRequest {
    #[validate(required(message = "userId is required"))]
    pub user_id: Option<UserId>,

    #[validate(
        required(message = "country is required"),
        custom(function = "rules::not_blank", message = "country must not be blank"),
        length(max = 255)
    )]
    pub country: Option<String>,

    #[validate(
        required(message = "postalCode is required"),
        custom(function = "rules::not_blank", message = "postalCode must not be blank"),
        length(max = 255)
    )]
    pub postal_code: Option<String>,

    #[validate(
        required(message = "city is required"),
        custom(function = "rules::not_blank", message = "city must not be blank"),
        length(max = 255)
    )]
    pub city: Option<String>,

    #[validate(
        required(message = "street is required"),
        custom(function = "rules::not_blank", message = "street must not be blank"),
        length(max = 255)
    )]
    pub street: Option<String>,

    #[validate(required(message = "house is required"))]
    pub house: Option<i32>,

    #[validate(length(max = 50))]
    pub housing: Option<String>,

    pub apartment: Option<i32>,
}

impl CreateAddressRequest {
    /// Converts a validated request into an unsaved address.
    pub fn into_new_address(self) -> MessengerResult<NewAddress> {
        fn required<T>(value: Option<T>, field: &str) -> MessengerResult<T> {
            value.ok_or_else(|| {
                MessengerError::invalid_field(field, "required", format!("{field} is required"))
            })
        }

        Ok(NewAddress {
            user_id: required(self.user_id, "userId")?,
            country: required(self.country, "country")?,
            postal_code: required(self.postal_code, "postalCode")?,
            city: required(self.city, "city")?,
            street: required(self.street, "street")?,
            house: required(self.house, "house")?,
            housing: self.housing,
            apartment: self.apartment,
        })
    }
}

/// Address response DTO.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddressResponse {
    pub id: AddressId,
    pub user_id: UserId,
    pub country: String,
    pub postal_code: String,
    pub city: String,
    pub street: String,
    pub house: i32,
    pub housing: Option<String>,
    pub apartment: Option<i32>,
}

impl From<Address> for AddressResponse {
    fn from(address: Address) -> Self {
        Self {
            id: address.id,
            user_id: address.user_id,
            country: address.country,
            postal_code: address.postal_code,
            city: address.city,
            street: address.street,
            house: address.house,
            housing: address.housing,
            apartment: address.apartment,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use messenger_core::ValidateExt;

    fn moscow(user_id: i64) -> CreateAddressRequest {
        CreateAddressRequest {
            user_id: Some(UserId(user_id)),
            country: Some("Russia".to_string()),
            postal_code: Some("101000".to_string()),
            city: Some("Moscow".to_string()),
            street: Some("Tverskaya".to_string()),
            house: Some(1),
            housing: None,
            apartment: Some(12),
        }
    }

    #[test]
    fn test_valid_request_converts() {
        let request = moscow(5);
        assert!(request.validate_request().is_ok());

        let address = request.into_new_address().unwrap();
        assert_eq!(address.user_id, UserId(5));
        assert_eq!(address.house, 1);
        assert_eq!(address.apartment, Some(12));
    }

    #[test]
    fn test_missing_house_is_field_error() {
        let request = CreateAddressRequest {
            house: None,
            ..moscow(5)
        };

        match request.validate_request() {
            Err(MessengerError::Validation { fields, .. }) => {
                assert_eq!(fields.len(), 1);
                assert_eq!(fields[0].field, "house");
            }
            other => panic!("expected validation failure, got {other:?}"),
        }
    }

    #[test]
    fn test_field_errors_use_wire_names() {
        let request = CreateAddressRequest {
            user_id: None,
            postal_code: Some(" ".to_string()),
            ..moscow(5)
        };

        match request.validate_request() {
            Err(MessengerError::Validation { fields, .. }) => {
                let names: Vec<_> = fields.iter().map(|f| f.field.as_str()).collect();
                assert_eq!(names, vec!["postalCode", "userId"]);
            }
            other => panic!("expected validation failure, got {other:?}"),
        }
    }

    #[test]
    fn test_blank_city_is_rejected() {
        let request = CreateAddressRequest {
            city: Some("  ".to_string()),
            ..moscow(5)
        };
        assert!(request.validate_request().is_err());
    }

    #[test]
    fn test_housing_length_limit() {
        let request = CreateAddressRequest {
            housing: Some("b".repeat(51)),
            ..moscow(5)
        };
        assert!(request.validate_request().is_err());
    }

    #[test]
    fn test_wire_format() {
        let request: CreateAddressRequest = serde_json::from_str(
            r#"{"userId":5,"country":"Russia","postalCode":"101000","city":"Moscow","street":"Arbat","house":7}"#,
        )
        .unwrap();

        assert_eq!(request.user_id, Some(UserId(5)));
        assert_eq!(request.postal_code.as_deref(), Some("101000"));
        assert_eq!(request.housing, None);
    }
}
