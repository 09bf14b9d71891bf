//! Validation utilities.

use crate::{FieldError, MessengerError};
use validator::{Validate, ValidationErrors};

/// Extension trait for validation.
pub trait ValidateExt: Validate {
    /// Validates the struct and returns a `MessengerError` on failure.
    fn validate_request(&self) -> Result<(), MessengerError> {
        self.validate().map_err(validation_errors_to_messenger_error)
    }
}

impl<T: Validate> ValidateExt for T {}

/// Converts a Rust field name to the camelCase name used on the wire.
#[must_use]
pub fn wire_field_name(field: &str) -> String {
    let mut name = String::with_capacity(field.len());
    let mut upper = false;
    for c in field.chars() {
        if c == '_' {
            upper = !name.is_empty();
        } else if upper {
            name.extend(c.to_uppercase());
            upper = false;
        } else {
            name.push(c);
        }
    }
    name
}

/// Flattens `validator::ValidationErrors` into field errors keyed by wire
/// name, sorted by field name.
#[must_use]
pub fn field_errors(errors: &ValidationErrors) -> Vec<FieldError> {
    let mut fields: Vec<FieldError> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| FieldError {
                field: wire_field_name(field),
                message: error
                    .message
                    .as_ref()
                    .map_or_else(|| error.code.to_string(), |m| m.to_string()),
                code: error.code.to_string(),
            })
        })
        .collect();

    fields.sort_by(|a, b| a.field.cmp(&b.field));
    fields
}

/// Converts `validator::ValidationErrors` to `MessengerError`.
#[must_use]
pub fn validation_errors_to_messenger_error(errors: ValidationErrors) -> MessengerError {
    MessengerError::validation_fields(field_errors(&errors))
}

/// Common validation functions.
pub mod rules {
    use validator::ValidationError;

    /// Validates that a string is not blank (not empty after trimming).
    pub fn not_blank(value: &str) -> Result<(), ValidationError> {
        if value.trim().is_empty() {
            return Err(ValidationError::new("not_blank"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[derive(Validate)]
    struct Sample {
        #[validate(custom(function = "rules::not_blank", message = "city must not be blank"))]
        city: String,
        #[validate(length(min = 6, message = "password must be at least 6 characters"))]
        password: String,
    }

    #[test]
    fn test_not_blank() {
        assert!(rules::not_blank("Moscow").is_ok());
        assert!(rules::not_blank("").is_err());
        assert!(rules::not_blank("   ").is_err());
    }

    #[test]
    fn test_validate_request_maps_fields() {
        let sample = Sample {
            city: " ".to_string(),
            password: "abc".to_string(),
        };

        let err = sample.validate_request().unwrap_err();
        match err {
            MessengerError::Validation { fields, .. } => {
                assert_eq!(fields.len(), 2);
                assert_eq!(fields[0].field, "city");
                assert_eq!(fields[0].message, "city must not be blank");
                assert_eq!(fields[1].field, "password");
                assert_eq!(fields[1].code, "length");
            }
            other => panic!("Expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_wire_field_name() {
        assert_eq!(wire_field_name("postal_code"), "postalCode");
        assert_eq!(wire_field_name("user_id"), "userId");
        assert_eq!(wire_field_name("page_number"), "pageNumber");
        assert_eq!(wire_field_name("city"), "city");
    }

    #[test]
    fn test_validate_request_ok() {
        let sample = Sample {
            city: "Moscow".to_string(),
            password: "secret1".to_string(),
        };
        assert!(sample.validate_request().is_ok());
    }
}
