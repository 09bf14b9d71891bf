//! Query parameters of the user listing.

use messenger_core::{AddressFilter, MessengerError, MessengerResult, PageParams};
use serde::Deserialize;
use utoipa::IntoParams;

/// Query parameters for the paged, optionally filtered user listing.
///
/// Values arrive as raw strings so that an unparsable page parameter can be
/// reported as a type mismatch naming the parameter.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ListUsersQuery {
    /// 1-based page number, default 1.
    pub page_number: Option<String>,
    /// Page size, default 15, at most 100.
    pub page_size: Option<String>,
    pub country: Option<String>,
    pub postal_code: Option<String>,
    pub city: Option<String>,
    pub street: Option<String>,
    pub house: Option<String>,
    pub housing: Option<String>,
    pub apartment: Option<String>,
}

impl ListUsersQuery {
    /// Splits the query into page parameters and the address filter.
    pub fn into_parts(self) -> MessengerResult<(PageParams, AddressFilter)> {
        let params = PageParams::new(
            parse_page_value("pageNumber", self.page_number, PageParams::DEFAULT_PAGE_NUMBER)?,
            parse_page_value("pageSize", self.page_size, PageParams::DEFAULT_PAGE_SIZE)?,
        );

        let filter = AddressFilter {
            country: self.country,
            postal_code: self.postal_code,
            city: self.city,
            street: self.street,
            house: self.house,
            housing: self.housing,
            apartment: self.apartment,
        };

        Ok((params, filter))
    }
}

/// Parses a page parameter. Negative values are clamped to 0 and left to
/// range validation.
fn parse_page_value(name: &str, raw: Option<String>, default: u32) -> MessengerResult<u32> {
    let Some(raw) = raw.filter(|value| !value.trim().is_empty()) else {
        return Ok(default);
    };

    let value: i64 = raw
        .trim()
        .parse()
        .map_err(|_| MessengerError::type_mismatch(name, raw.as_str(), "integer"))?;

    Ok(u32::try_from(value.max(0)).unwrap_or(u32::MAX))
}

#[cfg(test)]
mod tests {
    use super::*;
    use messenger_core::AddressField;

    #[test]
    fn test_defaults() {
        let (params, filter) = ListUsersQuery::default().into_parts().unwrap();
        assert_eq!(params, PageParams::new(1, 15));
        assert!(filter.is_empty());
    }

    #[test]
    fn test_parses_page_and_filter() {
        let query = ListUsersQuery {
            page_number: Some("2".to_string()),
            page_size: Some(" 30 ".to_string()),
            city: Some("Moscow".to_string()),
            ..ListUsersQuery::default()
        };

        let (params, filter) = query.into_parts().unwrap();
        assert_eq!(params, PageParams::new(2, 30));
        assert_eq!(filter.get(AddressField::City), Some("Moscow"));
    }

    #[test]
    fn test_non_numeric_page_is_type_mismatch() {
        let query = ListUsersQuery {
            page_number: Some("abc".to_string()),
            ..ListUsersQuery::default()
        };

        match query.into_parts() {
            Err(MessengerError::TypeMismatch { parameter, value, .. }) => {
                assert_eq!(parameter, "pageNumber");
                assert_eq!(value, "abc");
            }
            other => panic!("expected type mismatch, got {other:?}"),
        }
    }

    #[test]
    fn test_negative_page_is_left_to_validation() {
        let query = ListUsersQuery {
            page_number: Some("-3".to_string()),
            ..ListUsersQuery::default()
        };

        let (params, _) = query.into_parts().unwrap();
        assert_eq!(params.page_number, 0);
    }
}
