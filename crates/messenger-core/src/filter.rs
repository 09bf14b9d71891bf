//! Address filtering.
//!
//! An [`AddressFilter`] is a sparse set of optional equality criteria. It is
//! folded into an [`AddressPredicate`], an explicit conjunction of
//! `(field, expected value)` pairs that stores translate into their own query
//! language and that can also be evaluated directly against an [`Address`].
//!
//! Numeric columns (`house`, `apartment`) are compared as strings against the
//! decimal rendering of the stored value, so `"01"` does not match `1`.

use crate::Address;
use serde::{Deserialize, Serialize};
use std::fmt;

/// An address attribute that can be filtered on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressField {
    Country,
    PostalCode,
    City,
    Street,
    House,
    Housing,
    Apartment,
}

impl AddressField {
    /// All filterable fields, in column order.
    pub const ALL: [Self; 7] = [
        Self::Country,
        Self::PostalCode,
        Self::City,
        Self::Street,
        Self::House,
        Self::Housing,
        Self::Apartment,
    ];

    /// Column name in the `addresses` table.
    #[must_use]
    pub const fn column(&self) -> &'static str {
        match self {
            Self::Country => "country",
            Self::PostalCode => "postal_code",
            Self::City => "city",
            Self::Street => "street",
            Self::House => "house",
            Self::Housing => "housing",
            Self::Apartment => "apartment",
        }
    }

    /// Returns true for columns stored as integers.
    #[must_use]
    pub const fn is_numeric(&self) -> bool {
        matches!(self, Self::House | Self::Apartment)
    }

    /// The string form of this field's value on `address`, if present.
    #[must_use]
    pub fn value_of(&self, address: &Address) -> Option<String> {
        match self {
            Self::Country => Some(address.country.clone()),
            Self::PostalCode => Some(address.postal_code.clone()),
            Self::City => Some(address.city.clone()),
            Self::Street => Some(address.street.clone()),
            Self::House => Some(address.house.to_string()),
            Self::Housing => address.housing.clone(),
            Self::Apartment => address.apartment.map(|a| a.to_string()),
        }
    }
}

impl fmt::Display for AddressField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

/// Optional equality criteria over address attributes.
///
/// Absent and zero-length values contribute no criterion.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressFilter {
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub postal_code: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub street: Option<String>,
    #[serde(default)]
    pub house: Option<String>,
    #[serde(default)]
    pub housing: Option<String>,
    #[serde(default)]
    pub apartment: Option<String>,
}

impl AddressFilter {
    /// Returns the criterion set for `field`, treating empty strings as absent.
    #[must_use]
    pub fn get(&self, field: AddressField) -> Option<&str> {
        let value = match field {
            AddressField::Country => &self.country,
            AddressField::PostalCode => &self.postal_code,
            AddressField::City => &self.city,
            AddressField::Street => &self.street,
            AddressField::House => &self.house,
            AddressField::Housing => &self.housing,
            AddressField::Apartment => &self.apartment,
        };
        value.as_deref().filter(|v| !v.is_empty())
    }

    /// Returns true when no criterion is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        AddressField::ALL.iter().all(|field| self.get(*field).is_none())
    }

    /// Builds the conjunctive predicate for this filter.
    #[must_use]
    pub fn to_predicate(&self) -> AddressPredicate {
        AddressField::ALL
            .iter()
            .fold(AddressPredicate::always(), |predicate, field| {
                match self.get(*field) {
                    Some(value) => predicate.and(*field, value),
                    None => predicate,
                }
            })
    }
}

/// One equality check of a predicate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Condition {
    pub field: AddressField,
    pub value: String,
}

/// A conjunction of exact-match conditions over address fields.
///
/// The empty conjunction matches every address.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddressPredicate {
    conditions: Vec<Condition>,
}

impl AddressPredicate {
    /// The always-true predicate.
    #[must_use]
    pub const fn always() -> Self {
        Self {
            conditions: Vec::new(),
        }
    }

    /// Adds an equality condition.
    #[must_use]
    pub fn and(mut self, field: AddressField, value: impl Into<String>) -> Self {
        self.conditions.push(Condition {
            field,
            value: value.into(),
        });
        self
    }

    /// The conditions making up this conjunction.
    #[must_use]
    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    /// Returns true if this predicate matches everything.
    #[must_use]
    pub fn is_always(&self) -> bool {
        self.conditions.is_empty()
    }

    /// Evaluates the predicate against an address.
    #[must_use]
    pub fn matches(&self, address: &Address) -> bool {
        self.conditions
            .iter()
            .all(|c| c.field.value_of(address).as_deref() == Some(c.value.as_str()))
    }
}
