//! Address entity.

use crate::{AddressId, UserId};
use serde::{Deserialize, Serialize};

/// A persisted postal address. Always owned by exactly one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub id: AddressId,
    /// Owning user.
    pub user_id: UserId,
    pub country: String,
    pub postal_code: String,
    pub city: String,
    pub street: String,
    pub house: i32,
    /// Building or block qualifier.
    pub housing: Option<String>,
    pub apartment: Option<i32>,
}

/// An address that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAddress {
    pub user_id: UserId,
    pub country: String,
    pub postal_code: String,
    pub city: String,
    pub street: String,
    pub house: i32,
    pub housing: Option<String>,
    pub apartment: Option<i32>,
}

impl NewAddress {
    /// Materialises the address with a store-assigned id.
    #[must_use]
    pub fn into_address(self, id: AddressId) -> Address {
        Address {
            id,
            user_id: self.user_id,
            country: self.country,
            postal_code: self.postal_code,
            city: self.city,
            street: self.street,
            house: self.house,
            housing: self.housing,
            apartment: self.apartment,
        }
    }
}
