//! Repository trait definitions.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use messenger_core::{
    Address, AddressId, AddressPredicate, MessengerResult, NewAddress, NewUser, Page,
    PageRequest, User, UserId,
};

/// User repository trait.
///
/// Pages and id lookups are ordered by id ascending.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Finds a user by ID.
    async fn find_by_id(&self, id: UserId) -> MessengerResult<Option<User>>;

    /// Finds a user by login.
    async fn find_by_login(&self, login: &str) -> MessengerResult<Option<User>>;

    /// Finds every user whose id is in `ids`. Unknown ids are skipped.
    async fn find_all_by_ids(&self, ids: &[UserId]) -> MessengerResult<Vec<User>>;

    /// Finds all users with pagination.
    async fn find_all(&self, page: PageRequest) -> MessengerResult<Page<User>>;

    /// Finds users whose last visit happened strictly before `threshold`.
    async fn find_by_last_visit_date_before(
        &self,
        threshold: DateTime<Utc>,
    ) -> MessengerResult<Vec<User>>;

    /// Checks if a user exists.
    async fn exists_by_id(&self, id: UserId) -> MessengerResult<bool>;

    /// Checks if a login is taken.
    async fn exists_by_login(&self, login: &str) -> MessengerResult<bool>;

    /// Saves a new user. A taken login is a validation error.
    async fn save(&self, user: &NewUser) -> MessengerResult<User>;

    /// Deletes a user together with all of their addresses, atomically.
    ///
    /// Returns false if no user had this id.
    async fn delete(&self, id: UserId) -> MessengerResult<bool>;
}

/// Address repository trait.
#[async_trait]
pub trait AddressRepository: Send + Sync {
    /// Finds an address by ID.
    async fn find_by_id(&self, id: AddressId) -> MessengerResult<Option<Address>>;

    /// Lists a user's addresses, ordered by id.
    async fn find_by_user_id(&self, user_id: UserId) -> MessengerResult<Vec<Address>>;

    /// Pages over the addresses matching `predicate`, ordered by id.
    async fn find_all_matching(
        &self,
        predicate: &AddressPredicate,
        page: PageRequest,
    ) -> MessengerResult<Page<Address>>;

    /// Saves a new address. Fails with `NotFound` if the owner does not exist.
    async fn save(&self, address: &NewAddress) -> MessengerResult<Address>;

    /// Deletes an address by ID. Returns false if nothing was deleted.
    async fn delete(&self, id: AddressId) -> MessengerResult<bool>;

    /// Deletes every address matching `predicate` and returns the count.
    async fn delete_all_matching(&self, predicate: &AddressPredicate) -> MessengerResult<u64>;
}
