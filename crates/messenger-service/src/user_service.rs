//! User service trait definition.

use crate::dto::{
    AddressResponse, CreateAddressRequest, CreateUserRequest, UserPageResponse, UserResponse,
};
use async_trait::async_trait;
use messenger_core::{AddressFilter, AddressId, MessengerResult, PageParams, UserId};

/// User service trait.
#[async_trait]
pub trait UserService: Send + Sync {
    /// Checks if a user exists.
    async fn exists_by_id(&self, id: UserId) -> MessengerResult<bool>;

    /// Checks if a login is taken.
    async fn exists_by_login(&self, login: &str) -> MessengerResult<bool>;

    /// Gets a user by login.
    async fn get_user_by_login(&self, login: &str) -> MessengerResult<UserResponse>;

    /// Gets a user by ID.
    async fn get_user_by_id(&self, id: UserId) -> MessengerResult<UserResponse>;

    /// Lists the addresses of a user. An unknown user has no addresses.
    async fn get_address_list_by_user_id(
        &self,
        user_id: UserId,
    ) -> MessengerResult<Vec<AddressResponse>>;

    /// Lists one page of users, optionally restricted to owners of matching addresses.
    async fn find_all(
        &self,
        params: PageParams,
        filter: AddressFilter,
    ) -> MessengerResult<UserPageResponse>;

    /// Creates a user.
    async fn save(&self, request: CreateUserRequest) -> MessengerResult<UserResponse>;

    /// Attaches a new address to an existing user.
    async fn add_address_by_user_id(
        &self,
        request: CreateAddressRequest,
    ) -> MessengerResult<AddressResponse>;

    /// Deletes an address.
    async fn delete_address_by_id(&self, id: AddressId) -> MessengerResult<()>;

    /// Deletes a user together with all of its addresses.
    async fn delete_user_by_id(&self, id: UserId) -> MessengerResult<()>;
}
