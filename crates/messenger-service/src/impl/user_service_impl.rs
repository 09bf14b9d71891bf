//! User service implementation.

use crate::dto::{
    AddressResponse, CreateAddressRequest, CreateUserRequest, UserPageResponse, UserResponse,
};
use crate::resolver::PaginationResolver;
use crate::user_service::UserService;
use async_trait::async_trait;
use messenger_core::{
    AddressFilter, AddressId, MessengerError, MessengerResult, NewUser, PageParams, UserId,
    ValidateExt,
};
use messenger_repository::{AddressRepository, UserRepository};
use messenger_security::PasswordHasherInterface;
use std::sync::Arc;
use tracing::{debug, info};

/// User service over the user and address repositories.
#[derive(Clone)]
pub struct UserServiceImpl {
    user_repository: Arc<dyn UserRepository>,
    address_repository: Arc<dyn AddressRepository>,
    password_hasher: Arc<dyn PasswordHasherInterface>,
    resolver: PaginationResolver,
}

impl UserServiceImpl {
    /// Creates a new user service.
    #[must_use]
    pub fn new(
        user_repository: Arc<dyn UserRepository>,
        address_repository: Arc<dyn AddressRepository>,
        password_hasher: Arc<dyn PasswordHasherInterface>,
    ) -> Self {
        let resolver =
            PaginationResolver::new(Arc::clone(&user_repository), Arc::clone(&address_repository));
        Self {
            user_repository,
            address_repository,
            password_hasher,
            resolver,
        }
    }
}

#[async_trait]
impl UserService for UserServiceImpl {
    async fn exists_by_id(&self, id: UserId) -> MessengerResult<bool> {
        self.user_repository.exists_by_id(id).await
    }

    async fn exists_by_login(&self, login: &str) -> MessengerResult<bool> {
        self.user_repository.exists_by_login(login).await
    }

    async fn get_user_by_login(&self, login: &str) -> MessengerResult<UserResponse> {
        debug!("Getting user by login: {}", login);

        let user = self
            .user_repository
            .find_by_login(login)
            .await?
            .ok_or_else(|| MessengerError::not_found("User", login))?;

        Ok(UserResponse::from(user))
    }

    async fn get_user_by_id(&self, id: UserId) -> MessengerResult<UserResponse> {
        debug!("Getting user: {}", id);

        let user = self
            .user_repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| MessengerError::not_found("User", id))?;

        Ok(UserResponse::from(user))
    }

    async fn get_address_list_by_user_id(
        &self,
        user_id: UserId,
    ) -> MessengerResult<Vec<AddressResponse>> {
        debug!("Getting addresses of user: {}", user_id);

        let addresses = self.address_repository.find_by_user_id(user_id).await?;
        Ok(addresses.into_iter().map(AddressResponse::from).collect())
    }

    async fn find_all(
        &self,
        params: PageParams,
        filter: AddressFilter,
    ) -> MessengerResult<UserPageResponse> {
        debug!(
            "Listing users, page: {}, size: {}, filtered: {}",
            params.page_number,
            params.page_size,
            !filter.is_empty()
        );

        params.validate_request()?;
        self.resolver.resolve(params, &filter).await
    }

    async fn save(&self, request: CreateUserRequest) -> MessengerResult<UserResponse> {
        request.validate_request()?;

        let CreateUserRequest {
            login: Some(login),
            password: Some(password),
            role: Some(role),
        } = request
        else {
            return Err(MessengerError::validation("Incomplete user request"));
        };
        debug!("Creating user: {}", login);

        if self.user_repository.exists_by_login(&login).await? {
            return Err(MessengerError::invalid_field(
                "login",
                "unique",
                format!("login '{}' is already taken", login),
            ));
        }

        let password_hash = self.password_hasher.hash(&password)?;
        let saved = self
            .user_repository
            .save(&NewUser::new(login, password_hash, role))
            .await?;

        info!("User created: {}", saved.id);
        Ok(UserResponse::from(saved))
    }

    async fn add_address_by_user_id(
        &self,
        request: CreateAddressRequest,
    ) -> MessengerResult<AddressResponse> {
        request.validate_request()?;
        let address = request.into_new_address()?;
        debug!("Adding address to user: {}", address.user_id);

        if !self.user_repository.exists_by_id(address.user_id).await? {
            return Err(MessengerError::not_found("User", address.user_id));
        }

        let saved = self.address_repository.save(&address).await?;

        info!("Address {} added to user {}", saved.id, saved.user_id);
        Ok(AddressResponse::from(saved))
    }

    async fn delete_address_by_id(&self, id: AddressId) -> MessengerResult<()> {
        debug!("Deleting address: {}", id);

        if !self.address_repository.delete(id).await? {
            return Err(MessengerError::not_found("Address", id));
        }

        info!("Address deleted: {}", id);
        Ok(())
    }

    async fn delete_user_by_id(&self, id: UserId) -> MessengerResult<()> {
        debug!("Deleting user: {}", id);

        if !self.user_repository.delete(id).await? {
            return Err(MessengerError::not_found("User", id));
        }

        info!("User deleted: {}", id);
        Ok(())
    }
}
