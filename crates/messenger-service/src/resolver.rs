//! Filtered pagination over users.
//!
//! Without a filter the user table is paged directly. With a filter the
//! matching addresses are paged and the page is replaced by the distinct
//! owners of those addresses, keeping the address totals.

use crate::dto::UserPageResponse;
use messenger_core::{Address, AddressFilter, AddressPredicate, MessengerResult, PageParams, UserId};
use messenger_repository::{AddressRepository, UserRepository};
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::debug;

/// Resolves a page of users for a page request and an optional address filter.
#[derive(Clone)]
pub struct PaginationResolver {
    user_repository: Arc<dyn UserRepository>,
    address_repository: Arc<dyn AddressRepository>,
}

impl PaginationResolver {
    #[must_use]
    pub fn new(
        user_repository: Arc<dyn UserRepository>,
        address_repository: Arc<dyn AddressRepository>,
    ) -> Self {
        Self {
            user_repository,
            address_repository,
        }
    }

    /// Resolves one page. `params` must already be validated.
    pub async fn resolve(
        &self,
        params: PageParams,
        filter: &AddressFilter,
    ) -> MessengerResult<UserPageResponse> {
        if filter.is_empty() {
            self.page_users(params).await
        } else {
            self.page_owners(params, &filter.to_predicate()).await
        }
    }

    async fn page_users(&self, params: PageParams) -> MessengerResult<UserPageResponse> {
        let page = self.user_repository.find_all(params.to_page_request()).await?;
        debug!("Listed {} of {} users", page.len(), page.total_elements());
        Ok(UserPageResponse::assemble(params, page.info, page.content))
    }

    async fn page_owners(
        &self,
        params: PageParams,
        predicate: &AddressPredicate,
    ) -> MessengerResult<UserPageResponse> {
        let addresses = self
            .address_repository
            .find_all_matching(predicate, params.to_page_request())
            .await?;

        let owner_ids = distinct_owner_ids(&addresses.content);
        let mut users = if owner_ids.is_empty() {
            Vec::new()
        } else {
            self.user_repository.find_all_by_ids(&owner_ids).await?
        };
        users.sort_by_key(|user| user.id);

        debug!(
            "Resolved {} owners from {} matching addresses (total {})",
            users.len(),
            addresses.len(),
            addresses.total_elements()
        );
        Ok(UserPageResponse::assemble(params, addresses.info, users))
    }
}

/// Distinct owner ids of `addresses`, ascending.
#[must_use]
pub fn distinct_owner_ids(addresses: &[Address]) -> Vec<UserId> {
    addresses
        .iter()
        .map(|address| address.user_id)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
