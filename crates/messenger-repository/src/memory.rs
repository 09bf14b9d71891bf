//! Process-local entity store.
//!
//! Implements both repository traits over one lock, so a user delete and its
//! address cascade are observed atomically. Ids are assigned sequentially.

use crate::traits::{AddressRepository, UserRepository};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use messenger_core::{
    Address, AddressId, AddressPredicate, MessengerError, MessengerResult, NewAddress, NewUser,
    Page, PageRequest, User, UserId,
};
use std::collections::BTreeMap;
use tokio::sync::Mutex;
use tracing::debug;

#[derive(Debug, Default)]
struct State {
    users: BTreeMap<UserId, User>,
    addresses: BTreeMap<AddressId, Address>,
    next_user_id: i64,
    next_address_id: i64,
}

impl State {
    fn allocate_user_id(&mut self) -> UserId {
        self.next_user_id += 1;
        UserId(self.next_user_id)
    }

    fn allocate_address_id(&mut self) -> AddressId {
        self.next_address_id += 1;
        AddressId(self.next_address_id)
    }
}

fn paginate<T: Clone>(items: &[T], page: PageRequest) -> Page<T> {
    let content = items
        .iter()
        .skip(page.offset())
        .take(page.limit())
        .cloned()
        .collect();
    Page::of(content, page, items.len() as u64)
}

/// In-memory store for users and addresses.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    state: Mutex<State>,
}

impl InMemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a user with its own id, replacing any user with that id.
    pub async fn insert_user(&self, user: User) {
        let mut state = self.state.lock().await;
        state.next_user_id = state.next_user_id.max(user.id.into_inner());
        state.users.insert(user.id, user);
    }

    /// Inserts an address with its own id. Fails if the owner is unknown.
    pub async fn insert_address(&self, address: Address) -> MessengerResult<()> {
        let mut state = self.state.lock().await;
        if !state.users.contains_key(&address.user_id) {
            return Err(MessengerError::not_found("User", address.user_id));
        }
        state.next_address_id = state.next_address_id.max(address.id.into_inner());
        state.addresses.insert(address.id, address);
        Ok(())
    }

    /// Number of stored addresses.
    pub async fn address_count(&self) -> usize {
        self.state.lock().await.addresses.len()
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn find_by_id(&self, id: UserId) -> MessengerResult<Option<User>> {
        Ok(self.state.lock().await.users.get(&id).cloned())
    }

    async fn find_by_login(&self, login: &str) -> MessengerResult<Option<User>> {
        let state = self.state.lock().await;
        Ok(state.users.values().find(|u| u.login == login).cloned())
    }

    async fn find_all_by_ids(&self, ids: &[UserId]) -> MessengerResult<Vec<User>> {
        let state = self.state.lock().await;
        Ok(state
            .users
            .values()
            .filter(|u| ids.contains(&u.id))
            .cloned()
            .collect())
    }

    async fn find_all(&self, page: PageRequest) -> MessengerResult<Page<User>> {
        let state = self.state.lock().await;
        let users: Vec<User> = state.users.values().cloned().collect();
        Ok(paginate(&users, page))
    }

    async fn find_by_last_visit_date_before(
        &self,
        threshold: DateTime<Utc>,
    ) -> MessengerResult<Vec<User>> {
        let state = self.state.lock().await;
        Ok(state
            .users
            .values()
            .filter(|u| u.is_inactive_since(threshold))
            .cloned()
            .collect())
    }

    async fn exists_by_id(&self, id: UserId) -> MessengerResult<bool> {
        Ok(self.state.lock().await.users.contains_key(&id))
    }

    async fn exists_by_login(&self, login: &str) -> MessengerResult<bool> {
        let state = self.state.lock().await;
        Ok(state.users.values().any(|u| u.login == login))
    }

    async fn save(&self, user: &NewUser) -> MessengerResult<User> {
        let mut state = self.state.lock().await;
        if state.users.values().any(|u| u.login == user.login) {
            return Err(MessengerError::invalid_field(
                "login",
                "unique",
                format!("login '{}' is already taken", user.login),
            ));
        }

        let id = state.allocate_user_id();
        let user = user.clone().into_user(id);
        state.users.insert(id, user.clone());
        debug!("Stored user {} in memory", id);
        Ok(user)
    }

    async fn delete(&self, id: UserId) -> MessengerResult<bool> {
        let mut state = self.state.lock().await;
        if state.users.remove(&id).is_none() {
            return Ok(false);
        }
        state.addresses.retain(|_, a| a.user_id != id);
        Ok(true)
    }
}

#[async_trait]
impl AddressRepository for InMemoryStore {
    async fn find_by_id(&self, id: AddressId) -> MessengerResult<Option<Address>> {
        Ok(self.state.lock().await.addresses.get(&id).cloned())
    }

    async fn find_by_user_id(&self, user_id: UserId) -> MessengerResult<Vec<Address>> {
        let state = self.state.lock().await;
        Ok(state
            .addresses
            .values()
            .filter(|a| a.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn find_all_matching(
        &self,
        predicate: &AddressPredicate,
        page: PageRequest,
    ) -> MessengerResult<Page<Address>> {
        let state = self.state.lock().await;
        let matching: Vec<Address> = state
            .addresses
            .values()
            .filter(|a| predicate.matches(a))
            .cloned()
            .collect();
        Ok(paginate(&matching, page))
    }

    async fn save(&self, address: &NewAddress) -> MessengerResult<Address> {
        let mut state = self.state.lock().await;
        if !state.users.contains_key(&address.user_id) {
            return Err(MessengerError::not_found("User", address.user_id));
        }

        let id = state.allocate_address_id();
        let address = address.clone().into_address(id);
        state.addresses.insert(id, address.clone());
        Ok(address)
    }

    async fn delete(&self, id: AddressId) -> MessengerResult<bool> {
        Ok(self.state.lock().await.addresses.remove(&id).is_some())
    }

    async fn delete_all_matching(&self, predicate: &AddressPredicate) -> MessengerResult<u64> {
        let mut state = self.state.lock().await;
        let before = state.addresses.len();
        state.addresses.retain(|_, a| !predicate.matches(a));
        Ok((before - state.addresses.len()) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use messenger_core::{AddressField, UserRole};
    use std::sync::Arc;

    fn new_user(login: &str) -> NewUser {
        NewUser::new(login, "hashed_password", UserRole::User)
    }

    fn new_address(user_id: UserId, country: &str, city: &str) -> NewAddress {
        NewAddress {
            user_id,
            country: country.to_string(),
            postal_code: "101000".to_string(),
            city: city.to_string(),
            street: "Lenina".to_string(),
            house: 1,
            housing: None,
            apartment: None,
        }
    }

    fn store() -> (Arc<dyn UserRepository>, Arc<dyn AddressRepository>) {
        let store = Arc::new(InMemoryStore::new());
        (store.clone(), store)
    }

    // =============================================================================
    // UserRepository Tests
    // =============================================================================

    #[tokio::test]
    async fn test_save_assigns_sequential_ids() {
        let (users, _) = store();

        let first = users.save(&new_user("first")).await.unwrap();
        let second = users.save(&new_user("second")).await.unwrap();

        assert_eq!(first.id, UserId(1));
        assert_eq!(second.id, UserId(2));
        assert!(users.exists_by_id(UserId(2)).await.unwrap());
        assert!(!users.exists_by_id(UserId(3)).await.unwrap());
    }

    #[tokio::test]
    async fn test_duplicate_login_is_validation_error() {
        let (users, _) = store();
        users.save(&new_user("testLogin")).await.unwrap();

        let err = users.save(&new_user("testLogin")).await.unwrap_err();
        assert!(matches!(err, MessengerError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_find_by_login() {
        let (users, _) = store();
        users.save(&new_user("testLogin")).await.unwrap();

        assert!(users.find_by_login("testLogin").await.unwrap().is_some());
        assert!(users.find_by_login("other").await.unwrap().is_none());
        assert!(users.exists_by_login("testLogin").await.unwrap());
    }

    #[tokio::test]
    async fn test_find_all_pages_by_id() {
        let (users, _) = store();
        for login in ["a", "b", "c"] {
            users.save(&new_user(login)).await.unwrap();
        }

        let page = users.find_all(PageRequest::new(1, 2)).await.unwrap();
        assert_eq!(page.content.len(), 1);
        assert_eq!(page.content[0].login, "c");
        assert_eq!(page.total_elements(), 3);
        assert_eq!(page.total_pages(), 2);
    }

    #[tokio::test]
    async fn test_find_all_by_ids_skips_unknown() {
        let (users, _) = store();
        users.save(&new_user("a")).await.unwrap();
        users.save(&new_user("b")).await.unwrap();

        let found = users
            .find_all_by_ids(&[UserId(2), UserId(99), UserId(1)])
            .await
            .unwrap();
        let ids: Vec<UserId> = found.iter().map(|u| u.id).collect();
        assert_eq!(ids, vec![UserId(1), UserId(2)]);
    }

    #[tokio::test]
    async fn test_find_by_last_visit_date_before() {
        let store = InMemoryStore::new();
        let mut stale = new_user("stale").into_user(UserId(1));
        stale.last_visit_date = Utc::now() - Duration::days(4 * 365);
        store.insert_user(stale).await;
        store.insert_user(new_user("fresh").into_user(UserId(2))).await;

        let threshold = Utc::now() - Duration::days(3 * 365);
        let found = store.find_by_last_visit_date_before(threshold).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].login, "stale");
    }

    #[tokio::test]
    async fn test_delete_user_cascades_addresses() {
        let (users, addresses) = store();
        let owner = users.save(&new_user("owner")).await.unwrap();
        let other = users.save(&new_user("other")).await.unwrap();
        addresses.save(&new_address(owner.id, "Russia", "Moscow")).await.unwrap();
        addresses.save(&new_address(owner.id, "Russia", "Kazan")).await.unwrap();
        addresses.save(&new_address(other.id, "Russia", "Moscow")).await.unwrap();

        assert!(users.delete(owner.id).await.unwrap());

        assert!(addresses.find_by_user_id(owner.id).await.unwrap().is_empty());
        assert_eq!(addresses.find_by_user_id(other.id).await.unwrap().len(), 1);
        assert!(!users.delete(owner.id).await.unwrap());
    }

    // =============================================================================
    // AddressRepository Tests
    // =============================================================================

    #[tokio::test]
    async fn test_save_address_requires_owner() {
        let store = InMemoryStore::new();
        let err = AddressRepository::save(&store, &new_address(UserId(42), "Russia", "Moscow"))
            .await
            .unwrap_err();

        assert!(err.is_not_found());
        assert_eq!(store.address_count().await, 0);
    }

    #[tokio::test]
    async fn test_find_all_matching_filters_and_pages() {
        let (users, addresses) = store();
        let owner = users.save(&new_user("owner")).await.unwrap();
        for city in ["Moscow", "Kazan", "Moscow", "Moscow"] {
            addresses.save(&new_address(owner.id, "Russia", city)).await.unwrap();
        }

        let predicate = AddressPredicate::always().and(AddressField::City, "Moscow");
        let page = addresses
            .find_all_matching(&predicate, PageRequest::new(0, 2))
            .await
            .unwrap();

        assert_eq!(page.content.len(), 2);
        assert_eq!(page.total_elements(), 3);
        assert_eq!(page.total_pages(), 2);
        assert!(page.content.iter().all(|a| a.city == "Moscow"));
    }

    #[tokio::test]
    async fn test_delete_address_reports_absence() {
        let (users, addresses) = store();
        let owner = users.save(&new_user("owner")).await.unwrap();
        let address = addresses
            .save(&new_address(owner.id, "Russia", "Moscow"))
            .await
            .unwrap();

        assert!(addresses.delete(address.id).await.unwrap());
        assert!(!addresses.delete(address.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_delete_all_matching() {
        let (users, addresses) = store();
        let owner = users.save(&new_user("owner")).await.unwrap();
        addresses.save(&new_address(owner.id, "Russia", "Moscow")).await.unwrap();
        addresses.save(&new_address(owner.id, "Belarus", "Minsk")).await.unwrap();

        let predicate = AddressPredicate::always().and(AddressField::Country, "Russia");
        assert_eq!(addresses.delete_all_matching(&predicate).await.unwrap(), 1);

        let remaining = addresses.find_by_user_id(owner.id).await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].city, "Minsk");
    }
}
