//! PostgreSQL address repository implementation.

use super::predicate::push_where;
use crate::{traits::AddressRepository, DatabasePool};
use async_trait::async_trait;
use messenger_core::{
    Address, AddressId, AddressPredicate, MessengerError, MessengerResult, NewAddress, Page,
    PageRequest, UserId,
};
use sqlx::{FromRow, Postgres, QueryBuilder};
use std::sync::Arc;
use tracing::debug;

const ADDRESS_COLUMNS: &str =
    "id, user_id, country, postal_code, city, street, house, housing, apartment";

/// PostgreSQL foreign key violation.
const FOREIGN_KEY_VIOLATION: &str = "23503";

/// PostgreSQL address repository implementation.
#[derive(Clone)]
pub struct PgAddressRepository {
    pool: Arc<DatabasePool>,
}

impl PgAddressRepository {
    /// Creates a new PostgreSQL address repository.
    #[must_use]
    pub fn new(pool: Arc<DatabasePool>) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct AddressRow {
    id: i64,
    user_id: i64,
    country: String,
    postal_code: String,
    city: String,
    street: String,
    house: i32,
    housing: Option<String>,
    apartment: Option<i32>,
}

impl From<AddressRow> for Address {
    fn from(row: AddressRow) -> Self {
        Self {
            id: AddressId(row.id),
            user_id: UserId(row.user_id),
            country: row.country,
            postal_code: row.postal_code,
            city: row.city,
            street: row.street,
            house: row.house,
            housing: row.housing,
            apartment: row.apartment,
        }
    }
}

fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.code().as_deref() == Some(FOREIGN_KEY_VIOLATION))
}

#[async_trait]
impl AddressRepository for PgAddressRepository {
    async fn find_by_id(&self, id: AddressId) -> MessengerResult<Option<Address>> {
        debug!("Finding address by id: {}", id);

        let row = sqlx::query_as::<_, AddressRow>(&format!(
            "SELECT {ADDRESS_COLUMNS} FROM addresses WHERE id = $1"
        ))
        .bind(id.into_inner())
        .fetch_optional(self.pool.inner())
        .await?;

        Ok(row.map(Address::from))
    }

    async fn find_by_user_id(&self, user_id: UserId) -> MessengerResult<Vec<Address>> {
        debug!("Finding addresses of user: {}", user_id);

        let rows = sqlx::query_as::<_, AddressRow>(&format!(
            "SELECT {ADDRESS_COLUMNS} FROM addresses WHERE user_id = $1 ORDER BY id"
        ))
        .bind(user_id.into_inner())
        .fetch_all(self.pool.inner())
        .await?;

        Ok(rows.into_iter().map(Address::from).collect())
    }

    async fn find_all_matching(
        &self,
        predicate: &AddressPredicate,
        page: PageRequest,
    ) -> MessengerResult<Page<Address>> {
        debug!(
            "Finding addresses page {} (size {}) with {} conditions",
            page.page,
            page.size,
            predicate.conditions().len()
        );

        let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM addresses");
        push_where(&mut count, predicate);
        let total = count
            .build_query_scalar::<i64>()
            .fetch_one(self.pool.inner())
            .await?;

        let mut select =
            QueryBuilder::<Postgres>::new(format!("SELECT {ADDRESS_COLUMNS} FROM addresses"));
        push_where(&mut select, predicate);
        select
            .push(" ORDER BY id LIMIT ")
            .push_bind(page.limit() as i64)
            .push(" OFFSET ")
            .push_bind(page.offset() as i64);

        let rows = select
            .build_query_as::<AddressRow>()
            .fetch_all(self.pool.inner())
            .await?;

        Ok(Page::of(
            rows.into_iter().map(Address::from).collect(),
            page,
            total as u64,
        ))
    }

    async fn save(&self, address: &NewAddress) -> MessengerResult<Address> {
        debug!("Saving address for user: {}", address.user_id);

        let row = sqlx::query_as::<_, AddressRow>(&format!(
            r#"
            INSERT INTO addresses (user_id, country, postal_code, city, street, house, housing, apartment)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {ADDRESS_COLUMNS}
            "#
        ))
        .bind(address.user_id.into_inner())
        .bind(&address.country)
        .bind(&address.postal_code)
        .bind(&address.city)
        .bind(&address.street)
        .bind(address.house)
        .bind(&address.housing)
        .bind(address.apartment)
        .fetch_one(self.pool.inner())
        .await
        .map_err(|e| {
            if is_foreign_key_violation(&e) {
                MessengerError::not_found("User", address.user_id)
            } else {
                MessengerError::from(e)
            }
        })?;

        Ok(Address::from(row))
    }

    async fn delete(&self, id: AddressId) -> MessengerResult<bool> {
        debug!("Deleting address: {}", id);

        let result = sqlx::query("DELETE FROM addresses WHERE id = $1")
            .bind(id.into_inner())
            .execute(self.pool.inner())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_all_matching(&self, predicate: &AddressPredicate) -> MessengerResult<u64> {
        debug!(
            "Deleting addresses matching {} conditions",
            predicate.conditions().len()
        );

        let mut delete = QueryBuilder::<Postgres>::new("DELETE FROM addresses");
        push_where(&mut delete, predicate);
        let result = delete.build().execute(self.pool.inner()).await?;

        Ok(result.rows_affected())
    }
}
