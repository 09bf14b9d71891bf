//! PostgreSQL user repository implementation.

use crate::{traits::UserRepository, DatabasePool};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use messenger_core::{
    MessengerError, MessengerResult, NewUser, Page, PageRequest, User, UserId, UserRole,
};
use sqlx::FromRow;
use std::sync::Arc;
use tracing::{debug, info};

const USER_COLUMNS: &str = "id, login, password, role, create_date, last_visit_date";

/// PostgreSQL user repository implementation.
#[derive(Clone)]
pub struct PgUserRepository {
    pool: Arc<DatabasePool>,
}

impl PgUserRepository {
    /// Creates a new PostgreSQL user repository.
    #[must_use]
    pub fn new(pool: Arc<DatabasePool>) -> Self {
        Self { pool }
    }
}

/// Database row representation of a user.
#[derive(Debug, FromRow)]
struct UserRow {
    id: i64,
    login: String,
    password: String,
    role: String,
    create_date: DateTime<Utc>,
    last_visit_date: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = MessengerError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let role = row
            .role
            .parse::<UserRole>()
            .map_err(|e| MessengerError::Internal(format!("Invalid role in database: {}", e)))?;

        Ok(User {
            id: UserId(row.id),
            login: row.login,
            password: row.password,
            role,
            create_date: row.create_date,
            last_visit_date: row.last_visit_date,
        })
    }
}

fn into_users(rows: Vec<UserRow>) -> MessengerResult<Vec<User>> {
    rows.into_iter().map(User::try_from).collect()
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn find_by_id(&self, id: UserId) -> MessengerResult<Option<User>> {
        debug!("Finding user by id: {}", id);

        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id.into_inner())
        .fetch_optional(self.pool.inner())
        .await?;

        row.map(User::try_from).transpose()
    }

    async fn find_by_login(&self, login: &str) -> MessengerResult<Option<User>> {
        debug!("Finding user by login: {}", login);

        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE login = $1"
        ))
        .bind(login)
        .fetch_optional(self.pool.inner())
        .await?;

        row.map(User::try_from).transpose()
    }

    async fn find_all_by_ids(&self, ids: &[UserId]) -> MessengerResult<Vec<User>> {
        debug!("Finding {} users by id", ids.len());

        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let raw: Vec<i64> = ids.iter().map(|id| id.into_inner()).collect();
        let rows = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = ANY($1) ORDER BY id"
        ))
        .bind(raw)
        .fetch_all(self.pool.inner())
        .await?;

        into_users(rows)
    }

    async fn find_all(&self, page: PageRequest) -> MessengerResult<Page<User>> {
        debug!("Finding users page {} (size {})", page.page, page.size);

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(self.pool.inner())
            .await?;

        let rows = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY id LIMIT $1 OFFSET $2"
        ))
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(self.pool.inner())
        .await?;

        Ok(Page::of(into_users(rows)?, page, total as u64))
    }

    async fn find_by_last_visit_date_before(
        &self,
        threshold: DateTime<Utc>,
    ) -> MessengerResult<Vec<User>> {
        debug!("Finding users last seen before {}", threshold);

        let rows = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE last_visit_date < $1 ORDER BY id"
        ))
        .bind(threshold)
        .fetch_all(self.pool.inner())
        .await?;

        into_users(rows)
    }

    async fn exists_by_id(&self, id: UserId) -> MessengerResult<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE id = $1)")
            .bind(id.into_inner())
            .fetch_one(self.pool.inner())
            .await?;
        Ok(exists)
    }

    async fn exists_by_login(&self, login: &str) -> MessengerResult<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE login = $1)")
                .bind(login)
                .fetch_one(self.pool.inner())
                .await?;
        Ok(exists)
    }

    async fn save(&self, user: &NewUser) -> MessengerResult<User> {
        debug!("Saving user: {}", user.login);

        let row = sqlx::query_as::<_, UserRow>(&format!(
            r#"
            INSERT INTO users (login, password, role, create_date, last_visit_date)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(&user.login)
        .bind(&user.password)
        .bind(user.role.as_str())
        .bind(user.create_date)
        .bind(user.last_visit_date)
        .fetch_one(self.pool.inner())
        .await
        .map_err(|e| match MessengerError::from(e) {
            MessengerError::Validation { .. } => MessengerError::invalid_field(
                "login",
                "unique",
                format!("login '{}' is already taken", user.login),
            ),
            other => other,
        })?;

        User::try_from(row)
    }

    async fn delete(&self, id: UserId) -> MessengerResult<bool> {
        debug!("Deleting user: {}", id);

        let mut tx = self.pool.inner().begin().await?;

        let addresses = sqlx::query("DELETE FROM addresses WHERE user_id = $1")
            .bind(id.into_inner())
            .execute(&mut *tx)
            .await?
            .rows_affected();

        let deleted = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id.into_inner())
            .execute(&mut *tx)
            .await?
            .rows_affected()
            > 0;

        tx.commit().await?;

        if deleted {
            info!(user_id = %id, addresses, "User deleted with addresses");
        }
        Ok(deleted)
    }
}
