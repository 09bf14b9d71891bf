//! User entity.

use crate::{UserId, UserRole};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Maximum length of a login.
pub const LOGIN_MAX_LENGTH: u64 = 50;

/// A persisted user. Owns zero or more addresses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Store-assigned identifier.
    pub id: UserId,
    /// Globally unique login.
    pub login: String,
    /// Stored password (an Argon2 PHC string).
    pub password: String,
    /// Role.
    pub role: UserRole,
    /// Set once at creation.
    pub create_date: DateTime<Utc>,
    /// Last time the user was seen.
    pub last_visit_date: DateTime<Utc>,
}

impl User {
    /// Returns true if the user has not visited since `threshold`.
    #[must_use]
    pub fn is_inactive_since(&self, threshold: DateTime<Utc>) -> bool {
        self.last_visit_date < threshold
    }
}

/// A user that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub login: String,
    pub password: String,
    pub role: UserRole,
    pub create_date: DateTime<Utc>,
    pub last_visit_date: DateTime<Utc>,
}

impl NewUser {
    /// Creates a new user stamped with the current time.
    #[must_use]
    pub fn new(login: impl Into<String>, password: impl Into<String>, role: UserRole) -> Self {
        let now = Utc::now();
        Self {
            login: login.into(),
            password: password.into(),
            role,
            create_date: now,
            last_visit_date: now,
        }
    }

    /// Materialises the user with a store-assigned id.
    #[must_use]
    pub fn into_user(self, id: UserId) -> User {
        User {
            id,
            login: self.login,
            password: self.password,
            role: self.role,
            create_date: self.create_date,
            last_visit_date: self.last_visit_date,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_new_user_dates() {
        let user = NewUser::new("testLogin", "secret", UserRole::User);
        assert_eq!(user.create_date, user.last_visit_date);

        let user = user.into_user(UserId(5));
        assert_eq!(user.id, UserId(5));
        assert_eq!(user.login, "testLogin");
    }

    #[test]
    fn test_is_inactive_since() {
        let mut user = NewUser::new("old", "secret", UserRole::User).into_user(UserId(1));
        user.last_visit_date = Utc::now() - Duration::days(4 * 365);

        assert!(user.is_inactive_since(Utc::now() - Duration::days(3 * 365)));
        assert!(!user.is_inactive_since(Utc::now() - Duration::days(5 * 365)));
    }
}
