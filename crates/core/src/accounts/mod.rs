//! User registration and login.

mod password;
mod sqlite;
mod types;
mod validation;

pub use password::{hash_password, verify_password, PasswordError};
pub use sqlite::SqliteAccountStore;
pub use types::*;
pub use validation::{validate_credentials, validate_registration, ValidationError};

use std::sync::Arc;

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::{info, warn};

use crate::db::StoreError;

/// Storage for user accounts.
pub trait AccountStore: Send + Sync {
    /// Insert a new user. Fails with [`StoreError::Conflict`] when the email
    /// is taken.
    fn create(
        &self,
        registration: &Registration,
        password_hash: &str,
        created_at: DateTime<Utc>,
    ) -> Result<User, StoreError>;

    fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    fn get(&self, id: i64) -> Result<Option<User>, StoreError>;
}

#[derive(Debug, Error)]
pub enum AccountError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Email already registered")]
    EmailTaken,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error(transparent)]
    Password(#[from] PasswordError),

    #[error(transparent)]
    Store(StoreError),
}

impl From<StoreError> for AccountError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Conflict(_) => AccountError::EmailTaken,
            other => AccountError::Store(other),
        }
    }
}

/// Registration and login on top of an [`AccountStore`].
pub struct AccountService {
    store: Arc<dyn AccountStore>,
}

impl AccountService {
    pub fn new(store: Arc<dyn AccountStore>) -> Self {
        Self { store }
    }

    /// Validate, hash and store a new account.
    pub fn register(&self, input: &Registration) -> Result<User, AccountError> {
        let registration = validate_registration(input)?;

        if self.store.find_by_email(&registration.email)?.is_some() {
            return Err(AccountError::EmailTaken);
        }

        let hash = hash_password(&registration.password)?;
        let user = self.store.create(&registration, &hash, Utc::now())?;

        info!(user_id = user.id, "Registered user");
        Ok(user)
    }

    /// Check credentials. Unknown email and wrong password are
    /// indistinguishable to the caller.
    pub fn login(&self, input: &Credentials) -> Result<User, AccountError> {
        let email = validate_credentials(input)?;

        let Some(user) = self.store.find_by_email(&email)? else {
            warn!("Login failed: unknown email");
            return Err(AccountError::InvalidCredentials);
        };

        if !verify_password(&input.password, &user.password_hash)? {
            warn!(user_id = user.id, "Login failed: wrong password");
            return Err(AccountError::InvalidCredentials);
        }

        Ok(user)
    }

    pub fn exists(&self, user_id: i64) -> Result<bool, AccountError> {
        Ok(self.store.get(user_id)?.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::SqlitePool;

    fn service() -> AccountService {
        let pool = Arc::new(SqlitePool::in_memory().unwrap());
        AccountService::new(Arc::new(SqliteAccountStore::new(pool)))
    }

    fn registration() -> Registration {
        Registration {
            first_name: "Ana".to_string(),
            last_name: "Ruiz".to_string(),
            email: "Ana@Example.com".to_string(),
            phone: "600123456".to_string(),
            password: "supersecret".to_string(),
        }
    }

    #[test]
    fn test_register_then_login() {
        let service = service();
        let user = service.register(&registration()).unwrap();
        assert_eq!(user.email, "ana@example.com");
        assert!(user.password_hash.starts_with("$argon2id$"));

        let logged_in = service
            .login(&Credentials {
                email: "ANA@example.com".to_string(),
                password: "supersecret".to_string(),
            })
            .unwrap();
        assert_eq!(logged_in.id, user.id);
        assert!(service.exists(user.id).unwrap());
    }

    #[test]
    fn test_duplicate_registration() {
        let service = service();
        service.register(&registration()).unwrap();
        assert!(matches!(
            service.register(&registration()),
            Err(AccountError::EmailTaken)
        ));
    }

    #[test]
    fn test_invalid_registration() {
        let mut input = registration();
        input.password = "short".to_string();
        assert!(matches!(
            service().register(&input),
            Err(AccountError::Validation(_))
        ));
    }

    #[test]
    fn test_login_failures() {
        let service = service();
        service.register(&registration()).unwrap();

        let wrong = service.login(&Credentials {
            email: "ana@example.com".to_string(),
            password: "wrong-password".to_string(),
        });
        assert!(matches!(wrong, Err(AccountError::InvalidCredentials)));

        let unknown = service.login(&Credentials {
            email: "bob@example.com".to_string(),
            password: "supersecret".to_string(),
        });
        assert!(matches!(unknown, Err(AccountError::InvalidCredentials)));
    }
}
