//! User registration
//!
//! Thin entity service: accounts exist so bets can reference them.
//! Balances are tracked but never debited or credited by this core.

use chrono::Utc;
use rust_decimal::Decimal;
use std::sync::Arc;

use crate::domain::{User, UserId};
use crate::error::{Error, Result};
use crate::store::UserStore;

/// Creates and looks up users
pub struct UserService {
    store: Arc<dyn UserStore>,
}

impl UserService {
    /// Create a service over the given store
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        Self { store }
    }

    /// Register a user with a zero informational balance
    pub async fn create_user(&self, username: &str, email: Option<String>) -> Result<User> {
        if username.trim().is_empty() {
            return Err(Error::InvalidUsername);
        }

        let user = User {
            id: UserId::new_v4(),
            username: username.to_string(),
            email,
            created_at: Utc::now(),
            is_active: true,
            balance: Decimal::ZERO,
        };

        self.store.insert(user.clone()).await?;
        tracing::info!(user_id = %user.id, username = %user.username, "User created");
        Ok(user)
    }

    /// Load a user or fail with UserNotFound
    pub async fn get(&self, id: UserId) -> Result<User> {
        self.store.find(id).await?.ok_or(Error::UserNotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use rust_decimal_macros::dec;

    fn service() -> UserService {
        UserService::new(Arc::new(MemoryStore::new()))
    }

    #[tokio::test]
    async fn test_create_user_defaults() {
        let service = service();
        let user = service
            .create_user("alice", Some("alice@example.com".to_string()))
            .await
            .unwrap();

        assert!(user.is_active);
        assert_eq!(user.balance, dec!(0));
        assert_eq!(user.email.as_deref(), Some("alice@example.com"));

        let found = service.get(user.id).await.unwrap();
        assert_eq!(found.username, "alice");
    }

    #[tokio::test]
    async fn test_create_user_rejects_blank_username() {
        let err = service().create_user("  ", None).await.unwrap_err();
        assert!(matches!(err, Error::InvalidUsername));
    }

    #[tokio::test]
    async fn test_get_unknown_user() {
        let err = service().get(UserId::new_v4()).await.unwrap_err();
        assert!(matches!(err, Error::UserNotFound));
    }
}
