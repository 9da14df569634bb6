//! In-memory user store, used by tests and local runs without PostgreSQL

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use common::error::{DatabaseError, DatabaseResult};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::UserStore;
use crate::models::{NewUser, User};

/// Users keyed by email
#[derive(Debug, Clone, Default)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<HashMap<String, User>>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored users
    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl UserStore for InMemoryUserRepository {
    async fn create(&self, new_user: &NewUser) -> DatabaseResult<User> {
        let mut users = self.users.write().await;
        if users.contains_key(&new_user.email) {
            return Err(DatabaseError::Duplicate("users_email_key".to_string()));
        }

        let user = User {
            id: Uuid::new_v4(),
            name: new_user.name.clone(),
            email: new_user.email.clone(),
            password_hash: new_user.password_hash.clone(),
            created_at: Utc::now(),
        };
        users.insert(user.email.clone(), user.clone());
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> DatabaseResult<Option<User>> {
        Ok(self.users.read().await.get(email).cloned())
    }

    async fn health_check(&self) -> DatabaseResult<bool> {
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(email: &str) -> NewUser {
        NewUser {
            name: "Test".to_string(),
            email: email.to_string(),
            password_hash: "hash".to_string(),
        }
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected_without_second_record() {
        let repo = InMemoryUserRepository::new();
        repo.create(&new_user("a@x.com")).await.unwrap();

        let err = repo.create(&new_user("a@x.com")).await.unwrap_err();
        assert!(matches!(err, DatabaseError::Duplicate(_)));
        assert_eq!(repo.len().await, 1);
    }

    #[tokio::test]
    async fn find_by_email_is_exact() {
        let repo = InMemoryUserRepository::new();
        let created = repo.create(&new_user("a@x.com")).await.unwrap();

        let found = repo.find_by_email("a@x.com").await.unwrap().unwrap();
        assert_eq!(found.id, created.id);
        assert!(repo.find_by_email("b@x.com").await.unwrap().is_none());
    }
}
