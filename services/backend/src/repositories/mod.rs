//! Credential store
//!
//! The auth service only sees [`UserStore`]; production wires in the
//! PostgreSQL repository and tests use the in-memory one.

use async_trait::async_trait;
use common::error::DatabaseResult;

use crate::models::{NewUser, User};

pub mod memory;
pub mod user;

pub use memory::InMemoryUserRepository;
pub use user::UserRepository;

/// Persistence operations the auth service needs
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a user. A second user with the same email fails with
    /// [`common::error::DatabaseError::Duplicate`] and leaves nothing behind.
    async fn create(&self, new_user: &NewUser) -> DatabaseResult<User>;

    /// Find a user by exact email match
    async fn find_by_email(&self, email: &str) -> DatabaseResult<Option<User>>;

    /// Whether the backing store is reachable
    async fn health_check(&self) -> DatabaseResult<bool>;
}
