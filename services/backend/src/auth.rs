//! Registration and login

use std::sync::Arc;

use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString};
use common::error::DatabaseError;
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    error::{AuthError, AuthResult},
    jwt::{Claims, JwtService},
    models::{NewUser, UserSummary},
    repositories::UserStore,
    validation,
};

/// Token and user summary handed out by a successful login
#[derive(Debug, Clone)]
pub struct Session {
    pub token: String,
    pub user: UserSummary,
}

/// Auth service shared by the HTTP handlers
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserStore>,
    jwt_service: JwtService,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserStore>, jwt_service: JwtService) -> Self {
        Self { users, jwt_service }
    }

    /// Register a new account. No token is issued here; clients log in next.
    pub async fn register(&self, name: &str, email: &str, password: &str) -> AuthResult<Uuid> {
        let email = email.trim();
        validation::validate_password(password).map_err(AuthError::Validation)?;
        validation::validate_required(name, email).map_err(AuthError::Validation)?;

        if self.users.find_by_email(email).await?.is_some() {
            return Err(AuthError::EmailTaken);
        }

        let password_hash = hash_password(password.to_string()).await?;
        let new_user = NewUser {
            name: name.to_string(),
            email: email.to_string(),
            password_hash,
        };

        // The unique index catches a concurrent registration that slipped past the lookup.
        let user = self.users.create(&new_user).await.map_err(|e| match e {
            DatabaseError::Duplicate(_) => AuthError::EmailTaken,
            other => AuthError::Database(other),
        })?;

        info!("Registered user {}", user.id);
        Ok(user.id)
    }

    /// Check credentials and mint a session token
    pub async fn login(&self, email: &str, password: &str) -> AuthResult<Session> {
        let email = email.trim();
        info!("Login attempt for email: {}", email);

        let Some(user) = self.users.find_by_email(email).await? else {
            warn!("Login failed: unknown email");
            return Err(AuthError::InvalidCredentials);
        };

        if !verify_password(password.to_string(), user.password_hash.clone()).await? {
            warn!("Login failed: wrong password for user {}", user.id);
            return Err(AuthError::InvalidCredentials);
        }

        let token = self
            .jwt_service
            .generate_token(user.id)
            .map_err(AuthError::Token)?;

        Ok(Session {
            token,
            user: UserSummary::from(&user),
        })
    }

    /// Validate a session token issued by [`AuthService::login`]
    ///
    /// A bad token is a credential error. A missing signing secret is a server fault.
    pub fn verify_token(&self, token: &str) -> AuthResult<Claims> {
        self.jwt_service.validate_token(token).map_err(|e| {
            if e.downcast_ref::<jsonwebtoken::errors::Error>().is_some() {
                AuthError::InvalidCredentials
            } else {
                AuthError::Token(e)
            }
        })
    }

    /// Whether the credential store is reachable
    pub async fn store_healthy(&self) -> bool {
        self.users.health_check().await.unwrap_or(false)
    }
}

/// Hash a password with Argon2id and a fresh salt, off the async workers
pub async fn hash_password(password: String) -> AuthResult<String> {
    tokio::task::spawn_blocking(move || {
        let salt = SaltString::generate(&mut rand::thread_rng());
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| AuthError::Hashing(e.to_string()))
    })
    .await
    .map_err(|e| AuthError::Hashing(e.to_string()))?
}

/// Compare a password against a stored PHC hash
///
/// An unparsable stored hash is a server fault, not a wrong password.
pub async fn verify_password(password: String, password_hash: String) -> AuthResult<bool> {
    tokio::task::spawn_blocking(move || {
        let parsed_hash = PasswordHash::new(&password_hash)
            .map_err(|e| AuthError::Hashing(format!("Failed to parse password hash: {}", e)))?;

        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    })
    .await
    .map_err(|e| AuthError::Hashing(e.to_string()))?
}
