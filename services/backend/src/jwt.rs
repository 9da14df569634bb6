//! JWT service for session token generation and validation
//!
//! Tokens are signed with HS256 using the server-held secret and carry the
//! user id plus a fixed validity window. Nothing is stored server-side.

use anyhow::Result;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// Default token lifetime: one day
pub const DEFAULT_TOKEN_EXPIRY: u64 = 86_400;

/// JWT configuration
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Shared secret for signing tokens. Absent secrets only fail when a
    /// token is actually issued or checked.
    pub secret: Option<String>,
    /// Token expiration time in seconds (default: 1 day)
    pub token_expiry: u64,
}

impl JwtConfig {
    /// Create a new JwtConfig from environment variables
    ///
    /// # Environment Variables
    /// - `JWT_SECRET`: Secret used to sign session tokens
    /// - `JWT_EXPIRY_SECONDS`: Token expiry in seconds (default: 86400)
    pub fn from_env() -> Self {
        let secret = std::env::var("JWT_SECRET")
            .ok()
            .filter(|secret| !secret.is_empty());

        let token_expiry = std::env::var("JWT_EXPIRY_SECONDS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_TOKEN_EXPIRY);

        JwtConfig {
            secret,
            token_expiry,
        }
    }
}

/// JWT claims structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// User ID
    pub id: Uuid,
    /// Issued at time
    pub iat: u64,
    /// Expiration time
    pub exp: u64,
}

/// JWT service
#[derive(Clone)]
pub struct JwtService {
    keys: Option<(EncodingKey, DecodingKey)>,
    validation: Validation,
    config: JwtConfig,
}

impl JwtService {
    /// Initialize a new JWT service
    pub fn new(config: JwtConfig) -> Self {
        let keys = config.secret.as_ref().map(|secret| {
            (
                EncodingKey::from_secret(secret.as_bytes()),
                DecodingKey::from_secret(secret.as_bytes()),
            )
        });

        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 0;

        JwtService {
            keys,
            validation,
            config,
        }
    }

    fn keys(&self) -> Result<&(EncodingKey, DecodingKey)> {
        self.keys
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("JWT_SECRET environment variable not set"))
    }

    /// Generate a session token for a user, valid from now
    pub fn generate_token(&self, user_id: Uuid) -> Result<String> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|e| anyhow::anyhow!("Failed to get current time: {}", e))?
            .as_secs();

        self.generate_token_at(user_id, now)
    }

    /// Generate a session token as if issued at `issued_at` (unix seconds)
    pub fn generate_token_at(&self, user_id: Uuid, issued_at: u64) -> Result<String> {
        let (encoding_key, _) = self.keys()?;

        let claims = Claims {
            id: user_id,
            iat: issued_at,
            exp: issued_at + self.config.token_expiry,
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, encoding_key)?;
        Ok(token)
    }

    /// Validate a token and return the claims
    pub fn validate_token(&self, token: &str) -> Result<Claims> {
        let (_, decoding_key) = self.keys()?;
        let token_data = decode::<Claims>(token, decoding_key, &self.validation)?;
        Ok(token_data.claims)
    }
}
