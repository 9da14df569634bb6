//! Process configuration, read once at startup

use anyhow::{Context, Result};
use axum::http::HeaderValue;
use common::database::DatabaseConfig;

use crate::{chat::GeminiConfig, jwt::JwtConfig};

/// HTTP listener configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Listen port
    pub port: u16,
    /// Origin allowed to call the API and open sockets from a browser
    pub client_origin: HeaderValue,
}

impl ServerConfig {
    /// Create a new ServerConfig from environment variables
    ///
    /// # Environment Variables
    /// - `PORT`: Listen port (default: 5000)
    /// - `CLIENT_ORIGIN`: Allowed cross-origin address (default: "http://localhost:5173")
    pub fn from_env() -> Result<Self> {
        let port = std::env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(5000);

        let origin =
            std::env::var("CLIENT_ORIGIN").unwrap_or_else(|_| "http://localhost:5173".to_string());
        let client_origin = HeaderValue::from_str(&origin)
            .with_context(|| format!("CLIENT_ORIGIN is not a valid header value: {origin}"))?;

        Ok(ServerConfig {
            port,
            client_origin,
        })
    }
}

/// Everything the process needs to start
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    pub gemini: GeminiConfig,
}

impl AppConfig {
    /// Missing `JWT_SECRET` or `GEMINI_API_KEY` is not an error here; the
    /// affected operation fails when it is first used.
    pub fn from_env() -> Result<Self> {
        Ok(AppConfig {
            server: ServerConfig::from_env()?,
            database: DatabaseConfig::from_env()?,
            jwt: JwtConfig::from_env(),
            gemini: GeminiConfig::from_env(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const VARS: [&str; 4] = ["PORT", "CLIENT_ORIGIN", "JWT_SECRET", "GEMINI_API_KEY"];

    fn clear() {
        for var in VARS {
            unsafe {
                std::env::remove_var(var);
            }
        }
    }

    #[test]
    #[serial]
    fn defaults_without_secrets() {
        clear();

        let config = AppConfig::from_env().unwrap();
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.server.client_origin, "http://localhost:5173");
        assert!(config.jwt.secret.is_none());
        assert!(config.gemini.api_key.is_none());
        assert_eq!(config.gemini.model, "gemini-1.5-pro");
    }

    #[test]
    #[serial]
    fn custom_values() {
        clear();
        unsafe {
            std::env::set_var("PORT", "8080");
            std::env::set_var("CLIENT_ORIGIN", "https://chat.example.com");
            std::env::set_var("GEMINI_API_KEY", "key");
        }

        let config = AppConfig::from_env().unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.client_origin, "https://chat.example.com");
        assert_eq!(config.gemini.api_key.as_deref(), Some("key"));

        clear();
    }

    #[test]
    #[serial]
    fn invalid_origin_is_rejected() {
        clear();
        unsafe {
            std::env::set_var("CLIENT_ORIGIN", "bad\norigin");
        }

        assert!(ServerConfig::from_env().is_err());

        clear();
    }
}
