//! Gemini chat backend
//!
//! Credential registration and login over HTTP, plus a WebSocket relay that
//! forwards chat messages to the Gemini API and sends the replies back.

pub mod auth;
pub mod chat;
pub mod config;
pub mod database;
pub mod error;
pub mod jwt;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod state;
pub mod validation;

pub use state::AppState;
