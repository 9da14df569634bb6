//! Application state shared across handlers

use crate::{auth::AuthService, chat::ChatRelay};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub auth_service: AuthService,
    pub chat_relay: ChatRelay,
}

impl AppState {
    pub fn new(auth_service: AuthService, chat_relay: ChatRelay) -> Self {
        Self {
            auth_service,
            chat_relay,
        }
    }
}
