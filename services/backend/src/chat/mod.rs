//! Real-time chat relay to the Gemini API

pub mod events;
pub mod gemini;
pub mod relay;
pub mod socket;

pub use events::{ClientEvent, ReceiveMessage, SendMessage, ServerEvent};
pub use gemini::{GeminiClient, GeminiConfig, GeminiError};
pub use relay::{ChatRelay, CompletionClient};
