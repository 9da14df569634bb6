//! Chat relay: one upstream completion per inbound message, one reply back

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tracing::{error, info, warn};
use uuid::Uuid;

use super::events::{ClientEvent, ReceiveMessage, SendMessage, ServerEvent};
use super::gemini::GeminiError;

/// Reply used when the upstream answers without any text
pub const NO_TEXT_FALLBACK: &str = "🤖 Gemini didn't return any text.";

/// Prefix of every reply produced from an upstream failure
pub const API_ERROR_PREFIX: &str = "Gemini API error:";

/// Single-turn text completion
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Returns the generated text, or `None` when the response carried none
    async fn generate(&self, prompt: &str) -> Result<Option<String>, GeminiError>;
}

#[derive(Clone)]
pub struct ChatRelay {
    client: Arc<dyn CompletionClient>,
}

impl ChatRelay {
    pub fn new(client: Arc<dyn CompletionClient>) -> Self {
        Self { client }
    }

    /// Relay one message. Upstream failures become the reply text and
    /// never escape to the connection.
    pub async fn on_message(&self, connection_id: Uuid, event: SendMessage) -> ReceiveMessage {
        info!(
            "Message received on {} from user {}: {}",
            connection_id, event.user_id, event.message
        );

        let text = match self.client.generate(&event.message).await {
            Ok(Some(text)) => text,
            Ok(None) => NO_TEXT_FALLBACK.to_string(),
            Err(e) => {
                error!("Gemini API error: {}", e);
                format!("{} {}", API_ERROR_PREFIX, e)
            }
        };

        ReceiveMessage::from_ai(text)
    }

    /// Drive one connection until its inbound channel closes.
    ///
    /// Each message is handled on its own task, so replies may arrive out of
    /// order relative to the messages that caused them.
    pub async fn serve(
        &self,
        connection_id: Uuid,
        mut inbound: mpsc::Receiver<ClientEvent>,
        outbound: mpsc::Sender<ServerEvent>,
    ) {
        while let Some(event) = inbound.recv().await {
            match event {
                ClientEvent::SendMessage(message) => {
                    let relay = self.clone();
                    let outbound = outbound.clone();
                    tokio::spawn(async move {
                        let reply = relay.on_message(connection_id, message).await;
                        if outbound
                            .send(ServerEvent::ReceiveMessage(reply))
                            .await
                            .is_err()
                        {
                            warn!("Dropping reply for closed connection {}", connection_id);
                        }
                    });
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    enum Stub {
        Text(&'static str),
        Empty,
        Failure,
    }

    #[async_trait]
    impl CompletionClient for Stub {
        async fn generate(&self, prompt: &str) -> Result<Option<String>, GeminiError> {
            match self {
                Stub::Text(text) => Ok(Some(format!("{text} ({prompt})"))),
                Stub::Empty => Ok(None),
                Stub::Failure => Err(GeminiError::Api("quota exceeded".to_string())),
            }
        }
    }

    fn message(text: &str) -> SendMessage {
        SendMessage {
            message: text.to_string(),
            user_id: "u1".to_string(),
        }
    }

    #[tokio::test]
    async fn relays_candidate_text() {
        let relay = ChatRelay::new(Arc::new(Stub::Text("reply")));
        let reply = relay.on_message(Uuid::new_v4(), message("hello")).await;

        assert_eq!(reply, ReceiveMessage::from_ai("reply (hello)"));
    }

    #[tokio::test]
    async fn empty_response_uses_fallback() {
        let relay = ChatRelay::new(Arc::new(Stub::Empty));
        let reply = relay.on_message(Uuid::new_v4(), message("hello")).await;

        assert_eq!(reply.message, NO_TEXT_FALLBACK);
    }

    #[tokio::test]
    async fn upstream_failure_becomes_reply_text() {
        let relay = ChatRelay::new(Arc::new(Stub::Failure));
        let reply = relay.on_message(Uuid::new_v4(), message("hello")).await;

        assert_eq!(reply.sender, "ai");
        assert_eq!(reply.message, "Gemini API error: quota exceeded");
    }

    #[tokio::test]
    async fn serve_emits_one_reply_per_message() {
        let relay = ChatRelay::new(Arc::new(Stub::Text("ok")));
        let (inbound_tx, inbound_rx) = mpsc::channel(8);
        let (outbound_tx, mut outbound_rx) = mpsc::channel(8);

        let task = tokio::spawn({
            let relay = relay.clone();
            async move { relay.serve(Uuid::new_v4(), inbound_rx, outbound_tx).await }
        });

        for text in ["one", "two", "three"] {
            inbound_tx
                .send(ClientEvent::SendMessage(message(text)))
                .await
                .unwrap();
        }
        drop(inbound_tx);
        task.await.unwrap();

        let mut replies = Vec::new();
        while let Some(ServerEvent::ReceiveMessage(reply)) = outbound_rx.recv().await {
            replies.push(reply.message);
        }
        replies.sort();

        assert_eq!(replies, vec!["ok (one)", "ok (three)", "ok (two)"]);
    }
}
