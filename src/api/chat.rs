use crate::error::ApiError;
use crate::gateway::GatewayClient;
use crate::Result;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

const MAX_MESSAGE_CHARS: usize = 1000;

#[derive(Debug, Clone, Deserialize)]
pub struct Conversation {
    pub id: i64,
    #[serde(rename = "participantes")]
    pub participants: Vec<i64>,
    #[serde(rename = "vehiculo", default)]
    pub vehicle: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatMessage {
    pub id: i64,
    pub chat: i64,
    #[serde(rename = "emisor")]
    pub sender: i64,
    #[serde(rename = "contenido")]
    pub text: String,
    #[serde(rename = "fecha")]
    pub sent_at: DateTime<Utc>,
}

#[derive(Clone)]
pub struct ChatApi {
    gateway: Arc<GatewayClient>,
}

impl ChatApi {
    pub fn new(gateway: Arc<GatewayClient>) -> Self {
        Self { gateway }
    }

    pub async fn conversations(&self) -> Result<Vec<Conversation>> {
        self.gateway.get("/chat/").await
    }

    pub async fn messages(&self, chat: i64) -> Result<Vec<ChatMessage>> {
        self.gateway.get(&format!("/chat/{}/mensajes/", chat)).await
    }

    pub async fn send(&self, chat: i64, text: &str) -> Result<ChatMessage> {
        if text.trim().is_empty() {
            return Err(ApiError::Validation("empty chat message".to_string()));
        }
        if text.chars().count() > MAX_MESSAGE_CHARS {
            return Err(ApiError::Validation(format!(
                "message exceeds {} characters",
                MAX_MESSAGE_CHARS
            )));
        }
        self.gateway
            .post(&format!("/chat/{}/mensajes/", chat), &json!({"contenido": text}))
            .await
    }

    /// Starts a message refresh loop for one conversation.
    ///
    /// The loop awaits each fetch before scheduling the next tick, so there
    /// is never more than one request in flight. It stops on cancellation,
    /// when the receiver is dropped, and on the terminal error classes: 404
    /// (chat not available on this backend) and 5xx (backend down).
    /// Transient failures are logged and the loop keeps going.
    pub fn poll_messages(
        &self,
        chat: i64,
        interval: Duration,
    ) -> (ChatPoller, mpsc::Receiver<Vec<ChatMessage>>) {
        let (tx, rx) = mpsc::channel(8);
        let cancel = CancellationToken::new();
        let child = cancel.clone();
        let api = self.clone();

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = child.cancelled() => break,
                    _ = ticker.tick() => {}
                }

                let fetched = tokio::select! {
                    _ = child.cancelled() => break,
                    result = api.messages(chat) => result,
                };

                match fetched {
                    Ok(messages) => {
                        if tx.send(messages).await.is_err() {
                            break;
                        }
                    }
                    Err(e) if e.is_not_found() || e.is_server_error() => {
                        warn!("chat {} polling stopped: {}", chat, e);
                        break;
                    }
                    Err(e) => {
                        debug!("chat {} poll failed, will retry: {}", chat, e);
                    }
                }
            }
        });

        (ChatPoller { handle, cancel }, rx)
    }
}

/// Handle over a running poll loop.
pub struct ChatPoller {
    handle: JoinHandle<()>,
    cancel: CancellationToken,
}

impl ChatPoller {
    /// Requests the loop to stop. An in-flight fetch is dropped, not acted
    /// upon.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Waits for the loop task to wind down.
    pub async fn stopped(self) {
        let _ = self.handle.await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SessionStore;

    fn api() -> ChatApi {
        let gateway =
            GatewayClient::new("http://127.0.0.1:8000/venta", SessionStore::in_memory(), 0)
                .unwrap();
        ChatApi::new(Arc::new(gateway))
    }

    #[tokio::test]
    async fn test_blank_message_fails_locally() {
        let err = api().send(1, "  \n").await.unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[tokio::test]
    async fn test_oversize_message_fails_locally() {
        let text = "x".repeat(MAX_MESSAGE_CHARS + 1);
        let err = api().send(1, &text).await.unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[tokio::test]
    async fn test_poller_cancels_promptly() {
        // points at a closed port; every poll fails as transient
        let (poller, rx) = api().poll_messages(1, Duration::from_millis(10));
        tokio::time::sleep(Duration::from_millis(30)).await;
        assert!(!poller.is_finished());

        poller.cancel();
        poller.stopped().await;
        drop(rx);
    }
}
