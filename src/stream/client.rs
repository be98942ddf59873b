//! WebSocket streaming client
//!
//! Drives one [`ChatController`] query over a tokio-tungstenite connection.

use futures_util::{SinkExt, StreamExt};
use thiserror::Error;
use tokio_tungstenite::{connect_async, tungstenite::Message as WsMessage};
use tracing::Instrument;
use uuid::Uuid;

use crate::chat::{ChatController, ChatError, FrameEffect, MessageId};
use crate::config::ApiConfig;
use crate::token::TokenStore;

#[derive(Error, Debug)]
pub enum StreamError {
    #[error("Failed to connect: {0}")]
    Connect(String),

    #[error("Connection error: {0}")]
    Transport(String),

    #[error("Failed to encode request: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("A query is already in progress")]
    Busy,
}

impl From<ChatError> for StreamError {
    fn from(e: ChatError) -> Self {
        match e {
            ChatError::QueryInFlight => StreamError::Busy,
        }
    }
}

fn transport(e: tokio_tungstenite::tungstenite::Error) -> StreamError {
    StreamError::Transport(e.to_string())
}

/// Opens one connection per query against the streaming endpoint
#[derive(Debug, Clone)]
pub struct StreamClient {
    ws_url: String,
}

impl StreamClient {
    pub fn new(ws_url: impl Into<String>) -> Self {
        Self {
            ws_url: ws_url.into(),
        }
    }

    pub fn from_config(api: &ApiConfig) -> Self {
        Self::new(api.ws_url())
    }

    pub fn ws_url(&self) -> &str {
        &self.ws_url
    }

    /// Send `query` and stream the answer into `controller`.
    ///
    /// `observer` sees every frame effect right after the controller applied
    /// it. Returns the user message id, or `None` for a blank query. On
    /// connection failure the controller has already been told (toast queued,
    /// indicator cleared) before the error is returned. Dropping the future
    /// closes the socket; call [`ChatController::teardown`] afterwards.
    pub async fn run_query<S, F>(
        &self,
        controller: &mut ChatController<S>,
        query: &str,
        mut observer: F,
    ) -> Result<Option<MessageId>, StreamError>
    where
        S: TokenStore,
        F: FnMut(&FrameEffect, &ChatController<S>),
    {
        let Some(user_id) = controller.send(query)? else {
            return Ok(None);
        };

        let query_id = Uuid::new_v4();
        let span = tracing::info_span!("query", %query_id, user_id);
        let result = self
            .stream_answer(controller, &mut observer)
            .instrument(span)
            .await;

        if let Err(e) = &result {
            controller.on_transport_error(&e.to_string());
        }
        controller.on_close();

        result.map(|()| Some(user_id))
    }

    async fn stream_answer<S, F>(
        &self,
        controller: &mut ChatController<S>,
        observer: &mut F,
    ) -> Result<(), StreamError>
    where
        S: TokenStore,
        F: FnMut(&FrameEffect, &ChatController<S>),
    {
        tracing::debug!(url = %self.ws_url, "Connecting");
        let (socket, _) = connect_async(self.ws_url.as_str())
            .await
            .map_err(|e| StreamError::Connect(e.to_string()))?;
        let (mut sink, mut source) = socket.split();

        if let Some(request) = controller.on_open() {
            sink.send(WsMessage::Text(request.to_json()?))
                .await
                .map_err(transport)?;
        }

        while let Some(message) = source.next().await {
            let text = match message.map_err(transport)? {
                WsMessage::Text(text) => text,
                WsMessage::Binary(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
                WsMessage::Close(frame) => {
                    tracing::debug!(?frame, "Server closed the stream");
                    break;
                }
                _ => continue,
            };

            let effect = controller.on_frame(&text);
            tracing::debug!(frame_len = text.len(), ?effect, "Frame applied");
            observer(&effect, &*controller);

            if effect.closes_session() {
                if let Err(e) = sink.send(WsMessage::Close(None)).await {
                    tracing::debug!(error = %e, "Close after final frame failed");
                }
                break;
            }
        }

        Ok(())
    }
}
