//! Event dispatch: decode, render, and deliver one webhook.

use std::sync::Arc;

use notify::{BotKey, ChannelResponse, NotifyChannel};
use tracing::{debug, error, info};

use crate::error::RelayError;
use crate::events::GitHubEvent;
use crate::format::{render, Rendered};

/// What happened to a webhook delivery.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// A message was sent; holds the chat service's reply
    Delivered(ChannelResponse),
    /// The event was recognised but intentionally not relayed
    Skipped(String),
}

/// Routes GitHub events to a chat channel.
pub struct Dispatcher {
    channel: Arc<dyn NotifyChannel>,
    default_key: Option<BotKey>,
}

impl Dispatcher {
    /// Create a dispatcher sending through `channel`.
    ///
    /// `default_key` is used for requests that do not name a bot key.
    #[must_use]
    pub fn new(channel: Arc<dyn NotifyChannel>, default_key: Option<BotKey>) -> Self {
        Self {
            channel,
            default_key,
        }
    }

    /// Decode a raw delivery and relay it.
    ///
    /// # Errors
    ///
    /// Returns an error if the payload is malformed, a message must be sent
    /// without a bot key, or the chat service cannot be reached.
    pub async fn handle(
        &self,
        event_type: &str,
        key: Option<&BotKey>,
        body: &[u8],
    ) -> Result<Outcome, RelayError> {
        let event = GitHubEvent::parse(event_type, body)?;
        self.dispatch(&event, key).await
    }

    /// Relay an already decoded event.
    ///
    /// At most one message is sent per call.
    ///
    /// # Errors
    ///
    /// See [`Dispatcher::handle`].
    pub async fn dispatch(
        &self,
        event: &GitHubEvent,
        key: Option<&BotKey>,
    ) -> Result<Outcome, RelayError> {
        let content = match render(event)? {
            Rendered::Skipped(reason) => {
                debug!(event_type = %event.name(), reason = %reason, "Event not relayed");
                return Ok(Outcome::Skipped(reason));
            }
            Rendered::Message(content) => content,
        };

        let key = key
            .or(self.default_key.as_ref())
            .ok_or(RelayError::MissingKey)?;

        let response = self
            .channel
            .send_markdown(key, &content)
            .await
            .map_err(|e| {
                error!(
                    channel = self.channel.name(),
                    event_type = %event.name(),
                    error = %e,
                    "Failed to relay event"
                );
                e
            })?;

        info!(
            channel = self.channel.name(),
            event_type = %event.name(),
            "Event relayed"
        );

        Ok(Outcome::Delivered(response))
    }
}
