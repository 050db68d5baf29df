//! Notification channel implementations.

pub mod wecom;

use std::fmt;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::ChannelError;

/// Secret identifying the destination chat group of a robot webhook.
///
/// The key is a credential: `Debug` output is redacted so it never ends up
/// in logs.
#[derive(Clone, PartialEq, Eq)]
pub struct BotKey(String);

impl BotKey {
    /// Wrap a key, rejecting empty or whitespace-only input.
    #[must_use]
    pub fn new(key: impl Into<String>) -> Option<Self> {
        let key = key.into();
        let trimmed = key.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    /// The raw key, for building the outbound URL.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for BotKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BotKey(***)")
    }
}

/// Body returned by the chat service for a delivered message.
#[derive(Debug, Clone, PartialEq)]
pub enum ChannelResponse {
    /// The service answered with `application/json`
    Json(Value),
    /// Any other content type, relayed verbatim
    Text(String),
}

/// Trait for chat channels that accept markdown messages.
#[async_trait]
pub trait NotifyChannel: Send + Sync {
    /// Get the name of this channel.
    fn name(&self) -> &'static str;

    /// Send one markdown message to the group identified by `key`.
    async fn send_markdown(
        &self,
        key: &BotKey,
        content: &str,
    ) -> Result<ChannelResponse, ChannelError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bot_key_rejects_blank() {
        assert!(BotKey::new("").is_none());
        assert!(BotKey::new("   ").is_none());
        assert_eq!(BotKey::new(" abc ").unwrap().expose(), "abc");
    }

    #[test]
    fn test_bot_key_debug_is_redacted() {
        let key = BotKey::new("super-secret").unwrap();
        let rendered = format!("{key:?}");
        assert!(!rendered.contains("super-secret"));
    }
}
