//! Outbound WeCom robot message payloads.

use serde::Serialize;

/// A `markdown` robot message.
///
/// Serializes to `{"msgtype":"markdown","markdown":{"content":"..."}}`.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "msgtype", rename_all = "lowercase")]
pub enum RobotMessage<'a> {
    /// Markdown body rendered by the WeCom client
    Markdown {
        /// Markdown block
        markdown: MarkdownBody<'a>,
    },
}

/// Body of a markdown message.
#[derive(Debug, Clone, Serialize)]
pub struct MarkdownBody<'a> {
    /// Markdown text, passed through unmodified
    pub content: &'a str,
}

impl<'a> RobotMessage<'a> {
    /// Build a markdown message around `content`.
    #[must_use]
    pub const fn markdown(content: &'a str) -> Self {
        Self::Markdown {
            markdown: MarkdownBody { content },
        }
    }
}
