//! Error types for webhook relaying.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use notify::ChannelError;
use thiserror::Error;

/// Errors that can occur while relaying a GitHub webhook.
#[derive(Debug, Error)]
pub enum RelayError {
    /// Body is not valid JSON or does not match the event's schema
    #[error("malformed {event} payload: {source}")]
    MalformedPayload {
        /// GitHub event name
        event: &'static str,
        /// Decoder error naming the offending field
        #[source]
        source: serde_json::Error,
    },

    /// A field needed by the selected branch is absent or null
    #[error("malformed {event} payload: missing field `{field}`")]
    MissingField {
        /// GitHub event name
        event: &'static str,
        /// Dotted path of the absent field
        field: &'static str,
    },

    /// A message must be sent but no bot key was supplied
    #[error("missing bot key: pass it as the `key` query parameter")]
    MissingKey,

    /// The chat service could not be reached
    #[error("chat delivery failed: {0}")]
    Channel(#[from] ChannelError),
}

impl RelayError {
    /// HTTP status reported to the webhook caller.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::MalformedPayload { .. } | Self::MissingField { .. } | Self::MissingKey => {
                StatusCode::BAD_REQUEST
            }
            Self::Channel(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        (self.status(), self.to_string()).into_response()
    }
}
