//! WeCom (企业微信) group robot notification channel.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Url;
use serde_json::Value;
use tracing::{debug, warn};

use super::{BotKey, ChannelResponse, NotifyChannel};
use crate::error::ChannelError;
use crate::message::RobotMessage;

/// Public WeCom API origin.
pub const DEFAULT_BASE_URL: &str = "https://qyapi.weixin.qq.com";

/// Path of the robot send endpoint, relative to the API origin.
const SEND_PATH: &str = "/cgi-bin/webhook/send";

/// Default timeout for a single robot request.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// WeCom group robot webhook channel.
pub struct WeComChannel {
    base_url: Url,
    client: reqwest::Client,
}

impl WeComChannel {
    /// Create a channel against the public WeCom API.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new() -> Result<Self, ChannelError> {
        Self::with_base_url(DEFAULT_BASE_URL, DEFAULT_TIMEOUT)
    }

    /// Create a channel against a specific API origin.
    ///
    /// # Errors
    ///
    /// Returns an error if `base_url` is not an absolute http(s) URL or the
    /// HTTP client cannot be built.
    pub fn with_base_url(base_url: &str, timeout: Duration) -> Result<Self, ChannelError> {
        let base_url =
            Url::parse(base_url).map_err(|e| ChannelError::InvalidUrl(format!("{base_url}: {e}")))?;
        if base_url.cannot_be_a_base() || !matches!(base_url.scheme(), "http" | "https") {
            return Err(ChannelError::InvalidUrl(base_url.to_string()));
        }

        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self { base_url, client })
    }

    /// Build the send URL for `key`.
    fn send_url(&self, key: &BotKey) -> Url {
        let mut url = self.base_url.clone();
        let prefix = url.path().trim_end_matches('/').to_string();
        url.set_path(&format!("{prefix}{SEND_PATH}"));
        url.query_pairs_mut().clear().append_pair("key", key.expose());
        url
    }
}

#[async_trait]
impl NotifyChannel for WeComChannel {
    fn name(&self) -> &'static str {
        "wecom"
    }

    async fn send_markdown(
        &self,
        key: &BotKey,
        content: &str,
    ) -> Result<ChannelResponse, ChannelError> {
        let payload = RobotMessage::markdown(content);

        debug!(channel = "wecom", bytes = content.len(), "Sending markdown message");

        let response = self
            .client
            .post(self.send_url(key))
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        let is_json = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.contains("application/json"));
        let body = response.text().await?;

        if !status.is_success() {
            warn!(
                channel = "wecom",
                status = %status,
                body = %body,
                "WeCom webhook request failed"
            );
        }

        if !is_json {
            return Ok(ChannelResponse::Text(body));
        }

        let value: Value = serde_json::from_str(&body)?;

        // WeCom reports application errors in-band with HTTP 200.
        match value.get("errcode").and_then(Value::as_i64) {
            Some(0) | None => debug!(channel = "wecom", "Message delivered"),
            Some(errcode) => warn!(
                channel = "wecom",
                errcode,
                errmsg = value.get("errmsg").and_then(serde_json::Value::as_str).unwrap_or_default(),
                "WeCom rejected message"
            ),
        }

        Ok(ChannelResponse::Json(value))
    }
}
