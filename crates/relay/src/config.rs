//! Configuration for the relay service.

use std::env;
use std::time::Duration;

use notify::channels::wecom::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT};
use notify::BotKey;

/// Documentation link served to callers that do not `POST`.
pub const DEFAULT_USAGE_URL: &str = "https://github.com/huhuhang/github-wechat-bot";

/// Relay service configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port.
    pub port: u16,
    /// WeCom API origin.
    pub wecom_base_url: String,
    /// Bot key used when a request carries no `key` query parameter.
    pub default_bot_key: Option<BotKey>,
    /// Timeout for the outbound robot request.
    pub wecom_timeout: Duration,
    /// Documentation link in the usage message.
    pub usage_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: non_empty_var("RELAY_PORT")
                .and_then(|s| s.parse().ok())
                .unwrap_or(8080),
            wecom_base_url: non_empty_var("WECOM_BASE_URL")
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            default_bot_key: non_empty_var("WECOM_BOT_KEY").and_then(BotKey::new),
            wecom_timeout: non_empty_var("WECOM_TIMEOUT_SECS")
                .and_then(|s| s.parse().ok())
                .map_or(DEFAULT_TIMEOUT, Duration::from_secs),
            usage_url: non_empty_var("RELAY_USAGE_URL")
                .unwrap_or_else(|| DEFAULT_USAGE_URL.to_string()),
        }
    }
}

impl Config {
    /// Usage message returned for anything other than a webhook `POST`.
    #[must_use]
    pub fn usage_message(&self) -> String {
        format!("使用方法请参考文档: {}", self.usage_url)
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|s| !s.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Use a mutex to serialize tests that modify environment variables
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const VARS: [&str; 5] = [
        "RELAY_PORT",
        "WECOM_BASE_URL",
        "WECOM_BOT_KEY",
        "WECOM_TIMEOUT_SECS",
        "RELAY_USAGE_URL",
    ];

    fn clear_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    #[test]
    fn test_default_config() {
        let _lock = ENV_MUTEX.lock().unwrap();
        clear_env();

        let config = Config::default();
        assert_eq!(config.port, 8080);
        assert_eq!(config.wecom_base_url, "https://qyapi.weixin.qq.com");
        assert!(config.default_bot_key.is_none());
        assert_eq!(config.wecom_timeout, Duration::from_secs(10));
        assert_eq!(
            config.usage_message(),
            "使用方法请参考文档: https://github.com/huhuhang/github-wechat-bot"
        );
    }

    #[test]
    fn test_config_from_env() {
        let _lock = ENV_MUTEX.lock().unwrap();
        clear_env();

        env::set_var("RELAY_PORT", "9000");
        env::set_var("WECOM_BASE_URL", "http://127.0.0.1:1234");
        env::set_var("WECOM_BOT_KEY", "fallback-key");
        env::set_var("WECOM_TIMEOUT_SECS", "3");
        env::set_var("RELAY_USAGE_URL", "https://docs.example.com/relay");

        let config = Config::default();
        assert_eq!(config.port, 9000);
        assert_eq!(config.wecom_base_url, "http://127.0.0.1:1234");
        assert_eq!(
            config.default_bot_key.as_ref().map(BotKey::expose),
            Some("fallback-key")
        );
        assert_eq!(config.wecom_timeout, Duration::from_secs(3));
        assert!(config.usage_message().ends_with("https://docs.example.com/relay"));

        clear_env();
    }

    #[test]
    fn test_empty_and_invalid_values_fall_back() {
        let _lock = ENV_MUTEX.lock().unwrap();
        clear_env();

        env::set_var("RELAY_PORT", "not-a-port");
        env::set_var("WECOM_BOT_KEY", "  ");
        env::set_var("WECOM_BASE_URL", "");

        let config = Config::default();
        assert_eq!(config.port, 8080);
        assert!(config.default_bot_key.is_none());
        assert_eq!(config.wecom_base_url, DEFAULT_BASE_URL);

        clear_env();
    }
}
