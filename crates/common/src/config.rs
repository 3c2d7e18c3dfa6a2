use std::fmt;
use std::time::Duration;

/// Default homework-status endpoint of the review service.
pub const DEFAULT_API_ENDPOINT: &str = "https://practicum.yandex.ru/api/user_api/homework_statuses/";

/// Default Telegram Bot API base URL.
pub const DEFAULT_TELEGRAM_API_URL: &str = "https://api.telegram.org";

/// Default interval between poll cycles, also used after a failed cycle.
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 600;

/// Default timeout applied to every outbound HTTP request.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// The three opaque secrets the bot needs. Values are never inspected,
/// only passed through to the transports.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    /// Token for the review API (`API_TOKEN`)
    pub api_token: Option<String>,

    /// Telegram bot token (`MESSAGING_TOKEN`)
    pub messaging_token: Option<String>,

    /// Destination chat id (`CHANNEL_ID`)
    pub channel_id: Option<String>,
}

impl Credentials {
    /// Startup check: satisfied unless all three secrets are absent at once.
    pub fn any_present(&self) -> bool {
        self.api_token.is_some() || self.messaging_token.is_some() || self.channel_id.is_some()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn redact(value: &Option<String>) -> &'static str {
            if value.is_some() { "<set>" } else { "<unset>" }
        }

        f.debug_struct("Credentials")
            .field("api_token", &redact(&self.api_token))
            .field("messaging_token", &redact(&self.messaging_token))
            .field("channel_id", &redact(&self.channel_id))
            .finish()
    }
}

/// Application configuration, built once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub credentials: Credentials,

    /// Review API endpoint polled every cycle
    pub api_endpoint: String,

    /// Telegram Bot API base URL
    pub telegram_api_url: String,

    /// Fixed interval between cycles, in seconds (default: 600)
    pub poll_interval_secs: u64,

    /// Outbound HTTP request timeout, in seconds (default: 30)
    pub request_timeout_secs: u64,
}

impl AppConfig {
    /// Load configuration from environment variables, reading `.env` first if present.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Empty values behave like unset ones.
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Ok(Self {
            credentials: Credentials {
                api_token: get("API_TOKEN"),
                messaging_token: get("MESSAGING_TOKEN"),
                channel_id: get("CHANNEL_ID"),
            },
            api_endpoint: get("API_ENDPOINT").unwrap_or_else(|| DEFAULT_API_ENDPOINT.to_string()),
            telegram_api_url: get("TELEGRAM_API_URL")
                .unwrap_or_else(|| DEFAULT_TELEGRAM_API_URL.to_string()),
            poll_interval_secs: get("POLL_INTERVAL_SECS")
                .unwrap_or_else(|| DEFAULT_POLL_INTERVAL_SECS.to_string())
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or_else(|| anyhow::anyhow!("POLL_INTERVAL_SECS must be a positive integer"))?,
            request_timeout_secs: get("REQUEST_TIMEOUT_SECS")
                .unwrap_or_else(|| DEFAULT_REQUEST_TIMEOUT_SECS.to_string())
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or_else(|| anyhow::anyhow!("REQUEST_TIMEOUT_SECS must be a positive integer"))?,
        })
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_environment_is_empty() {
        let config = AppConfig::from_lookup(lookup(&[])).unwrap();

        assert_eq!(config.credentials, Credentials::default());
        assert_eq!(config.api_endpoint, DEFAULT_API_ENDPOINT);
        assert_eq!(config.telegram_api_url, DEFAULT_TELEGRAM_API_URL);
        assert_eq!(config.poll_interval(), Duration::from_secs(600));
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_reads_secrets_and_overrides() {
        let config = AppConfig::from_lookup(lookup(&[
            ("API_TOKEN", "api"),
            ("MESSAGING_TOKEN", "bot"),
            ("CHANNEL_ID", "42"),
            ("API_ENDPOINT", "http://localhost/statuses/"),
            ("POLL_INTERVAL_SECS", "5"),
        ]))
        .unwrap();

        assert_eq!(config.credentials.api_token.as_deref(), Some("api"));
        assert_eq!(config.credentials.messaging_token.as_deref(), Some("bot"));
        assert_eq!(config.credentials.channel_id.as_deref(), Some("42"));
        assert_eq!(config.api_endpoint, "http://localhost/statuses/");
        assert_eq!(config.poll_interval_secs, 5);
    }

    #[test]
    fn test_empty_values_count_as_absent() {
        let config = AppConfig::from_lookup(lookup(&[("API_TOKEN", ""), ("CHANNEL_ID", "  ")]))
            .unwrap();
        assert!(!config.credentials.any_present());
    }

    #[test]
    fn test_invalid_interval_is_rejected() {
        let err = AppConfig::from_lookup(lookup(&[("POLL_INTERVAL_SECS", "ten")])).unwrap_err();
        assert!(err.to_string().contains("POLL_INTERVAL_SECS"));
    }

    #[test]
    fn test_zero_durations_are_rejected() {
        let err = AppConfig::from_lookup(lookup(&[("POLL_INTERVAL_SECS", "0")])).unwrap_err();
        assert!(err.to_string().contains("POLL_INTERVAL_SECS must be a positive integer"));

        let err = AppConfig::from_lookup(lookup(&[("REQUEST_TIMEOUT_SECS", "0")])).unwrap_err();
        assert!(err.to_string().contains("REQUEST_TIMEOUT_SECS"));
    }

    #[test]
    fn test_any_present_needs_only_one_secret() {
        let creds = Credentials {
            channel_id: Some("1".into()),
            ..Default::default()
        };
        assert!(creds.any_present());
        assert!(!Credentials::default().any_present());
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let creds = Credentials {
            api_token: Some("super-secret".into()),
            ..Default::default()
        };
        let rendered = format!("{:?}", creds);
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("<set>"));
    }
}
