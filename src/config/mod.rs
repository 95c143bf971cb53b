use std::env;
use std::time::Duration;

pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 10;

/// Credentials the preview strategies need. Read once and handed to the
/// resolver at construction time; the resolver never touches the environment.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PreviewConfig {
    /// YouTube Data API key. Absent means YouTube links are scraped instead.
    pub youtube_api_key: Option<String>,
    pub instagram_app_id: Option<String>,
    pub instagram_client_token: Option<String>,
}

impl PreviewConfig {
    /// Build from any key lookup. Empty or whitespace-only values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        PreviewConfig {
            youtube_api_key: get("YOUTUBE_API_KEY"),
            instagram_app_id: get("FB_APP_ID"),
            instagram_client_token: get("FB_CLIENT_TOKEN"),
        }
    }

    /// The Graph API client access token (`<app-id>|<client-token>`), if both
    /// halves are configured.
    pub fn instagram_access_token(&self) -> Option<String> {
        match (&self.instagram_app_id, &self.instagram_client_token) {
            (Some(id), Some(token)) => Some(format!("{id}|{token}")),
            _ => None,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Config {
    pub preview: PreviewConfig,
    pub fetch_timeout: Duration,
    pub allow_private_hosts: bool,
    pub json_logs: bool,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let fetch_timeout = env::var("PREVIEW_FETCH_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .unwrap_or(DEFAULT_FETCH_TIMEOUT_SECS);

        Config {
            preview: PreviewConfig::from_lookup(|key| env::var(key).ok()),
            fetch_timeout: Duration::from_secs(fetch_timeout),
            allow_private_hosts: env::var("PREVIEW_ALLOW_PRIVATE_HOSTS")
                .map(|v| matches!(v.as_str(), "1" | "true" | "yes"))
                .unwrap_or(false),
            json_logs: env::var("APP_ENV").as_deref() == Ok("production"),
        }
    }
}
