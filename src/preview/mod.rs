pub mod classify;
pub mod html;
pub mod http;
pub mod strategy;
pub mod urls;

use std::sync::Arc;

use tracing::{debug, info, warn};
use url::Url;

use crate::config::{Config, PreviewConfig};
use crate::error::{AppResult, FetchError, PreviewError};
use crate::models::{Platform, PreviewData};

pub use classify::classify;
pub use http::{HttpFetch, ReqwestFetcher};
pub use strategy::Strategy;
pub use urls::{sanitize_instagram_url, sanitize_x_url, youtube_video_id};

/// Resolves a link into a [`PreviewData`] by running an ordered list of
/// strategies until one succeeds.
///
/// Holds no mutable state, so one resolver can serve any number of
/// concurrent calls.
#[derive(Clone)]
pub struct PreviewResolver {
    config: PreviewConfig,
    http: Arc<dyn HttpFetch>,
}

impl PreviewResolver {
    pub fn new(config: PreviewConfig, http: Arc<dyn HttpFetch>) -> Self {
        Self { config, http }
    }

    /// Resolver backed by a real `reqwest` client built from process config.
    pub fn from_config(config: &Config) -> Result<Self, FetchError> {
        let fetcher = ReqwestFetcher::new(config.fetch_timeout, config.allow_private_hosts)?;
        Ok(Self::new(config.preview.clone(), Arc::new(fetcher)))
    }

    /// Strategies to try for `url`, in order. Performs no I/O.
    ///
    /// Fails with `InvalidInput` for a YouTube link without a video ID and
    /// with `Config` for an Instagram link when Graph credentials are
    /// missing. A missing YouTube key is not an error: the link is scraped.
    pub fn plan(&self, url: &str, platform: Platform) -> AppResult<Vec<Strategy>> {
        let plan = match platform {
            Platform::Youtube => {
                let video_id = youtube_video_id(url).ok_or_else(|| {
                    PreviewError::InvalidInput(format!("no YouTube video ID in {url}"))
                })?;
                if self.config.youtube_api_key.is_some() {
                    vec![Strategy::YouTubeApi { video_id }, Strategy::Scrape]
                } else {
                    warn!(url = %url, "YOUTUBE_API_KEY is not configured; scraping instead");
                    vec![Strategy::Scrape]
                }
            }
            Platform::X => vec![
                Strategy::XOEmbed {
                    canonical_url: sanitize_x_url(url),
                },
                Strategy::Scrape,
            ],
            Platform::Instagram => {
                if self.config.instagram_access_token().is_none() {
                    return Err(PreviewError::Config(
                        "FB_APP_ID and FB_CLIENT_TOKEN are required for Instagram previews".into(),
                    ));
                }
                vec![
                    Strategy::InstagramOEmbed {
                        canonical_url: sanitize_instagram_url(url),
                    },
                    Strategy::Scrape,
                ]
            }
            Platform::Other => vec![Strategy::Scrape],
        };

        let names: Vec<&str> = plan.iter().map(Strategy::name).collect();
        debug!(url = %url, platform = %platform, plan = ?names, "Planned preview strategies");
        Ok(plan)
    }

    /// Resolve `url` into exactly one preview or exactly one error.
    ///
    /// Input and configuration errors are returned as-is. Upstream failures
    /// move on to the next strategy; if every strategy fails the result is
    /// `PreviewError::PreviewFetch` wrapping the first failure.
    pub async fn resolve(&self, url: &str) -> AppResult<PreviewData> {
        let url = validate_url(url)?;
        let platform = classify(&url);
        let plan = self.plan(&url, platform)?;
        let attempts = plan.len();

        let mut first_error: Option<PreviewError> = None;
        for (i, strategy) in plan.iter().enumerate() {
            match self.run(strategy, &url, platform).await {
                Ok(preview) => {
                    if i > 0 {
                        info!(url = %url, strategy = strategy.name(), "Preview resolved by fallback");
                    }
                    return Ok(preview);
                }
                Err(e) if !e.is_recoverable() => return Err(e),
                Err(e) => {
                    warn!(
                        url = %url,
                        platform = %platform,
                        strategy = strategy.name(),
                        error = %e,
                        "Preview strategy failed"
                    );
                    first_error.get_or_insert(e);
                }
            }
        }

        let cause = first_error
            .unwrap_or_else(|| PreviewError::Malformed("no preview strategy available".into()));
        Err(PreviewError::PreviewFetch {
            url,
            attempts,
            cause: Box::new(cause),
        })
    }

    async fn run(&self, strategy: &Strategy, url: &str, platform: Platform) -> AppResult<PreviewData> {
        let http = self.http.as_ref();
        match strategy {
            Strategy::YouTubeApi { video_id } => {
                let api_key = self.config.youtube_api_key.as_deref().ok_or_else(|| {
                    PreviewError::Config("YOUTUBE_API_KEY is not configured".into())
                })?;
                strategy::youtube_api(http, api_key, video_id).await
            }
            Strategy::XOEmbed { canonical_url } => strategy::x_oembed(http, canonical_url).await,
            Strategy::InstagramOEmbed { canonical_url } => {
                let token = self.config.instagram_access_token().ok_or_else(|| {
                    PreviewError::Config(
                        "FB_APP_ID and FB_CLIENT_TOKEN are required for Instagram previews".into(),
                    )
                })?;
                strategy::instagram_oembed(http, canonical_url, &token).await
            }
            Strategy::Scrape => strategy::scrape(http, url, platform).await,
        }
    }
}

/// Trimmed `raw` if it is an absolute http(s) URL with a host.
fn validate_url(raw: &str) -> AppResult<String> {
    let trimmed = raw.trim();
    let parsed = Url::parse(trimmed)
        .map_err(|_| PreviewError::InvalidInput(format!("not a valid URL: {trimmed}")))?;

    match parsed.scheme() {
        "http" | "https" => {}
        other => {
            return Err(PreviewError::InvalidInput(format!(
                "only http/https URLs are supported, got '{other}'"
            )))
        }
    }

    if parsed.host_str().is_none() {
        return Err(PreviewError::InvalidInput(format!("URL has no host: {trimmed}")));
    }

    Ok(trimmed.to_string())
}
