// Each integration test file is a separate binary; helpers not used in every
// binary would otherwise trigger dead_code warnings from clippy.
#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use brain_preview::config::PreviewConfig;
use brain_preview::error::FetchError;
use brain_preview::preview::{HttpFetch, PreviewResolver};

/// One recorded outbound request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub url: String,
    pub user_agent: String,
}

#[derive(Debug, Clone)]
enum Reply {
    Body(String),
    Status(u16),
}

/// In-memory `HttpFetch` that answers from a fixed script and records every
/// request. Routes match on URL prefix, first match wins; unrouted URLs get
/// a 404.
#[derive(Default)]
pub struct ScriptedFetcher {
    routes: Vec<(String, Reply)>,
    calls: Mutex<Vec<Call>>,
}

impl ScriptedFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(mut self, prefix: &str, body: impl Into<String>) -> Self {
        self.routes
            .push((prefix.to_string(), Reply::Body(body.into())));
        self
    }

    pub fn fail(mut self, prefix: &str, status: u16) -> Self {
        self.routes.push((prefix.to_string(), Reply::Status(status)));
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn urls(&self) -> Vec<String> {
        self.calls().into_iter().map(|c| c.url).collect()
    }
}

#[async_trait]
impl HttpFetch for ScriptedFetcher {
    async fn get_text(&self, url: &str, user_agent: &str) -> Result<String, FetchError> {
        self.calls.lock().unwrap().push(Call {
            url: url.to_string(),
            user_agent: user_agent.to_string(),
        });

        let reply = self
            .routes
            .iter()
            .find(|(prefix, _)| url.starts_with(prefix.as_str()))
            .map(|(_, reply)| reply.clone())
            .unwrap_or(Reply::Status(404));

        match reply {
            Reply::Body(body) => Ok(body),
            Reply::Status(status) => Err(FetchError::Status {
                status,
                url: url.to_string(),
            }),
        }
    }
}

// ── Config helpers ───────────────────────────────────────────────────────────

pub fn no_credentials() -> PreviewConfig {
    PreviewConfig::default()
}

pub fn all_credentials() -> PreviewConfig {
    PreviewConfig {
        youtube_api_key: Some("yt-key".into()),
        instagram_app_id: Some("app".into()),
        instagram_client_token: Some("token".into()),
    }
}

/// Resolver wired to `fetcher`; the returned handle keeps access to the
/// recorded calls.
pub fn resolver_with(
    config: PreviewConfig,
    fetcher: ScriptedFetcher,
) -> (PreviewResolver, Arc<ScriptedFetcher>) {
    let fetcher = Arc::new(fetcher);
    let resolver = PreviewResolver::new(config, fetcher.clone());
    (resolver, fetcher)
}

// ── Fixtures ─────────────────────────────────────────────────────────────────

pub fn og_page(title: &str, description: &str, image: &str, body: &str) -> String {
    format!(
        r#"<!doctype html>
<html>
  <head>
    <title>Fallback title</title>
    <meta property="og:title" content="{title}">
    <meta property="og:description" content="{description}">
    <meta property="og:image" content="{image}">
  </head>
  <body>{body}</body>
</html>"#
    )
}

pub fn youtube_video_json(title: &str, description: &str) -> String {
    serde_json::json!({
        "kind": "youtube#videoListResponse",
        "items": [{
            "id": "dQw4w9WgXcQ",
            "snippet": {
                "title": title,
                "description": description,
                "thumbnails": {
                    "default": { "url": "https://i.ytimg.com/vi/dQw4w9WgXcQ/default.jpg" },
                    "high": { "url": "https://i.ytimg.com/vi/dQw4w9WgXcQ/hqdefault.jpg" }
                }
            }
        }]
    })
    .to_string()
}

pub fn x_oembed_json() -> String {
    serde_json::json!({
        "url": "https://twitter.com/rustlang/status/42",
        "author_name": "Rust Language",
        "author_url": "https://twitter.com/rustlang",
        "html": "<blockquote class=\"twitter-tweet\"><p lang=\"en\" dir=\"ltr\">Rust 1.80 is out &amp; stable!</p>&mdash; Rust Language (@rustlang) <a href=\"https://twitter.com/rustlang/status/42\">July 25, 2024</a></blockquote>\n<script async src=\"https://platform.twitter.com/widgets.js\" charset=\"utf-8\"></script>\n",
        "type": "rich",
        "provider_name": "Twitter"
    })
    .to_string()
}

pub fn instagram_oembed_json() -> String {
    serde_json::json!({
        "version": "1.0",
        "author_name": "ferris",
        "title": "Crab on the beach",
        "thumbnail_url": "https://scontent.cdninstagram.com/thumb.jpg",
        "provider_name": "Instagram",
        "type": "rich"
    })
    .to_string()
}
