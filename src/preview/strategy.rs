//! The individual ways of turning a URL into a [`PreviewData`]. Each one is a
//! single pass: fetch, map, return. Ordering and fallback live in the
//! resolver.

use urlencoding::encode;

use crate::error::{AppResult, PreviewError};
use crate::models::upstream::{OEmbedResponse, YouTubeVideoList};
use crate::models::{Platform, PreviewData};

use super::html::{
    collapse_whitespace, extract_page_metadata, strip_tags, truncate_chars, MAX_CONTEXT_CHARS,
};
use super::http::{HttpFetch, API_USER_AGENT, BROWSER_USER_AGENT};

pub const YOUTUBE_VIDEOS_ENDPOINT: &str = "https://www.googleapis.com/youtube/v3/videos";
pub const X_OEMBED_ENDPOINT: &str = "https://publish.twitter.com/oembed";
pub const INSTAGRAM_OEMBED_ENDPOINT: &str = "https://graph.facebook.com/v19.0/instagram_oembed";

/// Title used when a scraped page offers nothing better.
pub const UNTITLED: &str = "No Title Found";

/// One step in a resolution plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Strategy {
    YouTubeApi { video_id: String },
    XOEmbed { canonical_url: String },
    InstagramOEmbed { canonical_url: String },
    Scrape,
}

impl Strategy {
    pub fn name(&self) -> &'static str {
        match self {
            Strategy::YouTubeApi { .. } => "youtube_api",
            Strategy::XOEmbed { .. } => "x_oembed",
            Strategy::InstagramOEmbed { .. } => "instagram_oembed",
            Strategy::Scrape => "scrape",
        }
    }
}

// ============================================================================
// YouTube Data API
// ============================================================================

pub async fn youtube_api(
    http: &dyn HttpFetch,
    api_key: &str,
    video_id: &str,
) -> AppResult<PreviewData> {
    let api_url = format!(
        "{YOUTUBE_VIDEOS_ENDPOINT}?part=snippet&id={}&key={}",
        encode(video_id),
        encode(api_key)
    );
    let body = http.get_text(&api_url, API_USER_AGENT).await?;
    let list: YouTubeVideoList = serde_json::from_str(&body)?;

    let video = list
        .items
        .into_iter()
        .next()
        .ok_or_else(|| PreviewError::Malformed("YouTube video not found".into()))?;
    let snippet = video.snippet;

    let context = if snippet.description.trim().is_empty() {
        snippet.title.clone()
    } else {
        snippet.description.clone()
    };

    Ok(PreviewData {
        thumbnail_url: snippet.thumbnails.best_url().map(str::to_string),
        title: snippet.title,
        description: Some(snippet.description),
        platform: Platform::Youtube,
        context,
        embed_html: None,
    })
}

// ============================================================================
// oEmbed
// ============================================================================

pub async fn x_oembed(http: &dyn HttpFetch, canonical_url: &str) -> AppResult<PreviewData> {
    let oembed_url = format!("{X_OEMBED_ENDPOINT}?url={}", encode(canonical_url));
    let body = http.get_text(&oembed_url, API_USER_AGENT).await?;
    let data: OEmbedResponse = serde_json::from_str(&body)?;

    let html = data
        .html
        .filter(|h| !h.trim().is_empty())
        .ok_or_else(|| PreviewError::Malformed("X oEmbed response has no html".into()))?;
    let text = strip_tags(&html);

    Ok(PreviewData {
        title: x_title(data.author_name.as_deref()),
        description: Some(text.clone()),
        // oEmbed for X carries no thumbnail.
        thumbnail_url: Some(String::new()),
        platform: Platform::X,
        context: text,
        embed_html: Some(html),
    })
}

pub async fn instagram_oembed(
    http: &dyn HttpFetch,
    canonical_url: &str,
    access_token: &str,
) -> AppResult<PreviewData> {
    let oembed_url = format!(
        "{INSTAGRAM_OEMBED_ENDPOINT}?url={}&access_token={}",
        encode(canonical_url),
        encode(access_token)
    );
    let body = http.get_text(&oembed_url, API_USER_AGENT).await?;
    let data: OEmbedResponse = serde_json::from_str(&body)?;

    let caption = data
        .title
        .map(|t| collapse_whitespace(&t))
        .filter(|t| !t.is_empty());
    let byline = post_title(data.author_name.as_deref(), "Instagram post");

    Ok(PreviewData {
        title: caption.clone().unwrap_or_else(|| byline.clone()),
        description: Some(caption.clone().unwrap_or_default()),
        thumbnail_url: Some(data.thumbnail_url.unwrap_or_default()),
        platform: Platform::Instagram,
        context: caption.unwrap_or(byline),
        embed_html: None,
    })
}

fn non_blank(author: Option<&str>) -> Option<&str> {
    author.map(str::trim).filter(|a| !a.is_empty())
}

fn x_title(author: Option<&str>) -> String {
    match non_blank(author) {
        Some(author) => format!("{author} on X"),
        None => "Post on X".to_string(),
    }
}

fn post_title(author: Option<&str>, anonymous: &str) -> String {
    match non_blank(author) {
        Some(author) => format!("Post by {author}"),
        None => anonymous.to_string(),
    }
}

// ============================================================================
// Generic scrape
// ============================================================================

/// Fetch the page itself and read Open Graph / meta tags. The result is
/// tagged with whatever platform the caller classified the URL as.
pub async fn scrape(http: &dyn HttpFetch, url: &str, platform: Platform) -> AppResult<PreviewData> {
    let html = http.get_text(url, BROWSER_USER_AGENT).await?;
    let meta = extract_page_metadata(&html, url);

    let title = meta.title.unwrap_or_else(|| UNTITLED.to_string());
    let description = meta.description.unwrap_or_default();
    let context = [meta.text.as_str(), description.as_str()]
        .into_iter()
        .find(|s| !s.is_empty())
        .unwrap_or(title.as_str());
    let context = truncate_chars(context, MAX_CONTEXT_CHARS);

    Ok(PreviewData {
        title,
        description: Some(description),
        thumbnail_url: Some(meta.image.unwrap_or_default()),
        platform,
        context,
        embed_html: None,
    })
}
