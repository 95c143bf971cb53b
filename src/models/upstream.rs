//! Response shapes of the third-party metadata APIs. Only the fields the
//! strategies read are modelled; everything else is ignored by serde.

use serde::Deserialize;

// ============================================================================
// YouTube Data API v3 (`videos?part=snippet`)
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct YouTubeVideoList {
    #[serde(default)]
    pub items: Vec<YouTubeVideo>,
}

#[derive(Debug, Deserialize)]
pub struct YouTubeVideo {
    pub snippet: YouTubeSnippet,
}

#[derive(Debug, Deserialize)]
pub struct YouTubeSnippet {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub thumbnails: YouTubeThumbnails,
}

#[derive(Debug, Default, Deserialize)]
pub struct YouTubeThumbnails {
    pub high: Option<YouTubeThumbnail>,
    pub medium: Option<YouTubeThumbnail>,
    pub default: Option<YouTubeThumbnail>,
}

impl YouTubeThumbnails {
    /// Highest resolution offered, preferring `high`.
    pub fn best_url(&self) -> Option<&str> {
        [&self.high, &self.medium, &self.default]
            .into_iter()
            .flatten()
            .map(|t| t.url.as_str())
            .next()
    }
}

#[derive(Debug, Deserialize)]
pub struct YouTubeThumbnail {
    pub url: String,
}

// ============================================================================
// oEmbed (publish.twitter.com and Graph instagram_oembed)
// ============================================================================

#[derive(Debug, Default, Deserialize)]
pub struct OEmbedResponse {
    pub author_name: Option<String>,
    pub title: Option<String>,
    pub html: Option<String>,
    pub thumbnail_url: Option<String>,
}
