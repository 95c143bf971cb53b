use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

static YOUTUBE_ID_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i:youtube(?:-nocookie)?\.com/(?:[^/]+/.+/|(?:v|e(?:mbed)?)/|.*[?&]v=)|youtu\.be/)([^"&?/ ]{11})"#)
        .expect("valid youtube id regex")
});

static X_STATUS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)https?://(?:[a-z0-9-]+\.)*(?:twitter|x)\.com/[a-z0-9_]+/status/[0-9]+")
        .expect("valid x status regex")
});

static INSTAGRAM_POST_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i:https?://(?:[a-z0-9-]+\.)*instagram\.com/(?:p|reel|tv|stories)/)[a-zA-Z0-9\-_]+")
        .expect("valid instagram post regex")
});

/// Extract the 11-character video ID from a YouTube URL.
///
/// Handles `watch?v=`, `embed/`, `v/`, `youtu.be/`, playlist-embedded
/// watch links, `shorts/`, `live/` and the `youtube-nocookie.com` embed
/// host, with any host casing. Returns `None` when no ID is present.
pub fn youtube_video_id(url: &str) -> Option<String> {
    if let Some(id) = YOUTUBE_ID_RE
        .captures(url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .filter(|id| is_video_id(id))
    {
        return Some(id.to_string());
    }

    let parsed = Url::parse(url.trim()).ok()?;
    let host = parsed.host_str()?.to_ascii_lowercase();
    let mut segments = parsed.path_segments()?.filter(|s| !s.is_empty());

    let candidate = if host == "youtu.be" {
        segments.next().map(str::to_string)
    } else if ["youtube.com", "youtube-nocookie.com"]
        .iter()
        .any(|domain| host == *domain || host.ends_with(&format!(".{domain}")))
    {
        match segments.next() {
            Some("shorts") | Some("live") => segments.next().map(str::to_string),
            _ => parsed
                .query_pairs()
                .find(|(key, _)| key == "v")
                .map(|(_, value)| value.into_owned()),
        }
    } else {
        None
    };

    candidate.filter(|id| is_video_id(id))
}

fn is_video_id(id: &str) -> bool {
    id.len() == 11
        && id
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
}

/// Reduce an X/Twitter post URL to `https://<host>/<user>/status/<id>`,
/// dropping tracking query strings, fragments and trailing segments such as
/// `/photo/1`. Host matching ignores case and accepts any subdomain, like
/// the classifier does. URLs that do not look like a post are returned
/// unchanged.
pub fn sanitize_x_url(url: &str) -> String {
    X_STATUS_RE
        .find(url)
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| url.to_string())
}

/// Reduce an Instagram URL to its `/p|reel|tv|stories/<id>` form. URLs that
/// do not match are returned unchanged.
pub fn sanitize_instagram_url(url: &str) -> String {
    INSTAGRAM_POST_RE
        .find(url)
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| url.to_string())
}
