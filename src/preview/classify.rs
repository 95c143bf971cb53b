use url::{ParseError, Url};

use crate::models::Platform;

/// Classify a link by its host. Total: anything unrecognised, including
/// strings that are not URLs at all, is `Platform::Other`.
///
/// Checks run YouTube, then X, then Instagram. Matching is on the host
/// (exact or subdomain), so `netflix.com` is not mistaken for `x.com`.
pub fn classify(url: &str) -> Platform {
    let Some(host) = host_of(url) else {
        return Platform::Other;
    };

    if host_matches(&host, &["youtube.com", "youtu.be", "youtube-nocookie.com"]) {
        Platform::Youtube
    } else if host_matches(&host, &["x.com", "twitter.com"]) {
        Platform::X
    } else if host_matches(&host, &["instagram.com"]) {
        Platform::Instagram
    } else {
        Platform::Other
    }
}

fn host_matches(host: &str, domains: &[&str]) -> bool {
    domains.iter().any(|domain| {
        host == *domain
            || host
                .strip_suffix(domain)
                .is_some_and(|prefix| prefix.ends_with('.'))
    })
}

/// Lower-cased host of `raw`. Scheme-less input such as `youtu.be/abc` is
/// read as if it had `https://` in front; input that already has a scheme
/// but no host (`mailto:`, `data:`) has no host.
fn host_of(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    let parsed = match Url::parse(trimmed) {
        Ok(url) => url,
        Err(ParseError::RelativeUrlWithoutBase) => Url::parse(&format!("https://{trimmed}")).ok()?,
        Err(_) => return None,
    };

    parsed
        .host_str()
        .map(|h| h.trim_end_matches('.').to_ascii_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn youtube_hosts() {
        assert_eq!(classify("https://youtu.be/abc12345678"), Platform::Youtube);
        assert_eq!(
            classify("https://www.youtube.com/watch?v=dQw4w9WgXcQ"),
            Platform::Youtube
        );
        assert_eq!(
            classify("https://m.youtube.com/watch?v=dQw4w9WgXcQ"),
            Platform::Youtube
        );
        assert_eq!(
            classify("https://music.youtube.com/watch?v=dQw4w9WgXcQ"),
            Platform::Youtube
        );
    }

    #[test]
    fn x_hosts() {
        assert_eq!(classify("https://x.com/u/status/123"), Platform::X);
        assert_eq!(
            classify("https://twitter.com/jack/status/20"),
            Platform::X
        );
        assert_eq!(
            classify("https://mobile.twitter.com/jack/status/20"),
            Platform::X
        );
    }

    #[test]
    fn instagram_hosts() {
        assert_eq!(classify("https://instagram.com/p/abc"), Platform::Instagram);
        assert_eq!(
            classify("https://www.instagram.com/reel/Cxyz_12/"),
            Platform::Instagram
        );
    }

    #[test]
    fn everything_else_is_other() {
        assert_eq!(classify("https://example.com"), Platform::Other);
        assert_eq!(classify("https://netflix.com/title/1"), Platform::Other);
        assert_eq!(classify("https://notyoutube.com/watch"), Platform::Other);
        assert_eq!(
            classify("https://example.com/?ref=youtube.com"),
            Platform::Other
        );
    }

    #[test]
    fn total_over_garbage_input() {
        for input in ["", "   ", "not a url", "://", "mailto:someone@x.com", "🦀"] {
            let platform = classify(input);
            assert!(matches!(
                platform,
                Platform::Youtube | Platform::X | Platform::Instagram | Platform::Other
            ));
        }
        assert_eq!(classify(""), Platform::Other);
    }

    #[test]
    fn schemes_without_host_are_other() {
        assert_eq!(classify("mailto:someone@x.com"), Platform::Other);
        assert_eq!(classify("mailto:fan@youtube.com"), Platform::Other);
        assert_eq!(classify("data:text/plain,instagram.com"), Platform::Other);
    }

    #[test]
    fn nocookie_embeds_are_youtube() {
        assert_eq!(
            classify("https://www.youtube-nocookie.com/embed/dQw4w9WgXcQ"),
            Platform::Youtube
        );
    }

    #[test]
    fn scheme_less_and_mixed_case_hosts() {
        assert_eq!(classify("youtu.be/abc12345678"), Platform::Youtube);
        assert_eq!(classify("HTTPS://WWW.YOUTUBE.COM/watch?v=x"), Platform::Youtube);
        assert_eq!(classify("x.com/u/status/1"), Platform::X);
    }

    #[test]
    fn deterministic() {
        let url = "https://www.instagram.com/p/Cabc123/?igsh=xyz";
        assert_eq!(classify(url), classify(url));
    }
}
