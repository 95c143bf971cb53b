use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use url::Url;

/// Upper bound on the extracted page text kept as chat context.
pub const MAX_CONTEXT_CHARS: usize = 4000;

static TITLE: Lazy<Selector> = Lazy::new(|| Selector::parse("title").expect("valid selector"));
static BODY: Lazy<Selector> = Lazy::new(|| Selector::parse("body").expect("valid selector"));

/// Metadata found in a fetched page. `None` means the page carried no
/// non-blank value for that field.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PageMetadata {
    pub title: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    /// Visible body text, whitespace-collapsed and capped at
    /// [`MAX_CONTEXT_CHARS`].
    pub text: String,
}

// ── Public helpers ─────────────────────────────────────────────────────────

/// Parse Open Graph tags from `html`, falling back to plain `meta[name]`
/// tags and then `<title>`. Relative image URLs are resolved against
/// `base_url`.
pub fn extract_page_metadata(html: &str, base_url: &str) -> PageMetadata {
    let document = Html::parse_document(html);

    let title = get_meta_property(&document, "og:title")
        .or_else(|| get_meta_name(&document, "twitter:title"))
        .or_else(|| get_title_tag(&document));

    let description = get_meta_property(&document, "og:description")
        .or_else(|| get_meta_name(&document, "description"));

    let image = get_meta_property(&document, "og:image")
        .or_else(|| get_meta_name(&document, "twitter:image"))
        .map(|src| absolutize(&src, base_url));

    PageMetadata {
        title,
        description,
        image,
        text: truncate_chars(&visible_body_text(&document), MAX_CONTEXT_CHARS),
    }
}

/// Text content of an HTML fragment with tags removed, entities decoded and
/// whitespace collapsed. Script and style contents are dropped.
pub fn strip_tags(fragment: &str) -> String {
    visible_text(Html::parse_fragment(fragment).root_element())
}

pub fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// First `max` characters of `s` (never splits a code point).
pub fn truncate_chars(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((idx, _)) => s[..idx].trim_end().to_string(),
        None => s.to_string(),
    }
}

// ── Selectors ──────────────────────────────────────────────────────────────

fn get_meta_property(doc: &Html, property: &str) -> Option<String> {
    let selector = Selector::parse(&format!(r#"meta[property="{property}"]"#)).ok()?;
    doc.select(&selector)
        .next()
        .and_then(|el| el.value().attr("content"))
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn get_meta_name(doc: &Html, name: &str) -> Option<String> {
    let selector = Selector::parse(&format!(r#"meta[name="{name}"]"#)).ok()?;
    doc.select(&selector)
        .next()
        .and_then(|el| el.value().attr("content"))
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn get_title_tag(doc: &Html) -> Option<String> {
    doc.select(&TITLE)
        .next()
        .map(|el| collapse_whitespace(&el.text().collect::<String>()))
        .filter(|s| !s.is_empty())
}

fn visible_body_text(doc: &Html) -> String {
    doc.select(&BODY)
        .next()
        .map(visible_text)
        .unwrap_or_default()
}

fn visible_text(root: ElementRef<'_>) -> String {
    let mut out = String::new();
    for node in root.descendants() {
        let Some(text) = node.value().as_text() else {
            continue;
        };
        let hidden = node.ancestors().any(|ancestor| {
            ancestor.value().as_element().is_some_and(|el| {
                matches!(el.name(), "script" | "style" | "noscript" | "template")
            })
        });
        if !hidden {
            out.push_str(text);
            out.push(' ');
        }
    }
    collapse_whitespace(&out)
}

fn absolutize(src: &str, base_url: &str) -> String {
    Url::parse(base_url)
        .and_then(|base| base.join(src))
        .map(|u| u.to_string())
        .unwrap_or_else(|_| src.to_string())
}
