use std::net::IpAddr;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{LOCATION, USER_AGENT};
use reqwest::redirect::Policy;
use url::Url;

use crate::error::FetchError;

/// Sent when scraping arbitrary pages. Many sites block obvious bot agents,
/// so this mirrors a desktop browser.
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Sent to the metadata APIs (YouTube Data, oEmbed).
pub const API_USER_AGENT: &str = concat!("brain-preview/", env!("CARGO_PKG_VERSION"));

/// Redirect hops followed before giving up.
pub const MAX_REDIRECTS: usize = 5;

/// Response bodies are cut off after this many bytes.
pub const MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

/// Outbound GET used by every preview strategy. Implementations must return
/// `FetchError::Status` for non-2xx responses.
#[async_trait]
pub trait HttpFetch: Send + Sync {
    async fn get_text(&self, url: &str, user_agent: &str) -> Result<String, FetchError>;
}

// ── Public helpers ─────────────────────────────────────────────────────────

/// Returns `true` if `ip` is a private, loopback, or link-local address.
pub fn is_private_ip(ip: IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => {
            let o = v4.octets();
            matches!(
                o,
                [127, ..]
                    | [10, ..]
                    | [169, 254, ..]
                    | [192, 168, ..]
                    | [0, ..]
                    | [255, 255, 255, 255]
            ) || (o[0] == 172 && (16..=31).contains(&o[1]))
        }
        IpAddr::V6(v6) => {
            if let Some(mapped) = v6.to_ipv4_mapped() {
                return is_private_ip(IpAddr::V4(mapped));
            }
            v6.is_loopback()
                || v6.is_unspecified()
                || (v6.segments()[0] & 0xfe00 == 0xfc00)
                || (v6.segments()[0] & 0xffc0 == 0xfe80)
        }
    }
}

// ── reqwest implementation ─────────────────────────────────────────────────

/// Production fetcher: one pooled `reqwest::Client` shared by all calls.
///
/// Redirects are followed here rather than by `reqwest`, so every hop goes
/// through the same host check as the first request.
#[derive(Clone)]
pub struct ReqwestFetcher {
    client: reqwest::Client,
    allow_private_hosts: bool,
}

impl ReqwestFetcher {
    pub fn new(timeout: Duration, allow_private_hosts: bool) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .redirect(Policy::none())
            .build()?;
        Ok(Self {
            client,
            allow_private_hosts,
        })
    }

    /// Reject non-http(s) URLs and, unless private hosts are allowed, any
    /// host that resolves to a private or reserved address.
    async fn check_target(&self, url: &str) -> Result<(), FetchError> {
        let parsed = Url::parse(url).map_err(|_| FetchError::InvalidUrl(url.to_string()))?;

        match parsed.scheme() {
            "http" | "https" => {}
            other => {
                return Err(FetchError::InvalidUrl(format!(
                    "unsupported scheme '{other}' in {url}"
                )))
            }
        }

        if self.allow_private_hosts {
            return Ok(());
        }

        let host = parsed
            .host_str()
            .ok_or_else(|| FetchError::InvalidUrl(format!("{url} has no host")))?;
        let port = parsed.port_or_known_default().unwrap_or(80);

        let addrs = tokio::net::lookup_host((host.trim_matches(|c| c == '[' || c == ']'), port))
            .await
            .map_err(|_| FetchError::BlockedHost(format!("could not resolve {host}")))?;

        for addr in addrs {
            if is_private_ip(addr.ip()) {
                return Err(FetchError::BlockedHost(host.to_string()));
            }
        }
        Ok(())
    }
}

#[async_trait]
impl HttpFetch for ReqwestFetcher {
    async fn get_text(&self, url: &str, user_agent: &str) -> Result<String, FetchError> {
        let mut current = url.to_string();

        for _ in 0..=MAX_REDIRECTS {
            self.check_target(&current).await?;

            let response = self
                .client
                .get(&current)
                .header(USER_AGENT, user_agent)
                .send()
                .await
                .map_err(|e| {
                    tracing::warn!(error = ?e, url = %current, "Failed to fetch URL for preview");
                    FetchError::Transport(e)
                })?;

            let status = response.status();
            if status.is_redirection() {
                if let Some(next) = redirect_target(&current, &response) {
                    tracing::debug!(from = %current, to = %next, "Following redirect");
                    current = next;
                    continue;
                }
            }
            if !status.is_success() {
                return Err(FetchError::Status {
                    status: status.as_u16(),
                    url: current,
                });
            }

            return read_capped(response, &current).await;
        }

        Err(FetchError::TooManyRedirects(url.to_string()))
    }
}

/// Absolute URL named by the `Location` header, resolved against `current`.
fn redirect_target(current: &str, response: &reqwest::Response) -> Option<String> {
    let location = response.headers().get(LOCATION)?.to_str().ok()?;
    let base = Url::parse(current).ok()?;
    base.join(location).ok().map(String::from)
}

/// Body as text, reading at most `MAX_BODY_BYTES`. Invalid UTF-8 is replaced.
async fn read_capped(mut response: reqwest::Response, url: &str) -> Result<String, FetchError> {
    let mut body: Vec<u8> = Vec::new();
    while let Some(chunk) = response.chunk().await? {
        let room = MAX_BODY_BYTES - body.len();
        if chunk.len() > room {
            body.extend_from_slice(&chunk[..room]);
            tracing::debug!(url = %url, limit = MAX_BODY_BYTES, "Response body truncated");
            break;
        }
        body.extend_from_slice(&chunk);
    }
    Ok(String::from_utf8_lossy(&body).into_owned())
}
