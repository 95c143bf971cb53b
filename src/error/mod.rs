use thiserror::Error;

/// Failures raised by the HTTP seam before any preview mapping happens.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Upstream returned {status} for {url}")]
    Status { status: u16, url: String },

    #[error("Host is private or reserved: {0}")]
    BlockedHost(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Too many redirects starting from {0}")]
    TooManyRedirects(String),
}

#[derive(Error, Debug)]
pub enum PreviewError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Upstream error: {0}")]
    Upstream(#[from] FetchError),

    #[error("Malformed upstream payload: {0}")]
    Malformed(String),

    /// Every planned strategy failed. `cause` is the primary strategy's error.
    #[error("Could not fetch preview for {url} after {attempts} attempt(s): {cause}")]
    PreviewFetch {
        url: String,
        attempts: usize,
        #[source]
        cause: Box<PreviewError>,
    },
}

impl PreviewError {
    /// Whether the resolver may move on to the next strategy after this error.
    ///
    /// Bad input and missing credentials are surfaced as-is; only failures
    /// that came back from the network are worth another strategy.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, PreviewError::Upstream(_) | PreviewError::Malformed(_))
    }
}

impl From<serde_json::Error> for PreviewError {
    fn from(e: serde_json::Error) -> Self {
        PreviewError::Malformed(e.to_string())
    }
}

pub type AppResult<T> = Result<T, PreviewError>;

#[cfg(test)]
mod tests {
    use std::error::Error as _;

    use super::*;

    #[test]
    fn upstream_and_malformed_are_recoverable() {
        let status = FetchError::Status {
            status: 503,
            url: "https://example.com".into(),
        };
        assert!(PreviewError::Upstream(status).is_recoverable());
        assert!(PreviewError::Malformed("missing items".into()).is_recoverable());
    }

    #[test]
    fn input_and_config_errors_are_terminal() {
        assert!(!PreviewError::InvalidInput("no video id".into()).is_recoverable());
        assert!(!PreviewError::Config("FB_APP_ID".into()).is_recoverable());
    }

    #[test]
    fn preview_fetch_exposes_primary_cause_as_source() {
        let err = PreviewError::PreviewFetch {
            url: "https://x.com/a/status/1".into(),
            attempts: 2,
            cause: Box::new(PreviewError::Malformed("no html".into())),
        };
        let source = err.source().expect("source should be set");
        assert_eq!(source.to_string(), "Malformed upstream payload: no html");
        assert!(err.to_string().contains("after 2 attempt(s)"));
    }

    #[test]
    fn json_errors_map_to_malformed() {
        let json_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: PreviewError = json_err.into();
        assert!(matches!(err, PreviewError::Malformed(_)));
    }

    #[test]
    fn status_error_message_names_status_and_url() {
        let err = FetchError::Status {
            status: 404,
            url: "https://example.com/missing".into(),
        };
        assert_eq!(
            err.to_string(),
            "Upstream returned 404 for https://example.com/missing"
        );
    }
}
