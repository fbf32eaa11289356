//! Header-only probes of candidate links.

use async_trait::async_trait;
use reqwest::header::{CONTENT_LENGTH, CONTENT_TYPE};
use reqwest::redirect::Policy;
use reqwest::Client;
use thiserror::Error;

use crate::config::ProbeConfig;

/// What a completed probe reported.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProbeResponse {
    /// HTTP status code (always below 500).
    pub status: u16,
    /// `Content-Type` header, if present.
    pub content_type: Option<String>,
    /// `Content-Length` header, if present and numeric.
    pub content_length: Option<u64>,
}

impl ProbeResponse {
    /// Creates a response with just a status code.
    #[must_use]
    pub const fn with_status(status: u16) -> Self {
        Self {
            status,
            content_type: None,
            content_length: None,
        }
    }

    /// Sets the content type.
    #[must_use]
    pub fn content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Sets the content length.
    #[must_use]
    pub fn content_length(mut self, bytes: u64) -> Self {
        self.content_length = Some(bytes);
        self
    }

    /// Whether the server declared a PDF body.
    #[must_use]
    pub fn declares_pdf(&self) -> bool {
        self.content_type
            .as_deref()
            .is_some_and(|ct| ct.to_ascii_lowercase().contains("application/pdf"))
    }
}

/// Why a probe produced no usable response.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProbeFailure {
    /// The probe exceeded its timeout.
    #[error("probe timed out")]
    Timeout,
    /// The connection could not be established (including DNS failures).
    #[error("connection failed: {0}")]
    Connect(String),
    /// The redirect cap was exceeded.
    #[error("too many redirects")]
    TooManyRedirects,
    /// The server answered with a 5xx status.
    #[error("server error: HTTP {0}")]
    ServerError(u16),
    /// The URL could not be requested at all.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    /// Any other transport failure.
    #[error("transport error: {0}")]
    Other(String),
}

impl From<reqwest::Error> for ProbeFailure {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_redirect() {
            Self::TooManyRedirects
        } else if err.is_connect() {
            Self::Connect(err.to_string())
        } else if err.is_builder() {
            Self::InvalidRequest(err.to_string())
        } else {
            Self::Other(err.to_string())
        }
    }
}

/// Outcome of one probe.
pub type ProbeResult = std::result::Result<ProbeResponse, ProbeFailure>;

/// Protocol for issuing header-only requests.
#[async_trait]
pub trait LinkProbe: Send + Sync {
    /// Probes a URL without downloading its body.
    async fn probe(&self, url: &str) -> ProbeResult;
}

/// `HEAD`-based probe with a bounded timeout and redirect cap.
#[derive(Debug, Clone)]
pub struct HttpLinkProbe {
    client: Client,
}

impl HttpLinkProbe {
    /// Creates a probe from configuration.
    pub fn new(config: &ProbeConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(config.timeout())
            .redirect(Policy::limited(config.max_redirects))
            .build()?;
        Ok(Self { client })
    }

    /// Creates a probe around an existing client.
    ///
    /// The client's timeout and redirect policy apply as configured.
    #[must_use]
    pub const fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl LinkProbe for HttpLinkProbe {
    async fn probe(&self, url: &str) -> ProbeResult {
        let response = self.client.head(url).send().await?;
        let status = response.status().as_u16();
        if status >= 500 {
            return Err(ProbeFailure::ServerError(status));
        }

        let headers = response.headers();
        let content_type = headers
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let content_length = headers
            .get(CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u64>().ok());

        Ok(ProbeResponse {
            status,
            content_type,
            content_length,
        })
    }
}
