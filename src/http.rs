//! Blocking-in-order HTTP access used by both pipeline stages.
//!
//! [`HttpGet`] is the seam between the pipeline and the network:
//! - [`ReqwestHttp`]: production client over a shared `reqwest::Client`
//! - [`testing::FakeHttp`]: canned responses for unit tests
//!
//! Status handling is left to the caller through
//! [`HttpResponse::error_for_status`], mirroring reqwest's own API.

use crate::error::FetchError;
use reqwest::Client;
use std::time::{Duration, Instant};
use tracing::{debug, instrument, warn};
use url::Url;

/// A fully read HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Turn a non-2xx response into [`FetchError::Status`].
    pub fn error_for_status(self) -> Result<Self, FetchError> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(FetchError::Status(self.status))
        }
    }
}

/// Trait for issuing a single GET request.
///
/// Implementors return the response for any status code; only failures to
/// get a response at all (bad URL, DNS, refused connection, timeout) are
/// errors.
pub trait HttpGet {
    async fn get(&self, url: &str, timeout: Option<Duration>) -> Result<HttpResponse, FetchError>;
}

/// Parse `url` as an absolute URL, as reqwest would before sending.
pub fn parse_url(url: &str) -> Result<Url, FetchError> {
    Url::parse(url).map_err(|e| FetchError::InvalidUrl {
        url: url.to_string(),
        reason: e.to_string(),
    })
}

/// [`HttpGet`] over reqwest.
#[derive(Debug, Clone)]
pub struct ReqwestHttp {
    client: Client,
}

impl ReqwestHttp {
    pub fn new() -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }
}

impl HttpGet for ReqwestHttp {
    #[instrument(level = "debug", skip_all, fields(%url))]
    async fn get(&self, url: &str, timeout: Option<Duration>) -> Result<HttpResponse, FetchError> {
        let parsed = parse_url(url)?;
        let t0 = Instant::now();

        let mut request = self.client.get(parsed);
        if let Some(timeout) = timeout {
            request = request.timeout(timeout);
        }

        let result = async {
            let response = request.send().await?;
            let status = response.status().as_u16();
            let body = response.text().await?;
            Ok::<_, reqwest::Error>(HttpResponse { status, body })
        }
        .await;

        let elapsed_ms = t0.elapsed().as_millis();
        match result {
            Ok(response) => {
                debug!(status = response.status, bytes = response.body.len(), elapsed_ms, "GET complete");
                Ok(response)
            }
            Err(e) => {
                warn!(elapsed_ms, error = %e, "GET failed");
                Err(FetchError::Transport(e.to_string()))
            }
        }
    }
}
