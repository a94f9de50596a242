//! HTTP client for the Limitless card database and tournament site.

use std::time::Duration;

use url::Url;

use crate::{user_agent::get_user_agent, Error};

/// Card database host. Card, set and evolution-search pages live here.
pub const CARDS_BASE_URL: &str = "https://pocket.limitlesstcg.com";

/// Tournament host. Listing, standings, decklist and pairing pages live here.
pub const TOURNAMENTS_BASE_URL: &str = "https://play.limitlesstcg.com";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Fetches HTML pages relative to a base URL.
///
/// The underlying `reqwest::Client` is built once and shared by every request,
/// with a browser user agent and a per-request timeout. Absolute URLs are
/// fetched as-is, anything else is joined onto the base URL.
pub struct Client {
    base_url: Url,
    http: reqwest::Client,
}

impl Client {
    /// Creates a client for the given base URL with the default 30 second timeout.
    pub fn new(base_url: &str) -> Result<Self, Error> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    /// Creates a client for the given base URL with a custom request timeout.
    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self, Error> {
        let base_url = Url::parse(base_url).map_err(|e| {
            tracing::error!("Invalid base URL {}: {}", base_url, e);
            Error::InvalidUrl(base_url.to_string())
        })?;
        let http = reqwest::Client::builder()
            .user_agent(get_user_agent())
            .timeout(timeout)
            .build()
            .map_err(|e| {
                tracing::error!("Failed to build HTTP client: {}", e);
                Error::RequestFailed
            })?;
        Ok(Self { base_url, http })
    }

    /// Returns the base URL relative paths are resolved against.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolves a path or absolute URL against the base URL.
    pub fn resolve(&self, path: &str) -> Result<Url, Error> {
        if path.starts_with("http://") || path.starts_with("https://") {
            return Url::parse(path).map_err(|_| Error::InvalidUrl(path.to_string()));
        }
        self.base_url
            .join(path)
            .map_err(|_| Error::InvalidUrl(path.to_string()))
    }

    /// Fetches the body of a page as text.
    pub async fn get_text(&self, path: &str) -> Result<String, Error> {
        let url = self.resolve(path)?;
        let resp = self
            .http
            .get(url)
            .header("accept", "text/html,application/xhtml+xml")
            .header("accept-language", "en-US,en;q=0.9")
            .send()
            .await
            .map_err(classify)?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::HttpStatus {
                status: status.as_u16(),
                body: truncate_body(&body),
            });
        }

        resp.text().await.map_err(classify)
    }
}

fn classify(err: reqwest::Error) -> Error {
    if err.is_timeout() {
        Error::Timeout
    } else {
        tracing::debug!("request error: {}", err);
        Error::RequestFailed
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 500;
    if body.len() <= MAX {
        body.to_string()
    } else {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...[truncated]", &body[..end])
    }
}
