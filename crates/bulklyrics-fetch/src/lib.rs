use anyhow::{Context, Result};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_LANGUAGE, COOKIE};
use std::time::Duration;

pub mod url;

pub use url::search_url;

/// Strategy seam for retrieving a song's search-results page.
///
/// The extractor only ever sees raw HTML, so a browser-automation fetcher
/// could be swapped in here without touching extraction logic. Tests use a
/// canned-HTML implementation.
pub trait Fetch {
    /// Retrieve the raw search-results HTML for one song query.
    ///
    /// Network and HTTP-status failures propagate to the caller; whether a
    /// failed fetch aborts the batch is the run loop's policy, not ours.
    fn fetch(&self, query: &str) -> impl std::future::Future<Output = Result<String>> + Send;
}

/// Fetches search-results pages over plain HTTP with browser-like headers.
///
/// The consent cookies stand in for clicking Google's cookie interstitial:
/// with them pre-seeded the consent page is never served, so there is
/// nothing to dismiss.
pub struct HttpFetcher {
    client: reqwest::Client,
}

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

const CONSENT_COOKIES: &str = "CONSENT=YES+cb.20230531-04-p0.en+FX+410; SOCS=CAI";

impl HttpFetcher {
    pub fn new() -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_static(CONSENT_COOKIES));
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));

        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .timeout(Duration::from_secs(30))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self { client })
    }
}

impl Fetch for HttpFetcher {
    async fn fetch(&self, query: &str) -> Result<String> {
        let url = search_url(query);
        tracing::debug!(url = %url, "Fetching search results");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("Failed to fetch search results for '{query}'"))?;

        let status = response.status();
        anyhow::ensure!(status.is_success(), "HTTP {status} for {url}");

        let html = response.text().await.context("Failed to read response body")?;
        tracing::debug!(bytes = html.len(), "Received HTML");
        Ok(html)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_builds() {
        assert!(HttpFetcher::new().is_ok());
    }
}
