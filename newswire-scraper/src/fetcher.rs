use crate::error::FetchError;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Retrieves raw page content over plain HTTP. Pages that need a browser
/// rendering engine are out of scope; every configured source is expected to
/// serve its article listing as static HTML.
#[derive(Clone)]
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    pub fn new() -> Self {
        Self::with_timeout(10)
    }

    pub fn with_timeout(timeout_secs: u64) -> Self {
        let client = Client::builder()
            .user_agent("Newswire/0.1 (news listing monitor)")
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(timeout_secs.div_ceil(2)))
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()
            .expect("Failed to create HTTP client");

        Self { client }
    }

    /// Fetch the full response body for `url`. Blocks until the body has been
    /// received or the client timeout fires. Non-2xx responses are errors.
    pub async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let parsed = Url::parse(url).map_err(|e| FetchError::InvalidUrl {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        debug!("Fetching {}", parsed);
        let response = self.client.get(parsed).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        Ok(response.text().await?)
    }
}

impl Default for Fetcher {
    fn default() -> Self {
        Self::new()
    }
}
