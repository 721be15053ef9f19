use crate::core::{DocumentSource, ExtractError};
use async_trait::async_trait;
use tracing::{debug, instrument};

/// Fetches the page over HTTP(S). One attempt, no retry.
pub struct HttpSource {
    url: String,
    client: reqwest::Client,
}

impl HttpSource {
    pub fn new(url: &str) -> Result<Self, ExtractError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("bankcap/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ExtractError::fetch(url, e))?;
        Ok(HttpSource {
            url: url.to_string(),
            client,
        })
    }
}

#[async_trait]
impl DocumentSource for HttpSource {
    fn location(&self) -> &str {
        &self.url
    }

    #[instrument(name = "HttpFetch", skip(self), fields(url = %self.url))]
    async fn fetch(&self) -> Result<String, ExtractError> {
        debug!("Requesting document from {}", self.url);

        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| ExtractError::fetch(&self.url, e))?;

        debug!(status = %response.status(), "Received response");

        response
            .text()
            .await
            .map_err(|e| ExtractError::fetch(&self.url, e))
    }
}
