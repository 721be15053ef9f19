//! Document source abstraction

use crate::core::error::ExtractError;
use async_trait::async_trait;

/// Something that can hand back the markup of the page to scrape.
#[async_trait]
pub trait DocumentSource: Send + Sync {
    /// Human readable origin, used in logs and errors.
    fn location(&self) -> &str;

    async fn fetch(&self) -> Result<String, ExtractError>;
}
