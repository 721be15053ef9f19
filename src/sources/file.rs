use crate::core::{DocumentSource, ExtractError};
use async_trait::async_trait;
use std::path::PathBuf;
use tracing::debug;

/// Reads a saved snapshot of the page from disk.
pub struct FileSource {
    location: String,
    path: PathBuf,
}

impl FileSource {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        let path = path.into();
        FileSource {
            location: path.display().to_string(),
            path,
        }
    }
}

#[async_trait]
impl DocumentSource for FileSource {
    fn location(&self) -> &str {
        &self.location
    }

    async fn fetch(&self) -> Result<String, ExtractError> {
        debug!("Reading document from {}", self.path.display());
        tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| ExtractError::fetch(&self.location, e))
    }
}
