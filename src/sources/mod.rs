pub mod file;
pub mod http;

use crate::core::{DocumentSource, ExtractError};
use file::FileSource;
use http::HttpSource;

/// Picks an HTTP source for `http(s)://` locations and a file source otherwise.
pub fn from_location(location: &str) -> Result<Box<dyn DocumentSource>, ExtractError> {
    let lower = location.to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") {
        Ok(Box::new(HttpSource::new(location)?))
    } else {
        Ok(Box::new(FileSource::new(location)))
    }
}
