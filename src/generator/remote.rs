use crate::error::{EngineError, EngineResult};
use crate::generator::WordSource;
use crate::generator::cache::fetch_url;

/// Fetches a JSON array of words, e.g. a static `words.json`.
pub struct HttpWordSource {
    url: String,
}

impl HttpWordSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl WordSource for HttpWordSource {
    fn fetch(&self) -> EngineResult<Vec<String>> {
        let body = fetch_url(&self.url).ok_or_else(|| {
            EngineError::WordSourceUnavailable(format!("failed to fetch {}", self.url))
        })?;
        parse_word_list(&body)
    }
}

pub fn parse_word_list(body: &str) -> EngineResult<Vec<String>> {
    serde_json::from_str(body)
        .map_err(|e| EngineError::WordSourceUnavailable(format!("malformed word list: {e}")))
}
