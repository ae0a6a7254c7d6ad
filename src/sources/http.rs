use reqwest::header::{HeaderMap, HeaderValue, REFERER};
use std::time::Duration;

use crate::error::{Result, SubtitleError};

/// Fetches raw bytes behind a URL. Providers go through this so they can be
/// exercised without a network.
pub trait PageFetcher: Send + Sync {
    fn get(&self, url: &str) -> Result<Vec<u8>>;
}

/// Blocking HTTP fetcher that identifies itself like a browser coming from
/// the provider's homepage
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
}

impl HttpFetcher {
    pub fn new(user_agent: &str, referer: &str, timeout: Duration) -> Result<Self> {
        let mut headers = HeaderMap::new();
        let referer = HeaderValue::from_str(referer)
            .map_err(|e| SubtitleError::Config(format!("invalid referer '{referer}': {e}")))?;
        headers.insert(REFERER, referer);

        let client = reqwest::blocking::Client::builder()
            .user_agent(user_agent)
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(Self { client })
    }
}

impl PageFetcher for HttpFetcher {
    fn get(&self, url: &str) -> Result<Vec<u8>> {
        tracing::debug!("GET {url}");
        let response = self.client.get(url).send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(SubtitleError::Network(format!("HTTP {status} from {url}")));
        }

        Ok(response.bytes()?.to_vec())
    }
}
