use async_trait::async_trait;
use reqwest::{Client, Url};

use crate::catalog::TrackedItem;
use crate::config::HttpConfig;
use crate::error::{Context, FetchError, Result};
use crate::records::{AssetRecord, LogoBlob};

pub mod decode;
pub mod request;

#[cfg(test)]
pub(crate) mod scripted;

pub type FetchResult<T> = std::result::Result<T, FetchError>;

/// Fetch the raw body behind a URL. The only I/O the aggregator performs goes through this.
#[async_trait]
pub trait ByteFetcher: Send + Sync {
    async fn fetch_bytes(&self, url: &Url) -> FetchResult<Vec<u8>>;
}

/// `ByteFetcher` backed by one shared reqwest client.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(http: &HttpConfig) -> Result<Self> {
        let headers = request::build_headers(&http.headers)?;
        let client = Client::builder()
            .timeout(http.timeout())
            .user_agent(http.user_agent.as_str())
            .default_headers(headers)
            .build()
            .context("Failed to construct HTTP client")?;

        Ok(Self { client })
    }
}

#[async_trait]
impl ByteFetcher for HttpFetcher {
    async fn fetch_bytes(&self, url: &Url) -> FetchResult<Vec<u8>> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|err| FetchError::no_data(url, err))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::no_data(url, format!("status {status}")));
        }

        let body = response
            .bytes()
            .await
            .map_err(|err| FetchError::no_data(url, err))?;

        if body.is_empty() {
            return Err(FetchError::no_data(url, "empty body"));
        }

        Ok(body.to_vec())
    }
}

/// Fetch and decode the market record for one item.
pub async fn fetch_record(fetcher: &dyn ByteFetcher, item: &TrackedItem) -> FetchResult<AssetRecord> {
    let bytes = fetcher.fetch_bytes(&item.data_url).await?;
    decode::decode_first_record(item.data_url.as_str(), &bytes)
}

/// Fetch the logo for one item.
pub async fn fetch_logo(fetcher: &dyn ByteFetcher, item: &TrackedItem) -> FetchResult<LogoBlob> {
    let bytes = fetcher.fetch_bytes(&item.logo_url).await?;
    decode::decode_logo(item.logo_url.as_str(), bytes)
}
