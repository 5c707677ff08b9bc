pub mod http_fetcher;

use async_trait::async_trait;

use crate::app::Result;

pub use http_fetcher::HttpFetcher;

/// Retrieves the raw document behind a feed URL.
///
/// Implementations report every transport or HTTP failure as
/// [`FreshetError::Network`](crate::app::FreshetError::Network).
#[async_trait]
pub trait Fetcher {
    async fn fetch(&self, url: &str) -> Result<String>;
}
