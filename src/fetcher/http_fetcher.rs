use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use url::Url;

use crate::app::{FreshetError, Result};
use crate::config::FetcherConfig;
use crate::fetcher::Fetcher;

/// Reply shape of an allorigins-style CORS proxy.
#[derive(Debug, Deserialize)]
struct ProxyReply {
    contents: Option<String>,
}

pub struct HttpFetcher {
    client: Client,
    proxy: Option<String>,
}

impl HttpFetcher {
    pub fn new(config: &FetcherConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .gzip(true)
            .brotli(true)
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| FreshetError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            proxy: config.proxy.clone(),
        })
    }

    /// The URL actually requested for `url`, routed through the proxy if one
    /// is configured.
    pub fn request_url(&self, url: &str) -> Result<String> {
        match &self.proxy {
            None => Ok(url.to_string()),
            Some(proxy) => {
                let wrapped =
                    Url::parse_with_params(proxy, &[("disableCache", "true"), ("url", url)])
                        .map_err(|e| FreshetError::Config(format!("Invalid proxy URL {}: {}", proxy, e)))?;
                Ok(wrapped.into())
            }
        }
    }

    fn unwrap_proxy_reply(url: &str, body: &str) -> Result<String> {
        let reply: ProxyReply =
            serde_json::from_str(body).map_err(|e| FreshetError::network(url, e))?;
        reply
            .contents
            .ok_or_else(|| FreshetError::network(url, "proxy reply has no contents"))
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        let target = self.request_url(url)?;
        tracing::debug!("Fetching {}", target);

        let response = self
            .client
            .get(&target)
            .send()
            .await
            .map_err(|e| FreshetError::network(url, e))?;

        response
            .error_for_status_ref()
            .map_err(|e| FreshetError::network(url, e))?;

        let body = response
            .text()
            .await
            .map_err(|e| FreshetError::network(url, e))?;

        if self.proxy.is_some() {
            Self::unwrap_proxy_reply(url, &body)
        } else {
            Ok(body)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fetcher(proxy: Option<&str>) -> HttpFetcher {
        let config = FetcherConfig {
            proxy: proxy.map(String::from),
            ..Default::default()
        };
        HttpFetcher::new(&config).unwrap()
    }

    #[test]
    fn test_request_url_without_proxy() {
        let f = fetcher(None);
        assert_eq!(
            f.request_url("https://example.com/feed.xml").unwrap(),
            "https://example.com/feed.xml"
        );
    }

    #[test]
    fn test_request_url_through_proxy_is_encoded() {
        let f = fetcher(Some("https://allorigins.hexlet.app/get"));
        let wrapped = f.request_url("https://example.com/feed.xml?a=1&b=2").unwrap();
        assert_eq!(
            wrapped,
            "https://allorigins.hexlet.app/get?disableCache=true&url=https%3A%2F%2Fexample.com%2Ffeed.xml%3Fa%3D1%26b%3D2"
        );
    }

    #[test]
    fn test_invalid_proxy_is_config_error() {
        let f = fetcher(Some("not a proxy"));
        assert!(matches!(
            f.request_url("https://example.com/feed.xml"),
            Err(FreshetError::Config(_))
        ));
    }

    #[test]
    fn test_unwrap_proxy_reply() {
        let body = r#"{"contents":"<rss></rss>","status":{"http_code":200}}"#;
        assert_eq!(
            HttpFetcher::unwrap_proxy_reply("https://example.com", body).unwrap(),
            "<rss></rss>"
        );

        let err = HttpFetcher::unwrap_proxy_reply("https://example.com", "{}").unwrap_err();
        assert!(matches!(err, FreshetError::Network { .. }));

        let err = HttpFetcher::unwrap_proxy_reply("https://example.com", "<html>").unwrap_err();
        assert!(matches!(err, FreshetError::Network { .. }));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_network_error() {
        let f = fetcher(None);
        let err = f.fetch("http://127.0.0.1:9/feed.xml").await.unwrap_err();
        assert!(matches!(err, FreshetError::Network { .. }));
    }
}
