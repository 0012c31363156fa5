use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use reqwest::{Client, ClientBuilder};

use crate::{config::CrawlerConfig, error::CrawlError};

/// Status and body of a completed GET.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

/// The single capability the crawler needs from its host: GET a URL.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, url: &str) -> Result<TransportResponse, CrawlError>;
}

/// [`Transport`] backed by a `reqwest` client.
pub struct RequestClient {
    client: Client,
}

impl RequestClient {
    pub fn new(config: &CrawlerConfig) -> anyhow::Result<Self> {
        let client = ClientBuilder::new()
            .timeout(config.request_timeout)
            .user_agent(&config.user_agent)
            .build()?;
        Ok(Self { client })
    }

    /// Reuses a client the host already manages.
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for RequestClient {
    async fn get(&self, url: &str) -> Result<TransportResponse, CrawlError> {
        let transport_error = |e: reqwest::Error| CrawlError::Fetch {
            url: url.to_string(),
            status: None,
            reason: e.to_string(),
        };
        let response = self.client.get(url).send().await.map_err(transport_error)?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(transport_error)?;
        Ok(TransportResponse { status, body })
    }
}

/// GETs `url` through `transport` and returns the body of a 2xx response.
///
/// The whole call is bounded by `timeout`, whatever the transport's own
/// settings are.
pub async fn fetch_page(
    transport: &dyn Transport,
    url: &str,
    timeout: Duration,
) -> Result<String, CrawlError> {
    debug!("fetching {url}");
    let response = tokio::time::timeout(timeout, transport.get(url))
        .await
        .map_err(|_| CrawlError::Fetch {
            url: url.to_string(),
            status: None,
            reason: format!("timed out after {}s", timeout.as_secs_f32()),
        })??;

    if !(200..300).contains(&response.status) {
        return Err(CrawlError::Fetch {
            url: url.to_string(),
            status: Some(response.status),
            reason: "unexpected status".to_string(),
        });
    }
    debug!("fetched {} bytes from {url}", response.body.len());
    Ok(response.body)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(u16);

    #[async_trait]
    impl Transport for Fixed {
        async fn get(&self, _url: &str) -> Result<TransportResponse, CrawlError> {
            Ok(TransportResponse {
                status: self.0,
                body: "<html></html>".to_string(),
            })
        }
    }

    struct Stalled;

    #[async_trait]
    impl Transport for Stalled {
        async fn get(&self, _url: &str) -> Result<TransportResponse, CrawlError> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            unreachable!()
        }
    }

    #[tokio::test]
    async fn test_success_returns_body() {
        let body = fetch_page(&Fixed(200), "https://example.org", Duration::from_secs(1))
            .await
            .unwrap();
        assert_eq!(body, "<html></html>");
    }

    #[tokio::test]
    async fn test_error_status_is_fetch_error() {
        match fetch_page(&Fixed(404), "https://example.org/x", Duration::from_secs(1)).await {
            Err(CrawlError::Fetch { url, status, .. }) => {
                assert_eq!(url, "https://example.org/x");
                assert_eq!(status, Some(404));
            }
            other => panic!("expected Fetch error, got {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_is_fetch_error() {
        let err = fetch_page(&Stalled, "https://example.org", Duration::from_secs(10))
            .await
            .unwrap_err();
        assert!(matches!(err, CrawlError::Fetch { status: None, .. }));
        assert!(err.to_string().contains("timed out"));
    }

    #[test]
    fn test_create_client() {
        assert!(RequestClient::new(&CrawlerConfig::default()).is_ok());
    }
}
