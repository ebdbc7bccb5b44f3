//! HTTP document provider

use crate::config::{FetcherConfig, MarketplaceConfig};
use crate::document::ProductDocument;
use crate::identifier::{detail_url, ProductIdentifier};
use crate::provider::DocumentProvider;
use crate::{ConfigError, FetchError, LensError};
use reqwest::Client;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The fetcher configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use listing_lens::config::FetcherConfig;
/// use listing_lens::provider::build_http_client;
///
/// let client = build_http_client(&FetcherConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &FetcherConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(Duration::from_secs(config.timeout_secs))
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches detail pages from a marketplace over HTTP
///
/// When the requested identifier is the one whose page is already loaded
/// (see [`HttpDocumentProvider::with_current`]), that page is returned and no
/// request is made.
#[derive(Debug)]
pub struct HttpDocumentProvider {
    client: Client,
    base_url: Url,
    current: Option<(ProductIdentifier, ProductDocument)>,
}

impl HttpDocumentProvider {
    /// Creates a provider for the configured marketplace
    pub fn new(marketplace: &MarketplaceConfig, fetcher: &FetcherConfig) -> Result<Self, LensError> {
        let base_url = Url::parse(&marketplace.base_url)
            .map_err(|e| ConfigError::InvalidUrl(format!("{}: {e}", marketplace.base_url)))?;
        let client = build_http_client(fetcher)?;

        Ok(Self::with_client(client, base_url))
    }

    /// Creates a provider around an existing client
    pub fn with_client(client: Client, base_url: Url) -> Self {
        Self {
            client,
            base_url,
            current: None,
        }
    }

    /// Registers the page already loaded for `asin`
    pub fn with_current(mut self, asin: ProductIdentifier, document: ProductDocument) -> Self {
        self.set_current(asin, document);
        self
    }

    pub fn set_current(&mut self, asin: ProductIdentifier, document: ProductDocument) {
        self.current = Some((asin, document));
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    async fn fetch(&self, asin: &ProductIdentifier) -> Result<ProductDocument, FetchError> {
        let url = detail_url(&self.base_url, asin)?;
        debug!(%url, "fetching detail page");

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| classify(&url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(|e| classify(&url, e))?;
        debug!(%url, bytes = body.len(), "detail page fetched");

        Ok(ProductDocument::parse(&body))
    }
}

fn classify(url: &Url, error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout {
            url: url.to_string(),
        }
    } else {
        FetchError::Http {
            url: url.to_string(),
            source: error,
        }
    }
}

impl DocumentProvider for HttpDocumentProvider {
    async fn get_document(&self, asin: &ProductIdentifier) -> Result<ProductDocument, FetchError> {
        if let Some((current, document)) = &self.current {
            if current == asin {
                debug!(%asin, "reusing current document");
                return Ok(document.clone());
            }
        }

        self.fetch(asin).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_http_client() {
        assert!(build_http_client(&FetcherConfig::default()).is_ok());
    }

    #[test]
    fn test_invalid_base_url() {
        let marketplace = MarketplaceConfig {
            base_url: "not a url".to_string(),
        };
        let result = HttpDocumentProvider::new(&marketplace, &FetcherConfig::default());
        assert!(matches!(
            result,
            Err(LensError::Config(ConfigError::InvalidUrl(_)))
        ));
    }

    #[tokio::test]
    async fn test_current_document_is_reused() {
        let asin = ProductIdentifier::parse("B0CURRENT1").unwrap();
        // Port 9 is discard; any request would fail
        let provider = HttpDocumentProvider::with_client(
            Client::new(),
            Url::parse("http://127.0.0.1:9").unwrap(),
        )
        .with_current(
            asin.clone(),
            ProductDocument::parse("<div id='bylineInfo'>Visit the Acme Store</div>"),
        );

        let document = provider.get_document(&asin).await.unwrap();
        assert_eq!(document.text(), "Visit the Acme Store");
    }
}
