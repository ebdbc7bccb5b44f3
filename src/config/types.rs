use serde::Deserialize;

/// Main configuration structure for Listing-Lens
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub marketplace: MarketplaceConfig,
    #[serde(default)]
    pub fetcher: FetcherConfig,
    #[serde(default)]
    pub grouping: GroupingConfig,
}

/// Which storefront detail pages are fetched from
#[derive(Debug, Clone, Deserialize)]
pub struct MarketplaceConfig {
    /// Storefront origin, detail pages live under `<base-url>/dp/<ASIN>`
    #[serde(rename = "base-url", default = "default_base_url")]
    pub base_url: String,
}

impl Default for MarketplaceConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

/// HTTP client configuration
#[derive(Debug, Clone, Deserialize)]
pub struct FetcherConfig {
    /// User-Agent header sent with every request
    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,

    /// Whole-request timeout (seconds)
    #[serde(rename = "timeout-secs", default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Connection timeout (seconds)
    #[serde(
        rename = "connect-timeout-secs",
        default = "default_connect_timeout_secs"
    )]
    pub connect_timeout_secs: u64,

    /// Maximum number of detail pages fetched at once
    #[serde(
        rename = "max-concurrent-requests",
        default = "default_max_concurrent_requests"
    )]
    pub max_concurrent_requests: usize,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
            max_concurrent_requests: default_max_concurrent_requests(),
        }
    }
}

/// Listing-page grouping configuration
#[derive(Debug, Clone, Deserialize)]
pub struct GroupingConfig {
    /// Maximum vertical distance between a main node and a related variation
    #[serde(
        rename = "proximity-threshold",
        default = "default_proximity_threshold"
    )]
    pub proximity_threshold: f64,

    /// Attribute carrying a node's pre-computed vertical offset, if the saved
    /// page was annotated with layout positions
    #[serde(rename = "position-attribute", default)]
    pub position_attribute: Option<String>,
}

impl Default for GroupingConfig {
    fn default() -> Self {
        Self {
            proximity_threshold: default_proximity_threshold(),
            position_attribute: None,
        }
    }
}

fn default_base_url() -> String {
    "https://www.amazon.co.uk".to_string()
}

fn default_user_agent() -> String {
    format!("listing-lens/{}", env!("CARGO_PKG_VERSION"))
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_max_concurrent_requests() -> usize {
    4
}

fn default_proximity_threshold() -> f64 {
    200.0
}
