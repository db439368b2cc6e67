use serde::Deserialize;

/// Default Chrome user agent sent by the HTTP fetcher
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/121.0.0.0 Safari/537.36";

/// Main configuration structure for Listing-Crawler
///
/// Every section is optional in the TOML file; missing values fall back to
/// the defaults below.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub crawler: CrawlerConfig,
    pub network: NetworkConfig,
    pub output: OutputConfig,
    pub extractor: ExtractorConfig,
}

/// Crawl session configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct CrawlerConfig {
    /// First listing page to fetch
    pub start_url: String,

    /// Number of detail pages to save before stopping
    pub max_pages: u32,

    /// Delay after each detail page (milliseconds); listing pages wait twice this
    pub delay_ms: u64,

    /// Results per listing page (informational only)
    pub page_size: u32,

    /// Optional cap on the number of listing pages processed
    pub max_listing_pages: Option<u32>,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            start_url: "https://www.carzone.ie/search?size=30".to_string(),
            max_pages: 200,
            delay_ms: 1500,
            page_size: 30,
            max_listing_pages: None,
        }
    }
}

/// HTTP fetcher configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct NetworkConfig {
    /// Proxy used for every request (http, https, socks5)
    pub proxy_url: Option<String>,

    /// User agent header value
    pub user_agent: String,

    /// Total request timeout (seconds)
    pub timeout_secs: u64,

    /// Connection timeout (seconds)
    pub connect_timeout_secs: u64,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            proxy_url: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_secs: 60,
            connect_timeout_secs: 15,
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct OutputConfig {
    /// Directory that receives one HTML file per saved detail page
    pub output_dir: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            output_dir: "./output".to_string(),
        }
    }
}

/// Listing markup configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ExtractorConfig {
    /// First path segment of a detail link (`/{section}/{make}/{model}/{marker}/{ref}`)
    pub item_section: String,

    /// Path segment that precedes the numeric reference
    pub item_marker: String,

    /// Element holding the current page number
    pub current_page_selector: String,

    /// Next-page control
    pub next_page_selector: String,

    /// Class that marks the next-page control as disabled
    pub disabled_class: String,

    /// Query parameter carrying the page number
    pub page_param: String,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            item_section: "used-cars".to_string(),
            item_marker: "fpa".to_string(),
            current_page_selector: ".czds-m-pagination__current".to_string(),
            next_page_selector: r#"button[aria-label="Next page"]"#.to_string(),
            disabled_class: "czds-m-pagination__disabled".to_string(),
            page_param: "page".to_string(),
        }
    }
}
