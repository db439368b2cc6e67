use crate::config::types::{Config, CrawlerConfig, ExtractorConfig, NetworkConfig, OutputConfig};
use crate::{ConfigError, ConfigResult};
use scraper::Selector;
use url::Url;

const PROXY_SCHEMES: &[&str] = &["http", "https", "socks5", "socks5h"];

/// Validates the entire configuration
pub fn validate(config: &Config) -> ConfigResult<()> {
    validate_crawler_config(&config.crawler)?;
    validate_network_config(&config.network)?;
    validate_output_config(&config.output)?;
    validate_extractor_config(&config.extractor)?;
    Ok(())
}

/// Validates crawl session configuration
fn validate_crawler_config(config: &CrawlerConfig) -> ConfigResult<()> {
    let url = Url::parse(&config.start_url).map_err(|e| {
        ConfigError::InvalidUrl(format!("Invalid start_url '{}': {}", config.start_url, e))
    })?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "start_url '{}' must use HTTP or HTTPS",
            config.start_url
        )));
    }

    if config.max_pages < 1 {
        return Err(ConfigError::Validation(format!(
            "max_pages must be >= 1, got {}",
            config.max_pages
        )));
    }

    if config.page_size < 1 {
        return Err(ConfigError::Validation(format!(
            "page_size must be >= 1, got {}",
            config.page_size
        )));
    }

    if config.max_listing_pages == Some(0) {
        return Err(ConfigError::Validation(
            "max_listing_pages must be >= 1 when set".to_string(),
        ));
    }

    Ok(())
}

/// Validates HTTP fetcher configuration
fn validate_network_config(config: &NetworkConfig) -> ConfigResult<()> {
    if let Some(proxy) = &config.proxy_url {
        let url = Url::parse(proxy)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid proxy_url: {}", e)))?;

        if !PROXY_SCHEMES.contains(&url.scheme()) {
            return Err(ConfigError::InvalidUrl(format!(
                "proxy_url scheme must be one of {:?}, got '{}'",
                PROXY_SCHEMES,
                url.scheme()
            )));
        }
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    if config.timeout_secs < 1 || config.connect_timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "timeouts must be >= 1s, got timeout_secs={} connect_timeout_secs={}",
            config.timeout_secs, config.connect_timeout_secs
        )));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> ConfigResult<()> {
    if config.output_dir.trim().is_empty() {
        return Err(ConfigError::Validation(
            "output_dir cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates listing markup configuration
fn validate_extractor_config(config: &ExtractorConfig) -> ConfigResult<()> {
    for (name, value) in [
        ("item_section", &config.item_section),
        ("item_marker", &config.item_marker),
        ("page_param", &config.page_param),
    ] {
        if value.trim().is_empty() {
            return Err(ConfigError::Validation(format!("{} cannot be empty", name)));
        }
    }

    validate_selector(&config.current_page_selector)?;
    validate_selector(&config.next_page_selector)?;

    Ok(())
}

fn validate_selector(selector: &str) -> ConfigResult<()> {
    Selector::parse(selector)
        .map(|_| ())
        .map_err(|e| ConfigError::InvalidSelector(format!("'{}': {:?}", selector, e)))
}
