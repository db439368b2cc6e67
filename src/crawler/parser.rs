//! Listing page extraction
//!
//! This module turns listing markup into:
//! - Detail-page targets (from `<a href>` links with the configured path shape)
//! - Pagination info (current page number and the next listing URL, if any)

use crate::config::ExtractorConfig;
use crate::url::set_query_param;
use crate::{ConfigError, ExtractError, UrlError};
use scraper::{ElementRef, Html, Selector};
use url::Url;

/// A detail page discovered on a listing page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlTarget {
    /// Site-assigned public reference; the item's identity
    pub reference: String,

    /// Category label (lowercased)
    pub make: String,

    /// Subcategory label (lowercased)
    pub model: String,

    /// Absolute URL of the detail page
    pub url: String,
}

/// Pagination state read from a listing page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pagination {
    /// Page number the listing claims to be showing
    pub current_page: u32,

    /// Where the next listing page lives; `None` means the listing is exhausted
    pub next_page_url: Option<Url>,
}

/// Content extraction contract consumed by the coordinator
pub trait Extractor {
    /// Extracts detail-page targets, in document order, without duplicates
    fn extract_items(&self, content: &str, base_url: &Url)
        -> Result<Vec<CrawlTarget>, ExtractError>;

    /// Reads pagination controls and resolves the next listing URL
    fn extract_pagination(&self, content: &str, base_url: &Url)
        -> Result<Pagination, ExtractError>;
}

/// CSS-selector based extractor for listing sites
///
/// Detail links are recognized by the path shape
/// `/{section}/{make}/{model}/{marker}/{numeric reference}`.
#[derive(Debug, Clone)]
pub struct ListingExtractor {
    link_selector: Selector,
    current_page_selector: Selector,
    next_page_selector: Selector,
    item_section: String,
    item_marker: String,
    disabled_class: String,
    page_param: String,
}

impl ListingExtractor {
    /// Builds an extractor, compiling the configured selectors
    ///
    /// # Example
    ///
    /// ```
    /// use listing_crawler::config::ExtractorConfig;
    /// use listing_crawler::crawler::{Extractor, ListingExtractor};
    /// use url::Url;
    ///
    /// let extractor = ListingExtractor::new(&ExtractorConfig::default()).unwrap();
    /// let html = r#"<a href="/used-cars/BMW/X5/fpa/123">BMW X5</a>"#;
    /// let base = Url::parse("https://example.com/search?size=30").unwrap();
    /// let items = extractor.extract_items(html, &base).unwrap();
    /// assert_eq!(items[0].reference, "123");
    /// assert_eq!(items[0].make, "bmw");
    /// ```
    pub fn new(config: &ExtractorConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            link_selector: compile("a[href]")?,
            current_page_selector: compile(&config.current_page_selector)?,
            next_page_selector: compile(&config.next_page_selector)?,
            item_section: config.item_section.clone(),
            item_marker: config.item_marker.clone(),
            disabled_class: config.disabled_class.clone(),
            page_param: config.page_param.clone(),
        })
    }

    /// Matches a resolved link against the detail path shape
    fn match_target(&self, url: &Url) -> Option<CrawlTarget> {
        let segments: Vec<&str> = url.path_segments()?.collect();

        segments.windows(5).find_map(|window| {
            let [section, make, model, marker, reference] = window else {
                return None;
            };

            let is_match = *section == self.item_section
                && *marker == self.item_marker
                && !make.is_empty()
                && !model.is_empty()
                && !reference.is_empty()
                && reference.chars().all(|c| c.is_ascii_digit());

            is_match.then(|| CrawlTarget {
                reference: reference.to_string(),
                make: make.to_lowercase(),
                model: model.to_lowercase(),
                url: url.to_string(),
            })
        })
    }

    fn check_base(base_url: &Url) -> Result<(), ExtractError> {
        if base_url.cannot_be_a_base() {
            return Err(UrlError::Parse(format!("{} cannot be used as a base URL", base_url)).into());
        }
        Ok(())
    }

    fn is_disabled(&self, element: &ElementRef<'_>) -> bool {
        element.value().classes().any(|c| c == self.disabled_class)
            || element.value().attr("disabled").is_some()
            || element.value().attr("aria-disabled") == Some("true")
    }
}

impl Extractor for ListingExtractor {
    fn extract_items(
        &self,
        content: &str,
        base_url: &Url,
    ) -> Result<Vec<CrawlTarget>, ExtractError> {
        Self::check_base(base_url)?;
        let document = Html::parse_document(content);
        let mut items: Vec<CrawlTarget> = Vec::new();

        for element in document.select(&self.link_selector) {
            let Some(href) = element.value().attr("href") else {
                continue;
            };

            let Ok(resolved) = base_url.join(href.trim()) else {
                tracing::trace!("Skipping unresolvable href: {}", href);
                continue;
            };

            if let Some(target) = self.match_target(&resolved) {
                if !items.iter().any(|t| t.reference == target.reference) {
                    items.push(target);
                }
            }
        }

        tracing::debug!("Found {} unique items on listing page", items.len());
        Ok(items)
    }

    fn extract_pagination(
        &self,
        content: &str,
        base_url: &Url,
    ) -> Result<Pagination, ExtractError> {
        Self::check_base(base_url)?;
        let document = Html::parse_document(content);

        // The last matching element wins, mirroring how the markup repeats
        // the pager at the top and bottom of the listing
        let current_page = document
            .select(&self.current_page_selector)
            .last()
            .and_then(|el| el.text().collect::<String>().trim().parse::<u32>().ok())
            .filter(|page| *page > 0)
            .unwrap_or(1);

        let next_page_url = match document.select(&self.next_page_selector).next() {
            Some(control) if !self.is_disabled(&control) => {
                let linked = control
                    .value()
                    .attr("href")
                    .and_then(|href| base_url.join(href.trim()).ok());

                // A page number at the top of the range has no successor
                linked.or_else(|| {
                    current_page.checked_add(1).map(|next| {
                        set_query_param(base_url, &self.page_param, &next.to_string())
                    })
                })
            }
            _ => None,
        };

        Ok(Pagination {
            current_page,
            next_page_url,
        })
    }
}

fn compile(selector: &str) -> Result<Selector, ConfigError> {
    Selector::parse(selector)
        .map_err(|e| ConfigError::InvalidSelector(format!("'{}': {:?}", selector, e)))
}
