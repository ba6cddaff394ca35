use std::sync::Arc;

use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::config::{PageTiming, ScrapeSettings};
use crate::error::{RenderError, ReviewError};
use crate::normalize::{cap_reviews, clean_fragment};
use crate::renderer::{RenderSession, Renderer};
use crate::source::{classify_reference, ProductReference};

// ============================================================================
// Site Adapters
// ============================================================================

/// Per-marketplace knowledge: how listing pages are addressed and where the
/// review text lives on them.
pub trait ReviewSource: Send + Sync {
    fn name(&self) -> &'static str;

    /// URL of the 1-based listing `page`.
    fn page_url(&self, page: u32) -> String;

    /// CSS selector of the elements holding review text.
    fn review_selector(&self) -> &'static str;
}

/// Amazon review listing, paginated through `pageNumber`.
#[derive(Debug, Clone)]
pub struct AmazonReviews {
    base_url: String,
    product_id: String,
}

impl AmazonReviews {
    pub const REVIEW_SELECTOR: &'static str = r#"span[data-hook="review-body"]"#;

    pub fn new(base_url: impl Into<String>, product_id: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            product_id: product_id.into(),
        }
    }
}

impl ReviewSource for AmazonReviews {
    fn name(&self) -> &'static str {
        "amazon"
    }

    fn page_url(&self, page: u32) -> String {
        format!(
            "{}/product-reviews/{}/?pageNumber={}",
            self.base_url.trim_end_matches('/'),
            self.product_id,
            page
        )
    }

    fn review_selector(&self) -> &'static str {
        Self::REVIEW_SELECTOR
    }
}

/// Flipkart review listing, paginated by a `page` query parameter on the
/// URL the user supplied.
#[derive(Debug, Clone)]
pub struct FlipkartReviews {
    listing_url: String,
}

impl FlipkartReviews {
    pub const REVIEW_SELECTOR: &'static str = "div._27M-vq";

    pub fn new(listing_url: impl Into<String>) -> Self {
        Self {
            listing_url: listing_url.into(),
        }
    }
}

impl ReviewSource for FlipkartReviews {
    fn name(&self) -> &'static str {
        "flipkart"
    }

    fn page_url(&self, page: u32) -> String {
        let separator = if self.listing_url.contains('?') { '&' } else { '?' };
        format!("{}{}page={}", self.listing_url, separator, page)
    }

    fn review_selector(&self) -> &'static str {
        Self::REVIEW_SELECTOR
    }
}

/// Picks the adapter for a classified product.
pub fn adapter_for(reference: &ProductReference, amazon_base_url: &str) -> Box<dyn ReviewSource> {
    match reference {
        ProductReference::Amazon { product_id } => {
            Box::new(AmazonReviews::new(amazon_base_url, product_id.clone()))
        }
        ProductReference::Flipkart { listing_url } => {
            Box::new(FlipkartReviews::new(listing_url.clone()))
        }
    }
}

// ============================================================================
// Review Scraper
// ============================================================================

/// Drives a [`ReviewSource`] page by page through a [`Renderer`].
#[derive(Clone)]
pub struct ReviewScraper {
    renderer: Arc<dyn Renderer>,
    settings: ScrapeSettings,
}

impl ReviewScraper {
    pub fn new(renderer: Arc<dyn Renderer>, settings: ScrapeSettings) -> Self {
        Self { renderer, settings }
    }

    /// Extract operation: classifies `url`, runs the matching adapter over the
    /// configured number of pages and rejects an empty harvest.
    pub async fn scrape_url(&self, url: &str) -> Result<Vec<String>, ReviewError> {
        let url = url.trim();
        if url.is_empty() {
            return Err(ReviewError::MissingUrl);
        }

        let reference = classify_reference(url)?;
        info!("🔎 Scraping {} reviews from {}", reference.source(), url);

        let reviews = self.extract(&reference, self.settings.max_pages).await?;
        if reviews.is_empty() {
            // Usually means the review selectors no longer match the site markup.
            warn!(
                "⚠️ No reviews found for {} ({}); adapter selectors may be stale",
                url,
                reference.source()
            );
            return Err(ReviewError::NoReviewsFound);
        }

        info!("✅ Extracted {} reviews from {}", reviews.len(), url);
        Ok(reviews)
    }

    /// Runs the adapter for `reference` over pages `1..=max_pages`.
    ///
    /// An empty result is a success here; only session-level faults fail.
    pub async fn extract(
        &self,
        reference: &ProductReference,
        max_pages: u32,
    ) -> Result<Vec<String>, RenderError> {
        let source = adapter_for(reference, &self.settings.amazon_base_url);
        self.extract_from(source.as_ref(), max_pages).await
    }

    pub async fn extract_from(
        &self,
        source: &dyn ReviewSource,
        max_pages: u32,
    ) -> Result<Vec<String>, RenderError> {
        let mut session = self.renderer.open_session().await?;

        let outcome = collect_pages(session.as_mut(), source, max_pages, &self.settings.timing).await;
        session.close().await;

        Ok(cap_reviews(outcome?))
    }
}

async fn collect_pages(
    session: &mut dyn RenderSession,
    source: &dyn ReviewSource,
    max_pages: u32,
    timing: &PageTiming,
) -> Result<Vec<String>, RenderError> {
    let mut reviews = Vec::new();

    for page in 1..=max_pages {
        let url = source.page_url(page);
        match scrape_page(session, &url, source.review_selector(), timing).await {
            Ok(fragments) => {
                let before = reviews.len();
                reviews.extend(fragments.iter().filter_map(|raw| clean_fragment(raw)));
                debug!(
                    "[{}] page {}: {} fragments, {} kept",
                    source.name(),
                    page,
                    fragments.len(),
                    reviews.len() - before
                );
            }
            Err(e) if e.is_recoverable() => {
                warn!("⚠️ [{}] page {} skipped: {}", source.name(), page, e);
                continue;
            }
            Err(e) => return Err(e),
        }
    }

    Ok(reviews)
}

async fn scrape_page(
    session: &mut dyn RenderSession,
    url: &str,
    selector: &str,
    timing: &PageTiming,
) -> Result<Vec<String>, RenderError> {
    session.load(url).await?;
    if session.needs_settling() && !timing.settle_delay.is_zero() {
        sleep(timing.settle_delay).await;
    }
    session.texts_matching(selector, timing.content_timeout).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_amazon_page_urls() {
        let source = AmazonReviews::new("https://www.amazon.in", "B08N5WRWNW");
        assert_eq!(
            source.page_url(1),
            "https://www.amazon.in/product-reviews/B08N5WRWNW/?pageNumber=1"
        );
        assert_eq!(
            source.page_url(2),
            "https://www.amazon.in/product-reviews/B08N5WRWNW/?pageNumber=2"
        );
    }

    #[test]
    fn test_amazon_base_trailing_slash() {
        let source = AmazonReviews::new("https://www.amazon.com/", "B07XJ8C8F5");
        assert_eq!(
            source.page_url(3),
            "https://www.amazon.com/product-reviews/B07XJ8C8F5/?pageNumber=3"
        );
    }

    #[test]
    fn test_flipkart_page_urls() {
        let with_query = FlipkartReviews::new("https://www.flipkart.com/x/product-reviews/itm1?pid=MOB1");
        assert_eq!(
            with_query.page_url(2),
            "https://www.flipkart.com/x/product-reviews/itm1?pid=MOB1&page=2"
        );

        let bare = FlipkartReviews::new("https://www.flipkart.com/x/product-reviews/itm1");
        assert_eq!(
            bare.page_url(1),
            "https://www.flipkart.com/x/product-reviews/itm1?page=1"
        );
    }

    #[test]
    fn test_adapter_for_reference() {
        let amazon = adapter_for(
            &ProductReference::Amazon {
                product_id: "B08N5WRWNW".into(),
            },
            "https://www.amazon.in",
        );
        assert_eq!(amazon.name(), "amazon");
        assert_eq!(amazon.review_selector(), r#"span[data-hook="review-body"]"#);

        let flipkart = adapter_for(
            &ProductReference::Flipkart {
                listing_url: "https://www.flipkart.com/p?pid=1".into(),
            },
            "https://www.amazon.in",
        );
        assert_eq!(flipkart.name(), "flipkart");
        assert_eq!(flipkart.review_selector(), "div._27M-vq");
    }
}
