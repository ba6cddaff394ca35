mod common;

use std::sync::Arc;
use std::time::Duration;

use common::*;
use review_sentiment::config::{PageTiming, ScrapeSettings};
use review_sentiment::crawler::{FlipkartReviews, ReviewScraper};
use review_sentiment::error::{RenderError, ReviewError};
use review_sentiment::normalize::MAX_REVIEWS;
use review_sentiment::source::{ProductReference, SourceType};

fn scraper_with(renderer: &ScriptedRenderer) -> ReviewScraper {
    ReviewScraper::new(Arc::new(renderer.clone()), fast_settings())
}

fn amazon_reference() -> ProductReference {
    ProductReference::Amazon {
        product_id: "B08N5WRWNW".to_string(),
    }
}

#[tokio::test]
async fn test_amazon_pages_are_trimmed_filtered_and_capped() {
    let renderer = ScriptedRenderer::new(vec![
        (
            AMAZON_PAGE_1,
            Page::texts(&["  p1 r1 ", "", "p1 r2", "\n\t", "p1 r3", "p1 r4", "p1 r5", "p1 r6"]),
        ),
        (
            AMAZON_PAGE_2,
            Page::texts(&["p2 r1", "  p2 r2", "p2 r3", "p2 r4", "p2 r5", "p2 r6"]),
        ),
    ]);
    let scraper = scraper_with(&renderer);

    let reviews = scraper.extract(&amazon_reference(), 2).await.unwrap();

    assert_eq!(reviews.len(), MAX_REVIEWS);
    assert_eq!(&reviews[..2], &["p1 r1".to_string(), "p1 r2".to_string()]);
    assert_eq!(reviews[6], "p2 r1");
    assert_eq!(reviews[9], "p2 r4");
    for review in &reviews {
        assert!(!review.is_empty());
        assert_eq!(review.trim(), review);
    }
    assert_eq!(renderer.visited(), vec![AMAZON_PAGE_1, AMAZON_PAGE_2]);
    assert!(renderer
        .selectors()
        .iter()
        .all(|s| s == r#"span[data-hook="review-body"]"#));
    assert_eq!((renderer.opened(), renderer.closed()), (1, 1));
}

#[tokio::test]
async fn test_flipkart_pagination_appends_page_param() {
    let listing = "https://www.flipkart.com/phone/product-reviews/itm9?pid=MOB9";
    let renderer = ScriptedRenderer::new(vec![
        (
            "https://www.flipkart.com/phone/product-reviews/itm9?pid=MOB9&page=1",
            Page::texts(&["Value for money", "Camera is average"]),
        ),
        (
            "https://www.flipkart.com/phone/product-reviews/itm9?pid=MOB9&page=2",
            Page::texts(&["Battery drains fast"]),
        ),
    ]);
    let scraper = scraper_with(&renderer);

    let reviews = scraper.scrape_url(listing).await.unwrap();

    assert_eq!(
        reviews,
        vec!["Value for money", "Camera is average", "Battery drains fast"]
    );
    assert!(renderer.selectors().iter().all(|s| s == "div._27M-vq"));
}

#[tokio::test]
async fn test_all_pages_timing_out_is_an_empty_success() {
    let renderer = ScriptedRenderer::new(vec![
        (AMAZON_PAGE_1, Page::Timeout),
        (AMAZON_PAGE_2, Page::Timeout),
    ]);
    let scraper = scraper_with(&renderer);

    let reviews = scraper.extract(&amazon_reference(), 2).await.unwrap();
    assert!(reviews.is_empty());
    assert_eq!(renderer.visited().len(), 2);
    assert_eq!(renderer.closed(), 1);

    let err = scraper.scrape_url(AMAZON_PRODUCT).await.unwrap_err();
    assert!(matches!(err, ReviewError::NoReviewsFound));
    assert_eq!(err.to_string(), "no reviews found");
}

#[tokio::test]
async fn test_failed_page_is_skipped_not_retried() {
    let renderer = ScriptedRenderer::new(vec![
        (AMAZON_PAGE_1, Page::LoadFault),
        (AMAZON_PAGE_2, Page::texts(&["Solid build"])),
    ]);
    let scraper = scraper_with(&renderer);

    let reviews = scraper.extract(&amazon_reference(), 2).await.unwrap();

    assert_eq!(reviews, vec!["Solid build"]);
    assert_eq!(renderer.visited(), vec![AMAZON_PAGE_1, AMAZON_PAGE_2]);
}

#[tokio::test]
async fn test_session_loss_aborts_and_still_closes() {
    let renderer = ScriptedRenderer::new(vec![
        (AMAZON_PAGE_1, Page::SessionLost),
        (AMAZON_PAGE_2, Page::texts(&["never reached"])),
    ]);
    let scraper = scraper_with(&renderer);

    let err = scraper.extract(&amazon_reference(), 2).await.unwrap_err();

    assert!(matches!(err, RenderError::SessionLost(_)));
    assert_eq!(renderer.visited(), vec![AMAZON_PAGE_1]);
    assert_eq!((renderer.opened(), renderer.closed()), (1, 1));

    let err = scraper.scrape_url(AMAZON_PRODUCT).await.unwrap_err();
    assert!(matches!(err, ReviewError::Extraction(RenderError::SessionLost(_))));
    assert!(err.to_string().starts_with("Scraping failed:"));
}

#[tokio::test]
async fn test_renderer_unavailable_is_extraction_failure() {
    let renderer = ScriptedRenderer::unavailable();
    let scraper = scraper_with(&renderer);

    let err = scraper.scrape_url(AMAZON_PRODUCT).await.unwrap_err();

    assert!(matches!(err, ReviewError::Extraction(RenderError::Launch(_))));
    assert!(renderer.visited().is_empty());
}

#[tokio::test]
async fn test_unsupported_sources_never_touch_renderer() {
    let renderer = ScriptedRenderer::new(vec![]);
    let scraper = scraper_with(&renderer);

    let err = scraper
        .scrape_url("https://www.alibaba.com/product/123")
        .await
        .unwrap_err();
    assert!(matches!(err, ReviewError::UnsupportedSource(SourceType::AlibabaLike)));
    assert_eq!(err.to_string(), "source not supported");

    let err = scraper
        .scrape_url("https://www.ebay.com/itm/42")
        .await
        .unwrap_err();
    assert!(matches!(err, ReviewError::UnsupportedSource(SourceType::Unsupported)));

    let err = scraper
        .scrape_url("https://www.amazon.in/gp/bestsellers")
        .await
        .unwrap_err();
    assert!(matches!(err, ReviewError::IdentifierNotFound));

    let err = scraper.scrape_url("   ").await.unwrap_err();
    assert!(matches!(err, ReviewError::MissingUrl));

    assert_eq!(renderer.opened(), 0);
}

#[tokio::test]
async fn test_page_count_is_respected() {
    let renderer = ScriptedRenderer::new(vec![(AMAZON_PAGE_1, Page::texts(&["Only page"]))]);
    let scraper = scraper_with(&renderer);

    let reviews = scraper.extract(&amazon_reference(), 1).await.unwrap();

    assert_eq!(reviews, vec!["Only page"]);
    assert_eq!(renderer.visited(), vec![AMAZON_PAGE_1]);
}

#[tokio::test]
async fn test_extract_from_custom_source() {
    let renderer = ScriptedRenderer::new(vec![(
        "https://www.flipkart.com/p?page=1",
        Page::texts(&[" Nice "]),
    )]);
    let scraper = scraper_with(&renderer);

    let reviews = scraper
        .extract_from(&FlipkartReviews::new("https://www.flipkart.com/p"), 3)
        .await
        .unwrap();

    assert_eq!(reviews, vec!["Nice"]);
    assert_eq!(renderer.visited().len(), 3);
}

fn settling_scraper(renderer: &ScriptedRenderer, settle_delay: Duration) -> ReviewScraper {
    let settings = ScrapeSettings {
        timing: PageTiming {
            settle_delay,
            content_timeout: Duration::from_millis(10),
        },
        ..ScrapeSettings::default()
    };
    ReviewScraper::new(Arc::new(renderer.clone()), settings)
}

#[tokio::test(start_paused = true)]
async fn test_settle_delay_applied_per_page() {
    let renderer = ScriptedRenderer::new(vec![
        (AMAZON_PAGE_1, Page::texts(&["First"])),
        (AMAZON_PAGE_2, Page::Timeout),
    ]);
    let delay = Duration::from_secs(2);
    let scraper = settling_scraper(&renderer, delay);

    let started = tokio::time::Instant::now();
    let reviews = scraper.extract(&amazon_reference(), 2).await.unwrap();

    assert_eq!(reviews, vec!["First"]);
    assert_eq!(started.elapsed(), delay * 2);
}

#[tokio::test(start_paused = true)]
async fn test_settle_delay_skipped_without_javascript() {
    let renderer =
        ScriptedRenderer::new(vec![(AMAZON_PAGE_1, Page::texts(&["First"]))]).without_settling();
    let scraper = settling_scraper(&renderer, Duration::from_secs(2));

    let started = tokio::time::Instant::now();
    let reviews = scraper.extract(&amazon_reference(), 2).await.unwrap();

    assert_eq!(reviews, vec!["First"]);
    assert_eq!(started.elapsed(), Duration::ZERO);
    assert_eq!(renderer.visited().len(), 2);
}
