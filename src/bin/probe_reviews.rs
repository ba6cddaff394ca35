//! Scrapes one product URL and prints the reviews with their sentiment.
//! Useful for checking whether the site selectors still match.
//!
//! Usage: probe_reviews <product-url> [max-pages]

use std::sync::Arc;

use anyhow::{bail, Context, Result};
use dotenv::dotenv;

use review_sentiment::analysis::{analyze_reviews, summarize};
use review_sentiment::config::{RendererKind, Settings};
use review_sentiment::crawler::ReviewScraper;
use review_sentiment::ml::SentimentAnalyzer;
use review_sentiment::renderer::{ChromeRenderer, HttpRenderer, Renderer};
use review_sentiment::source::classify_reference;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt::init();

    let mut args = std::env::args().skip(1);
    let Some(url) = args.next() else {
        bail!("usage: probe_reviews <product-url> [max-pages]");
    };

    let settings = Settings::from_env();
    let max_pages = match args.next() {
        Some(raw) => raw.parse().context("max-pages must be a number")?,
        None => settings.scrape.max_pages,
    };

    let reference = classify_reference(&url)?;
    println!("🔎 {} -> {:?}", url, reference);

    let renderer: Arc<dyn Renderer> = match settings.renderer {
        RendererKind::Chrome => Arc::new(ChromeRenderer::new(settings.chrome_headless)),
        RendererKind::Http => Arc::new(HttpRenderer::default()),
    };
    let scraper = ReviewScraper::new(renderer, settings.scrape.clone());

    let reviews = scraper.extract(&reference, max_pages).await?;
    if reviews.is_empty() {
        println!("⚠️ No reviews extracted. Selectors may no longer match the page markup.");
        return Ok(());
    }

    let results = analyze_reviews(&SentimentAnalyzer::shared(), &reviews)?;
    for (idx, result) in results.iter().enumerate() {
        println!(
            "{:>2}. [{:?} {:+.4}] {}",
            idx + 1,
            result.sentiment,
            result.score.compound,
            result.text
        );
    }

    let summary = summarize(&results);
    println!(
        "🧠 {} reviews: {} positive, {} negative, {} neutral",
        summary.total, summary.positive, summary.negative, summary.neutral
    );
    Ok(())
}
