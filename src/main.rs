use std::sync::Arc;

use dotenv::dotenv;
use tracing::info;
use tracing_subscriber::EnvFilter;

use review_sentiment::api::{self, AppState};
use review_sentiment::config::{RendererKind, Settings};
use review_sentiment::crawler::ReviewScraper;
use review_sentiment::ml::{Lexicon, SentimentAnalyzer};
use review_sentiment::renderer::{ChromeRenderer, HttpRenderer, Renderer};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let settings = Settings::from_env();

    let analyzer = match &settings.lexicon_path {
        Some(path) => {
            let lexicon = Lexicon::from_file(path)?;
            info!("📖 Loaded {} lexicon entries from {}", lexicon.len(), path.display());
            Arc::new(SentimentAnalyzer::new(lexicon))
        }
        None => SentimentAnalyzer::shared(),
    };

    let renderer: Arc<dyn Renderer> = match settings.renderer {
        RendererKind::Chrome => Arc::new(ChromeRenderer::new(settings.chrome_headless)),
        RendererKind::Http => Arc::new(HttpRenderer::default()),
    };
    info!(
        "🌐 Renderer: {} (max pages: {})",
        renderer.name(),
        settings.scrape.max_pages
    );

    let state = Arc::new(AppState {
        scraper: ReviewScraper::new(renderer, settings.scrape.clone()),
        analyzer,
    });

    let app = api::router(state, &settings.static_dir);

    let listener = tokio::net::TcpListener::bind(&settings.bind_addr).await?;
    info!("Listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}
