//! HTTP surface: `/scrape`, `/analyze`, OpenAPI docs and the static front end.

use std::path::Path;
use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::{
    cors::CorsLayer,
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};
use tracing::{error, info};
use utoipa::{OpenApi, ToSchema};
use utoipa_swagger_ui::SwaggerUi;

use crate::analysis::{analyze_reviews, summarize, AnalyzedReview, SentimentSummary};
use crate::crawler::ReviewScraper;
use crate::error::ReviewError;
use crate::ml::{SentimentAnalyzer, SentimentLabel, SentimentScore};

pub struct AppState {
    pub scraper: ReviewScraper,
    pub analyzer: Arc<SentimentAnalyzer>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ScrapeRequest {
    /// Product or review-listing URL on a supported marketplace.
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ScrapeResponse {
    pub reviews: Vec<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AnalyzeRequest {
    /// Review texts to classify. Absent and `null` are both treated as empty.
    #[serde(default)]
    pub reviews: Option<Vec<String>>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AnalyzeResponse {
    pub results: Vec<AnalyzedReview>,
    pub summary: SentimentSummary,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

impl IntoResponse for ReviewError {
    fn into_response(self) -> Response {
        let status = if self.is_client_error() {
            StatusCode::BAD_REQUEST
        } else {
            error!("❌ {}", self);
            StatusCode::INTERNAL_SERVER_ERROR
        };
        (
            status,
            Json(ErrorResponse {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(scrape, analyze),
    components(schemas(
        ScrapeRequest,
        ScrapeResponse,
        AnalyzeRequest,
        AnalyzeResponse,
        ErrorResponse,
        AnalyzedReview,
        SentimentSummary,
        SentimentScore,
        SentimentLabel
    )),
    tags(
        (name = "reviews", description = "Review extraction and sentiment analysis")
    )
)]
pub struct ApiDoc;

/// Scrape up to 10 reviews for a product URL.
#[utoipa::path(
    post,
    path = "/scrape",
    request_body = ScrapeRequest,
    responses(
        (status = 200, description = "Reviews extracted", body = ScrapeResponse),
        (status = 400, description = "Missing URL, unsupported source, identifier not found or no reviews", body = ErrorResponse),
        (status = 500, description = "Scraping failed", body = ErrorResponse)
    ),
    tag = "reviews"
)]
pub async fn scrape(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ScrapeRequest>,
) -> Result<Json<ScrapeResponse>, ReviewError> {
    let url = req.url.unwrap_or_default();
    let reviews = state.scraper.scrape_url(&url).await?;
    Ok(Json(ScrapeResponse { reviews }))
}

/// Classify the sentiment of each submitted review.
#[utoipa::path(
    post,
    path = "/analyze",
    request_body = AnalyzeRequest,
    responses(
        (status = 200, description = "One result per review, in input order", body = AnalyzeResponse),
        (status = 400, description = "No reviews to analyze", body = ErrorResponse)
    ),
    tag = "reviews"
)]
pub async fn analyze(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AnalyzeRequest>,
) -> Result<Json<AnalyzeResponse>, ReviewError> {
    let reviews = req.reviews.unwrap_or_default();
    let results = analyze_reviews(&state.analyzer, &reviews)?;
    let summary = summarize(&results);
    info!(
        "🧠 Analyzed {} reviews: {} positive, {} negative, {} neutral",
        summary.total, summary.positive, summary.negative, summary.neutral
    );
    Ok(Json(AnalyzeResponse { results, summary }))
}

/// Builds the application router. Paths other than the API routes are served
/// from `static_dir`, falling back to its `index.html`.
pub fn router(state: Arc<AppState>, static_dir: &Path) -> Router {
    let assets = ServeDir::new(static_dir).fallback(ServeFile::new(static_dir.join("index.html")));

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/scrape", post(scrape))
        .route("/analyze", post(analyze))
        .fallback_service(assets)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
