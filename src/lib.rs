//! Marketplace review extraction and lexicon-based sentiment analysis.
//!
//! Extraction: [`source`] classifies a product URL, [`crawler`] walks the
//! matching site adapter's listing pages through a [`renderer`] and
//! [`normalize`] trims and caps what it finds. Analysis: [`ml`] scores text
//! and [`analysis`] labels batches of reviews. [`api`] exposes both over HTTP.

pub mod analysis;
pub mod api;
pub mod config;
pub mod crawler;
pub mod error;
pub mod ml;
pub mod normalize;
pub mod renderer;
pub mod source;

pub use analysis::{analyze_reviews, AnalyzedReview, SentimentSummary};
pub use crawler::ReviewScraper;
pub use error::{RenderError, ReviewError};
pub use ml::{SentimentAnalyzer, SentimentLabel, SentimentScore};
pub use source::{classify, classify_reference, ProductReference, SourceType};
