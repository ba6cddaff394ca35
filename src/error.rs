//! Error taxonomy for extraction, rendering and analysis.

use thiserror::Error;

use crate::source::SourceType;

/// Faults raised by a [`crate::renderer::RenderSession`].
///
/// Page-level faults are recoverable: the page loop records zero fragments for
/// that page and moves on. Session-level faults abort the whole extraction.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("timed out waiting for `{selector}` on {url}")]
    ContentTimeout { url: String, selector: String },

    #[error("failed to load {url}: {reason}")]
    Navigation { url: String, reason: String },

    #[error("invalid selector `{0}`")]
    Selector(String),

    #[error("renderer session could not be established: {0}")]
    Launch(String),

    #[error("renderer session lost: {0}")]
    SessionLost(String),
}

impl RenderError {
    /// Whether the fault is contained to a single page.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            RenderError::ContentTimeout { .. } | RenderError::Navigation { .. }
        )
    }
}

/// Caller-visible failures of the extract and analyze operations.
#[derive(Debug, Error)]
pub enum ReviewError {
    #[error("No URL provided")]
    MissingUrl,

    #[error("source not supported")]
    UnsupportedSource(SourceType),

    #[error("identifier not found")]
    IdentifierNotFound,

    #[error("no reviews found")]
    NoReviewsFound,

    #[error("no reviews to analyze")]
    NoReviewsToAnalyze,

    #[error("Scraping failed: {0}")]
    Extraction(#[from] RenderError),
}

impl ReviewError {
    /// Input problems the caller can fix, as opposed to internal failures.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, ReviewError::Extraction(_))
    }
}

#[derive(Debug, Error)]
pub enum LexiconError {
    #[error("failed to read lexicon: {0}")]
    Io(#[from] std::io::Error),

    #[error("lexicon line {line}: invalid valence `{value}`")]
    InvalidValence { line: usize, value: String },

    #[error("lexicon is empty")]
    Empty,
}
