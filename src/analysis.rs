//! Turns review texts into labeled sentiment results.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::ReviewError;
use crate::ml::{SentimentAnalyzer, SentimentLabel, SentimentScore};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AnalyzedReview {
    /// Review text exactly as submitted.
    pub text: String,
    pub sentiment: SentimentLabel,
    pub score: SentimentScore,
}

/// Label counts over a batch of analyzed reviews.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SentimentSummary {
    pub total: usize,
    pub positive: usize,
    pub negative: usize,
    pub neutral: usize,
}

/// Scores every review, keeping input order and duplicates. An empty batch
/// is an error rather than an empty success.
pub fn analyze_reviews<S: AsRef<str>>(
    analyzer: &SentimentAnalyzer,
    reviews: &[S],
) -> Result<Vec<AnalyzedReview>, ReviewError> {
    if reviews.is_empty() {
        return Err(ReviewError::NoReviewsToAnalyze);
    }

    Ok(reviews
        .iter()
        .map(|review| {
            let text = review.as_ref();
            let score = analyzer.polarity_scores(text);
            AnalyzedReview {
                text: text.to_string(),
                sentiment: score.label(),
                score,
            }
        })
        .collect())
}

pub fn summarize(results: &[AnalyzedReview]) -> SentimentSummary {
    results
        .iter()
        .fold(SentimentSummary::default(), |mut summary, result| {
            summary.total += 1;
            match result.sentiment {
                SentimentLabel::Positive => summary.positive += 1,
                SentimentLabel::Negative => summary.negative += 1,
                SentimentLabel::Neutral => summary.neutral += 1,
            }
            summary
        })
}
