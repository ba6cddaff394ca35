//! Marketplace detection for product URLs.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::error::ReviewError;

// 10 uppercase letters/digits between a `/` and a `/`, `?` or the end of the URL.
static PRODUCT_ID_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/([A-Z0-9]{10})(?:[/?]|$)").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SourceType {
    AmazonLike,
    FlipkartLike,
    /// Recognized, but scraping it is not supported.
    AlibabaLike,
    Unsupported,
}

impl fmt::Display for SourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SourceType::AmazonLike => "amazon",
            SourceType::FlipkartLike => "flipkart",
            SourceType::AlibabaLike => "alibaba",
            SourceType::Unsupported => "unsupported",
        };
        f.write_str(name)
    }
}

/// What a site adapter needs to locate a product's reviews.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProductReference {
    Amazon { product_id: String },
    /// Flipkart listings are paginated off the URL the user supplied.
    Flipkart { listing_url: String },
}

impl ProductReference {
    pub fn source(&self) -> SourceType {
        match self {
            ProductReference::Amazon { .. } => SourceType::AmazonLike,
            ProductReference::Flipkart { .. } => SourceType::FlipkartLike,
        }
    }
}

/// Classifies a URL by marketplace. Checks run in a fixed order: the Amazon
/// family (including `amzn.` short links) wins over everything else.
pub fn classify(url: &str) -> SourceType {
    let url = url.to_lowercase();
    if url.contains("amazon.") || url.contains("amzn.") {
        SourceType::AmazonLike
    } else if url.contains("flipkart.com") {
        SourceType::FlipkartLike
    } else if url.contains("alibaba.com") {
        SourceType::AlibabaLike
    } else {
        SourceType::Unsupported
    }
}

/// Finds the first Amazon product identifier (ASIN) in the URL.
pub fn extract_product_id(url: &str) -> Option<String> {
    PRODUCT_ID_PATTERN
        .captures(url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Classifies `url` and resolves the reference its adapter needs.
pub fn classify_reference(url: &str) -> Result<ProductReference, ReviewError> {
    match classify(url) {
        SourceType::AmazonLike => extract_product_id(url)
            .map(|product_id| ProductReference::Amazon { product_id })
            .ok_or(ReviewError::IdentifierNotFound),
        SourceType::FlipkartLike => Ok(ProductReference::Flipkart {
            listing_url: url.to_string(),
        }),
        other => Err(ReviewError::UnsupportedSource(other)),
    }
}
