//! Review text cleanup applied to raw fragments from rendered pages.

/// Upper bound on the number of reviews returned by one extraction.
pub const MAX_REVIEWS: usize = 10;

/// Trims a raw fragment, dropping it if nothing is left.
pub fn clean_fragment(raw: &str) -> Option<String> {
    let text = raw.trim();
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

/// Keeps the first [`MAX_REVIEWS`] reviews in their original order.
pub fn cap_reviews(mut reviews: Vec<String>) -> Vec<String> {
    reviews.truncate(MAX_REVIEWS);
    reviews
}
