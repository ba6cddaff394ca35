//! Page rendering backends used by the site adapters.
//!
//! A [`Renderer`] hands out one exclusively-owned [`RenderSession`] per
//! extraction. Sessions load a URL and answer "which texts match this
//! selector", waiting up to a timeout for the first match.

use std::time::Duration;

use async_trait::async_trait;
use once_cell::sync::Lazy;
use rand::seq::SliceRandom;

use crate::error::RenderError;

pub mod chrome;
pub mod http;

pub use chrome::ChromeRenderer;
pub use http::HttpRenderer;

static USER_AGENTS: Lazy<Vec<&'static str>> = Lazy::new(|| {
    vec![
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/123.0.0.0 Safari/537.36",
        "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/123.0.0.0 Safari/537.36",
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/123.0.0.0 Safari/537.36 Edg/123.0.0.0",
        "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/123.0.0.0 Safari/537.36",
    ]
});

const FALLBACK_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/123.0.0.0 Safari/537.36";

/// Picks a desktop browser user agent for a new session.
pub fn random_user_agent() -> &'static str {
    USER_AGENTS
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or(FALLBACK_USER_AGENT)
}

#[async_trait]
pub trait Renderer: Send + Sync {
    fn name(&self) -> &'static str;

    /// Starts a session. Failure here is fatal for the extraction.
    async fn open_session(&self) -> Result<Box<dyn RenderSession>, RenderError>;
}

#[async_trait]
pub trait RenderSession: Send {
    /// Navigates to `url`.
    async fn load(&mut self, url: &str) -> Result<(), RenderError>;

    /// Whether loaded pages keep changing after navigation (client-side
    /// rendering), so callers should pause before querying.
    fn needs_settling(&self) -> bool {
        true
    }

    /// Text of every element matching `selector` on the current page, in
    /// document order. Returns [`RenderError::ContentTimeout`] when nothing
    /// matched within `timeout`.
    async fn texts_matching(
        &mut self,
        selector: &str,
        timeout: Duration,
    ) -> Result<Vec<String>, RenderError>;

    /// Releases the session. Safe to call more than once.
    async fn close(&mut self);
}
