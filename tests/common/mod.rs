//! Scripted in-memory renderer for driving the site adapters in tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use review_sentiment::config::{PageTiming, ScrapeSettings};
use review_sentiment::error::RenderError;
use review_sentiment::renderer::{RenderSession, Renderer};

#[derive(Debug, Clone)]
pub enum Page {
    /// Raw element texts, untrimmed.
    Texts(Vec<String>),
    /// Nothing matched before the wait expired.
    Timeout,
    /// Navigation itself failed.
    LoadFault,
    /// The browser went away mid-extraction.
    SessionLost,
}

impl Page {
    pub fn texts(texts: &[&str]) -> Self {
        Page::Texts(texts.iter().map(|t| t.to_string()).collect())
    }
}

#[derive(Debug, Default)]
pub struct Journal {
    pub opened: usize,
    pub closed: usize,
    pub visited: Vec<String>,
    pub selectors: Vec<String>,
}

#[derive(Clone, Default)]
pub struct ScriptedRenderer {
    pages: Arc<HashMap<String, Page>>,
    fail_to_open: bool,
    settles: bool,
    pub journal: Arc<Mutex<Journal>>,
}

impl ScriptedRenderer {
    pub fn new(pages: Vec<(&str, Page)>) -> Self {
        Self {
            pages: Arc::new(pages.into_iter().map(|(url, page)| (url.to_string(), page)).collect()),
            fail_to_open: false,
            settles: true,
            journal: Arc::default(),
        }
    }

    /// Sessions report that pages need no settling, like a non-JS renderer.
    pub fn without_settling(mut self) -> Self {
        self.settles = false;
        self
    }

    pub fn unavailable() -> Self {
        Self {
            fail_to_open: true,
            ..Self::default()
        }
    }

    pub fn opened(&self) -> usize {
        self.journal.lock().unwrap().opened
    }

    pub fn closed(&self) -> usize {
        self.journal.lock().unwrap().closed
    }

    pub fn visited(&self) -> Vec<String> {
        self.journal.lock().unwrap().visited.clone()
    }

    pub fn selectors(&self) -> Vec<String> {
        self.journal.lock().unwrap().selectors.clone()
    }
}

#[async_trait]
impl Renderer for ScriptedRenderer {
    fn name(&self) -> &'static str {
        "scripted"
    }

    async fn open_session(&self) -> Result<Box<dyn RenderSession>, RenderError> {
        if self.fail_to_open {
            return Err(RenderError::Launch("no browser available".to_string()));
        }
        self.journal.lock().unwrap().opened += 1;
        Ok(Box::new(ScriptedSession {
            pages: self.pages.clone(),
            journal: self.journal.clone(),
            current: None,
            settles: self.settles,
            closed: false,
        }))
    }
}

struct ScriptedSession {
    pages: Arc<HashMap<String, Page>>,
    journal: Arc<Mutex<Journal>>,
    current: Option<(String, Page)>,
    settles: bool,
    closed: bool,
}

#[async_trait]
impl RenderSession for ScriptedSession {
    async fn load(&mut self, url: &str) -> Result<(), RenderError> {
        self.journal.lock().unwrap().visited.push(url.to_string());
        match self.pages.get(url).cloned().unwrap_or(Page::Timeout) {
            Page::LoadFault => Err(RenderError::Navigation {
                url: url.to_string(),
                reason: "net::ERR_CONNECTION_RESET".to_string(),
            }),
            page => {
                self.current = Some((url.to_string(), page));
                Ok(())
            }
        }
    }

    fn needs_settling(&self) -> bool {
        self.settles
    }

    async fn texts_matching(
        &mut self,
        selector: &str,
        _timeout: Duration,
    ) -> Result<Vec<String>, RenderError> {
        self.journal.lock().unwrap().selectors.push(selector.to_string());
        let (url, page) = self
            .current
            .clone()
            .ok_or_else(|| RenderError::SessionLost("nothing loaded".to_string()))?;
        match page {
            Page::Texts(texts) => Ok(texts),
            Page::Timeout | Page::LoadFault => Err(RenderError::ContentTimeout {
                url,
                selector: selector.to_string(),
            }),
            Page::SessionLost => Err(RenderError::SessionLost("target closed".to_string())),
        }
    }

    async fn close(&mut self) {
        if !self.closed {
            self.closed = true;
            self.journal.lock().unwrap().closed += 1;
        }
    }
}

/// Scrape settings with no settling delay.
pub fn fast_settings() -> ScrapeSettings {
    ScrapeSettings {
        timing: PageTiming {
            settle_delay: Duration::ZERO,
            content_timeout: Duration::from_millis(10),
        },
        ..ScrapeSettings::default()
    }
}

pub const AMAZON_PAGE_1: &str = "https://www.amazon.in/product-reviews/B08N5WRWNW/?pageNumber=1";
pub const AMAZON_PAGE_2: &str = "https://www.amazon.in/product-reviews/B08N5WRWNW/?pageNumber=2";
pub const AMAZON_PRODUCT: &str = "https://www.amazon.in/dp/B08N5WRWNW";
