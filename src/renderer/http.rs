use std::time::Duration;

use async_trait::async_trait;
use scraper::{Html, Selector};
use tracing::debug;

use super::{random_user_agent, RenderSession, Renderer};
use crate::error::RenderError;

/// Fetches pages over plain HTTP and queries the static markup. Nothing is
/// executed client-side, so there is no settling and no waiting: a selector
/// that matches nothing is reported as a content timeout straight away.
#[derive(Debug, Clone)]
pub struct HttpRenderer {
    request_timeout: Duration,
}

impl HttpRenderer {
    pub fn new(request_timeout: Duration) -> Self {
        Self { request_timeout }
    }
}

impl Default for HttpRenderer {
    fn default() -> Self {
        Self::new(Duration::from_secs(30))
    }
}

#[async_trait]
impl Renderer for HttpRenderer {
    fn name(&self) -> &'static str {
        "http"
    }

    async fn open_session(&self) -> Result<Box<dyn RenderSession>, RenderError> {
        let client = reqwest::Client::builder()
            .user_agent(random_user_agent())
            .redirect(reqwest::redirect::Policy::limited(10))
            .timeout(self.request_timeout)
            .build()
            .map_err(|e| RenderError::Launch(e.to_string()))?;

        Ok(Box::new(HttpSession {
            client: Some(client),
            url: String::new(),
            html: String::new(),
        }))
    }
}

pub struct HttpSession {
    client: Option<reqwest::Client>,
    url: String,
    html: String,
}

#[async_trait]
impl RenderSession for HttpSession {
    async fn load(&mut self, url: &str) -> Result<(), RenderError> {
        let client = self
            .client
            .as_ref()
            .ok_or_else(|| RenderError::SessionLost("session already closed".to_string()))?;

        let navigation_error = |e: reqwest::Error| RenderError::Navigation {
            url: url.to_string(),
            reason: e.to_string(),
        };

        let resp = client
            .get(url)
            .header("Accept-Language", "en-US,en;q=0.9")
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(navigation_error)?;
        let html = resp.text().await.map_err(navigation_error)?;

        debug!("Fetched {} ({} bytes)", url, html.len());
        self.url = url.to_string();
        self.html = html;
        Ok(())
    }

    fn needs_settling(&self) -> bool {
        false
    }

    async fn texts_matching(
        &mut self,
        selector: &str,
        _timeout: Duration,
    ) -> Result<Vec<String>, RenderError> {
        let texts = select_texts(&self.html, selector)?;
        if texts.is_empty() {
            return Err(RenderError::ContentTimeout {
                url: self.url.clone(),
                selector: selector.to_string(),
            });
        }
        Ok(texts)
    }

    async fn close(&mut self) {
        self.client = None;
        self.html.clear();
    }
}

/// Text content of each element matching `selector`, in document order.
pub fn select_texts(html: &str, selector: &str) -> Result<Vec<String>, RenderError> {
    let selector =
        Selector::parse(selector).map_err(|_| RenderError::Selector(selector.to_string()))?;
    let document = Html::parse_document(html);
    Ok(document
        .select(&selector)
        .map(|el| el.text().collect::<String>())
        .collect())
}
