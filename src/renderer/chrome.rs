use std::ffi::OsStr;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use headless_chrome::{Browser, LaunchOptions, Tab};
use tokio::task::block_in_place;
use tracing::{debug, info};

use super::{random_user_agent, RenderSession, Renderer};
use crate::error::RenderError;

/// Headless Chrome backed renderer. Each session owns its own browser
/// process, which is killed when the session is closed or dropped.
///
/// headless_chrome is blocking, so session calls run under `block_in_place`
/// and need a multi-threaded tokio runtime.
#[derive(Debug, Clone)]
pub struct ChromeRenderer {
    headless: bool,
}

impl ChromeRenderer {
    pub fn new(headless: bool) -> Self {
        Self { headless }
    }

    fn launch(&self) -> Result<ChromeSession, RenderError> {
        let user_agent = random_user_agent();
        let ua_arg = format!("--user-agent={}", user_agent);

        let mut args = vec![
            OsStr::new("--disable-blink-features=AutomationControlled"),
            OsStr::new("--disable-gpu"),
            OsStr::new("--disable-extensions"),
            OsStr::new("--disable-dev-shm-usage"),
            OsStr::new("--disable-infobars"),
            OsStr::new("--disable-logging"),
            OsStr::new("--no-sandbox"),
            OsStr::new("--disable-features=SmartScreen"),
            OsStr::new(&ua_arg),
        ];
        if self.headless {
            args.push(OsStr::new("--headless=new"));
        }

        debug!("Launching Chrome (headless: {}, ua: {})", self.headless, user_agent);
        let browser = Browser::new(LaunchOptions {
            // headless mode is selected through --headless=new above
            headless: false,
            window_size: Some((1920, 1080)),
            args,
            ..Default::default()
        })
        .map_err(|e| RenderError::Launch(e.to_string()))?;

        let tab = browser
            .new_tab()
            .map_err(|e| RenderError::Launch(e.to_string()))?;

        Ok(ChromeSession {
            browser: Some(browser),
            tab,
        })
    }
}

impl Default for ChromeRenderer {
    fn default() -> Self {
        Self::new(true)
    }
}

#[async_trait]
impl Renderer for ChromeRenderer {
    fn name(&self) -> &'static str {
        "chrome"
    }

    async fn open_session(&self) -> Result<Box<dyn RenderSession>, RenderError> {
        let session = block_in_place(|| self.launch())?;
        info!("🌐 Chrome session started");
        Ok(Box::new(session))
    }
}

pub struct ChromeSession {
    browser: Option<Browser>,
    tab: Arc<Tab>,
}

impl ChromeSession {
    fn ensure_open(&self) -> Result<(), RenderError> {
        if self.browser.is_none() {
            return Err(RenderError::SessionLost("session already closed".to_string()));
        }
        Ok(())
    }

    /// Pings the browser after a failed call, so a crashed browser or a dropped
    /// DevTools connection aborts the extraction instead of skipping pages.
    fn triage(&self, fault: RenderError) -> RenderError {
        let alive = block_in_place(|| {
            self.browser
                .as_ref()
                .is_some_and(|browser| browser.get_version().is_ok())
        });
        escalate_unless_alive(fault, alive)
    }
}

fn escalate_unless_alive(fault: RenderError, browser_alive: bool) -> RenderError {
    if browser_alive {
        fault
    } else {
        RenderError::SessionLost(format!("browser stopped responding ({})", fault))
    }
}

#[async_trait]
impl RenderSession for ChromeSession {
    async fn load(&mut self, url: &str) -> Result<(), RenderError> {
        self.ensure_open()?;
        let tab = self.tab.clone();
        let navigated = block_in_place(|| {
            tab.navigate_to(url)?;
            tab.wait_until_navigated()?;
            Ok::<_, anyhow::Error>(())
        });

        navigated.map_err(|e| {
            self.triage(RenderError::Navigation {
                url: url.to_string(),
                reason: e.to_string(),
            })
        })
    }

    async fn texts_matching(
        &mut self,
        selector: &str,
        timeout: Duration,
    ) -> Result<Vec<String>, RenderError> {
        self.ensure_open()?;
        let tab = self.tab.clone();
        let matched = block_in_place(|| {
            if tab
                .wait_for_element_with_custom_timeout(selector, timeout)
                .is_err()
            {
                return Err(RenderError::ContentTimeout {
                    url: tab.get_url(),
                    selector: selector.to_string(),
                });
            }

            let elements = tab.find_elements(selector).map_err(|e| RenderError::Navigation {
                url: tab.get_url(),
                reason: e.to_string(),
            })?;

            // Elements can detach while we read them; skip those.
            Ok(elements
                .iter()
                .filter_map(|element| element.get_inner_text().ok())
                .collect())
        });

        matched.map_err(|fault| self.triage(fault))
    }

    async fn close(&mut self) {
        if let Some(browser) = self.browser.take() {
            let tab = self.tab.clone();
            block_in_place(|| {
                if let Err(e) = tab.close(false) {
                    debug!("Failed to close tab: {}", e);
                }
                drop(browser);
            });
            info!("🌐 Chrome session closed");
        }
    }
}
