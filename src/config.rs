//! Process configuration read from the environment (and `.env` via dotenv).

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use tracing::warn;

pub const DEFAULT_MAX_PAGES: u32 = 2;
pub const DEFAULT_SETTLE_DELAY_MS: u64 = 2000;
pub const DEFAULT_CONTENT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_AMAZON_BASE_URL: &str = "https://www.amazon.in";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RendererKind {
    /// Headless Chrome, executes page JavaScript.
    Chrome,
    /// Plain HTTP fetch + static HTML parsing.
    Http,
}

impl FromStr for RendererKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "chrome" | "headless_chrome" => Ok(RendererKind::Chrome),
            "http" | "reqwest" => Ok(RendererKind::Http),
            other => Err(format!("unknown renderer `{}`", other)),
        }
    }
}

/// Per-page waits applied by the site adapters.
#[derive(Debug, Clone, Copy)]
pub struct PageTiming {
    /// Pause after navigation so client-side rendering can finish.
    pub settle_delay: Duration,
    /// Upper bound on waiting for the first review element.
    pub content_timeout: Duration,
}

impl Default for PageTiming {
    fn default() -> Self {
        Self {
            settle_delay: Duration::from_millis(DEFAULT_SETTLE_DELAY_MS),
            content_timeout: Duration::from_secs(DEFAULT_CONTENT_TIMEOUT_SECS),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ScrapeSettings {
    pub max_pages: u32,
    pub timing: PageTiming,
    pub amazon_base_url: String,
}

impl Default for ScrapeSettings {
    fn default() -> Self {
        Self {
            max_pages: DEFAULT_MAX_PAGES,
            timing: PageTiming::default(),
            amazon_base_url: DEFAULT_AMAZON_BASE_URL.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub bind_addr: String,
    pub static_dir: PathBuf,
    pub renderer: RendererKind,
    pub chrome_headless: bool,
    pub lexicon_path: Option<PathBuf>,
    pub scrape: ScrapeSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:5000".to_string(),
            static_dir: PathBuf::from("frontend/build"),
            renderer: RendererKind::Chrome,
            chrome_headless: true,
            lexicon_path: None,
            scrape: ScrapeSettings::default(),
        }
    }
}

impl Settings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds settings from an arbitrary key lookup. Unparseable values fall
    /// back to their defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Settings::default();

        let scrape = ScrapeSettings {
            max_pages: parsed(&lookup, "MAX_PAGES", DEFAULT_MAX_PAGES).max(1),
            timing: PageTiming {
                settle_delay: Duration::from_millis(parsed(
                    &lookup,
                    "SETTLE_DELAY_MS",
                    DEFAULT_SETTLE_DELAY_MS,
                )),
                content_timeout: Duration::from_secs(parsed(
                    &lookup,
                    "CONTENT_TIMEOUT_SECS",
                    DEFAULT_CONTENT_TIMEOUT_SECS,
                )),
            },
            amazon_base_url: lookup("AMAZON_BASE_URL")
                .map(|s| s.trim().trim_end_matches('/').to_string())
                .filter(|s| !s.is_empty())
                .unwrap_or(defaults.scrape.amazon_base_url),
        };

        Self {
            bind_addr: lookup("BIND_ADDR").unwrap_or(defaults.bind_addr),
            static_dir: lookup("STATIC_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.static_dir),
            renderer: parsed(&lookup, "RENDERER", defaults.renderer),
            chrome_headless: parsed(&lookup, "CHROME_HEADLESS", defaults.chrome_headless),
            lexicon_path: lookup("LEXICON_PATH")
                .filter(|s| !s.trim().is_empty())
                .map(PathBuf::from),
            scrape,
        }
    }
}

fn parsed<T, F>(lookup: &F, key: &str, default: T) -> T
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => match raw.trim().parse::<T>() {
            Ok(value) => value,
            Err(_) => {
                warn!("⚠️ Ignoring invalid {}={:?}, using default", key, raw);
                default
            }
        },
        None => default,
    }
}
