//! Google Trends scraped through a headless Chromium session.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::handler::viewport::Viewport;
use chromiumoxide::Page;
use futures::StreamExt;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use crate::errors::SourceError;
use crate::ingest::record_source_outcome;
use crate::ingest::trends::{extract_trends_line, TRENDS_SEPARATOR};
use crate::ingest::types::TrendsSource;

pub const TRENDS_URL: &str = "https://trends.google.com/trending?geo=US";

#[derive(Debug, Clone)]
pub struct TrendsScraperConfig {
    pub url: String,
    pub user_agent: String,
    pub window: (u32, u32),
    pub navigation_timeout: Duration,
    pub selector_timeout: Duration,
    /// Pause after the body appears, for client-side rendering to finish.
    pub settle_delay: Duration,
}

impl TrendsScraperConfig {
    pub fn for_channel(channel: &str) -> Self {
        let name = if channel.is_empty() { "hot-bot" } else { channel };
        Self {
            url: TRENDS_URL.to_string(),
            user_agent: format!("{name}-bot/1.0"),
            window: (1920, 1080),
            navigation_timeout: Duration::from_secs(30),
            selector_timeout: Duration::from_secs(10),
            settle_delay: Duration::from_secs(3),
        }
    }
}

struct BrowserSession {
    browser: Browser,
    handler: JoinHandle<()>,
}

/// Reads the trends page text. The browser is launched on first use and
/// kept until [`TrendsScraper::shutdown`]; every page is closed after use.
pub struct TrendsScraper {
    config: TrendsScraperConfig,
    session: Mutex<Option<BrowserSession>>,
}

fn browser_err(e: impl std::fmt::Display) -> SourceError {
    SourceError::Browser(e.to_string())
}

impl TrendsScraper {
    pub fn new(config: TrendsScraperConfig) -> Self {
        Self {
            config,
            session: Mutex::new(None),
        }
    }

    async fn launch(&self) -> Result<BrowserSession, SourceError> {
        let (w, h) = self.config.window;
        let config = BrowserConfig::builder()
            .window_size(w, h)
            .viewport(Viewport {
                width: w,
                height: h,
                device_scale_factor: None,
                emulating_mobile: false,
                is_landscape: true,
                has_touch: false,
            })
            .arg("--no-sandbox")
            .arg("--disable-setuid-sandbox")
            .arg("--disable-dev-shm-usage")
            .arg("--no-first-run")
            .arg("--single-process")
            .arg("--disable-gpu")
            .arg(format!("--user-agent={}", self.config.user_agent))
            .build()
            .map_err(browser_err)?;

        tracing::info!(source = "trends", "launching headless browser");
        let (browser, mut handler) = Browser::launch(config).await.map_err(browser_err)?;

        let handler = tokio::spawn(async move {
            while let Some(h) = handler.next().await {
                if h.is_err() {
                    break;
                }
            }
        });

        Ok(BrowserSession { browser, handler })
    }

    pub async fn fetch_trends_line(&self, limit: usize) -> Option<String> {
        tracing::info!(source = "trends", limit, "fetching google trends");
        match self.try_fetch(limit).await {
            Ok(line) => Some(line),
            Err(e) => {
                tracing::warn!(error = %e, source = "trends", "trends source unavailable");
                None
            }
        }
    }

    pub async fn try_fetch(&self, limit: usize) -> Result<String, SourceError> {
        let mut guard = self.session.lock().await;
        if guard.is_none() {
            *guard = Some(self.launch().await?);
        }
        let Some(session) = guard.as_ref() else {
            return Err(SourceError::Browser("browser session unavailable".into()));
        };

        let page = session
            .browser
            .new_page("about:blank")
            .await
            .map_err(browser_err)?;

        let text = self.read_page_text(&page).await;
        if let Err(e) = page.close().await {
            tracing::warn!(error = %e, source = "trends", "failed to close trends page");
        }

        let text = text?;
        Ok(extract_trends_line(&text, limit))
    }

    async fn read_page_text(&self, page: &Page) -> Result<String, SourceError> {
        tokio::time::timeout(self.config.navigation_timeout, page.goto(self.config.url.as_str()))
            .await
            .map_err(|_| SourceError::Timeout("trends page navigation"))?
            .map_err(browser_err)?;

        tokio::time::timeout(self.config.selector_timeout, wait_for_body(page))
            .await
            .map_err(|_| SourceError::Timeout("trends page body"))?;

        tokio::time::sleep(self.config.settle_delay).await;

        let value = page
            .evaluate("document.body.innerText")
            .await
            .map_err(browser_err)?;
        let text: String = value.into_value().map_err(|e| SourceError::Parse {
            what: "trends page text",
            reason: e.to_string(),
        })?;
        tracing::debug!(source = "trends", chars = text.len(), "read trends page text");
        Ok(text)
    }

    /// Close the browser if it was launched. Safe to call more than once.
    pub async fn shutdown(&self) {
        let Some(mut session) = self.session.lock().await.take() else {
            return;
        };
        if let Err(e) = session.browser.close().await {
            tracing::warn!(error = %e, source = "trends", "browser close failed");
        }
        if let Err(e) = session.browser.wait().await {
            tracing::warn!(error = %e, source = "trends", "browser wait failed");
        }
        session.handler.abort();
        tracing::info!(source = "trends", "headless browser closed");
    }
}

async fn wait_for_body(page: &Page) {
    while page.find_element("body").await.is_err() {
        tokio::time::sleep(Duration::from_millis(250)).await;
    }
}

#[async_trait]
impl TrendsSource for TrendsScraper {
    async fn fetch_trends_line(&self, limit: usize) -> Option<String> {
        let t0 = Instant::now();
        let out = TrendsScraper::fetch_trends_line(self, limit).await;
        let entries = out
            .as_ref()
            .map(|l| if l.is_empty() { 0 } else { l.split(TRENDS_SEPARATOR).count() });
        record_source_outcome("trends", entries, t0.elapsed().as_secs_f64() * 1_000.0);
        out
    }

    async fn shutdown(&self) {
        TrendsScraper::shutdown(self).await;
    }

    fn name(&self) -> &'static str {
        "trends"
    }
}
