//! Browser session lifecycle: one browser, one CDP event loop, one page.

use crate::config::Config;
use crate::core::selectors::Cascade;
use crate::errors::{AppError, AppResult};
use chromiumoxide::cdp::browser_protocol::page::CaptureScreenshotFormat;
use chromiumoxide::element::Element;
use chromiumoxide::page::ScreenshotParams;
use chromiumoxide::{Browser, BrowserConfig, Page};
use futures_util::StreamExt;
use std::path::Path;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

pub struct Session {
    browser: Browser,
    page: Page,
    handler: JoinHandle<()>,
    op_timeout: Duration,
    settle: Duration,
    nav_retries: u32,
}

impl Session {
    /// Launch the browser (headless unless `headful`) and open a blank page.
    pub async fn launch(cfg: &Config, headful: bool) -> AppResult<Self> {
        let mut builder = BrowserConfig::builder()
            .viewport(None)
            .request_timeout(Duration::from_secs(cfg.nav_timeout_secs));
        if headful {
            builder = builder.with_head();
        }
        let browser_config = builder.build().map_err(AppError::Launch)?;

        let (browser, mut handler) = Browser::launch(browser_config).await?;

        // The event loop must be pumped for the browser to function at all.
        let handler = tokio::spawn(async move {
            while let Some(_event) = handler.next().await {}
        });

        let page = browser.new_page("about:blank").await?;
        debug!("browser launched (headful={headful})");

        Ok(Self {
            browser,
            page,
            handler,
            op_timeout: Duration::from_secs(cfg.op_timeout_secs),
            settle: Duration::from_millis(cfg.settle_ms),
            nav_retries: cfg.nav_retries,
        })
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    pub fn op_timeout(&self) -> Duration {
        self.op_timeout
    }

    /// Navigate, retrying a fixed number of times before giving up.
    pub async fn goto(&self, url: &str) -> AppResult<()> {
        let mut last_error = String::new();
        for attempt in 1..=self.nav_retries {
            match self.page.goto(url).await {
                Ok(_) => {
                    debug!("navigated to {url} (attempt {attempt})");
                    self.page.wait_for_navigation().await.ok();
                    return Ok(());
                }
                Err(e) => {
                    warn!("navigation to {url} failed (attempt {attempt}): {e}");
                    last_error = e.to_string();
                    tokio::time::sleep(Duration::from_millis(500)).await;
                }
            }
        }
        Err(AppError::Navigation {
            url: url.to_string(),
            attempts: self.nav_retries,
            last_error,
        })
    }

    /// Try every selector of the cascade once, in order.
    pub async fn find_first(&self, cascade: &Cascade) -> AppResult<(Element, &'static str)> {
        for sel in cascade.selectors {
            if let Ok(el) = self.page.find_element(*sel).await {
                return Ok((el, *sel));
            }
        }
        Err(cascade.not_found())
    }

    /// Like find_first, but keeps polling under the op timeout. Used where the
    /// element is expected to appear (login form after navigation, popover
    /// after a toggle click).
    pub async fn wait_for(&self, cascade: &Cascade) -> AppResult<(Element, &'static str)> {
        super::wait::wait_until(cascade.what, self.op_timeout, || async move {
            self.find_first(cascade).await.ok()
        })
        .await
    }

    /// Post-action settle delay, only where the vendor UI gives nothing to poll.
    pub async fn settle(&self) {
        tokio::time::sleep(self.settle).await;
    }

    pub async fn current_url(&self) -> AppResult<Option<String>> {
        Ok(self.page.url().await?)
    }

    /// Click the first button/link whose visible text contains one of the
    /// needles (case-insensitive). Returns false when nothing matched.
    pub async fn click_by_text(&self, needles: &[&str]) -> AppResult<bool> {
        let needles_json = serde_json::to_string(needles)
            .map_err(|e| AppError::Other(format!("needle encoding: {e}")))?;
        let script = format!(
            r#"(() => {{
                const needles = {needles_json}.map(n => n.toLowerCase());
                const els = Array.from(document.querySelectorAll("button, a, [role='button']"));
                for (const el of els) {{
                    const text = (el.innerText || el.textContent || '').trim().toLowerCase();
                    if (text && needles.some(n => text === n || text.includes(n))) {{
                        el.click();
                        return true;
                    }}
                }}
                return false;
            }})()"#
        );
        self.page
            .evaluate(script)
            .await?
            .into_value::<bool>()
            .map_err(|e| AppError::Other(format!("failed to decode page result: {e}")))
    }

    pub async fn screenshot(&self, path: &Path) -> AppResult<()> {
        let png = self
            .page
            .screenshot(
                ScreenshotParams::builder()
                    .format(CaptureScreenshotFormat::Png)
                    .full_page(true)
                    .build(),
            )
            .await?;
        std::fs::write(path, png)?;
        Ok(())
    }

    /// Tear down page and browser. Dropping the browser closes the CDP
    /// connection; the handler task is aborted afterwards.
    pub async fn close(self) {
        let Session {
            browser,
            page,
            handler,
            ..
        } = self;
        if let Err(e) = page.close().await {
            debug!("page close: {e}");
        }
        drop(browser);
        handler.abort();
    }
}
