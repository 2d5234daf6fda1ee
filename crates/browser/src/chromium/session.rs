use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig as ChromeConfig, HeadlessMode};
use chromiumoxide::page::Page;
use futures::StreamExt;
use outreach_core::{DriverError, PageDriver, TimeoutConfig};
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use super::wait::{ElementState, WaitStrategy};
use crate::shared::{js, to_driver_error, LaunchConfig};

/// One Chromium process with a single tab, used for the length of a stage.
///
/// Call [`ChromiumSession::close`] when the stage ends; dropping the session
/// without closing only kills the child process.
pub struct ChromiumSession {
    browser: Mutex<Browser>,
    handler: JoinHandle<()>,
    page: Page,
    profile_dir: PathBuf,
    timeouts: TimeoutConfig,
    wait_strategy: WaitStrategy,
}

impl ChromiumSession {
    pub async fn launch(config: LaunchConfig, timeouts: TimeoutConfig) -> Result<Self, DriverError> {
        // Unique profile per instance to avoid SingletonLock conflicts
        let profile_dir = std::env::temp_dir().join(format!("chromium-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&profile_dir)
            .map_err(|e| DriverError::browser_error(format!("Failed to create temp dir: {}", e)))?;

        let (browser, handler, page) = match start(&config, &profile_dir).await {
            Ok(started) => started,
            Err(e) => {
                discard_profile(&profile_dir).await;
                return Err(e);
            }
        };

        tracing::info!(headless = config.headless, "browser launched");

        Ok(Self {
            browser: Mutex::new(browser),
            handler,
            page,
            profile_dir,
            wait_strategy: WaitStrategy::new(timeouts.clone()),
            timeouts,
        })
    }

    /// Shuts the browser down and waits for the process and event loop to exit.
    pub async fn close(self) {
        let mut browser = self.browser.into_inner();
        if let Err(e) = browser.close().await {
            tracing::warn!("browser close failed: {}", e);
        }
        if let Err(e) = browser.wait().await {
            tracing::warn!("waiting for browser exit failed: {}", e);
        }
        drop(browser);
        if let Err(e) = self.handler.await {
            tracing::debug!("browser handler ended abnormally: {}", e);
        }
        discard_profile(&self.profile_dir).await;
        tracing::info!("browser closed");
    }

    async fn call(&self, func: &str, args: &[Value], action: &str) -> Result<Value, DriverError> {
        let result = self.page.evaluate(js::build_js_call(func, args)).await
            .map_err(|e| to_driver_error(e, action))?;
        Ok(result.value().cloned().unwrap_or(Value::Null))
    }
}

async fn start(config: &LaunchConfig, profile_dir: &Path) -> Result<(Browser, JoinHandle<()>, Page), DriverError> {
    let mut builder = ChromeConfig::builder()
        .headless_mode(if config.headless { HeadlessMode::True } else { HeadlessMode::False })
        .user_data_dir(profile_dir);

    if let (Some(w), Some(h)) = (config.viewport_width, config.viewport_height) {
        builder = builder.window_size(w, h);
    }
    if config.no_sandbox {
        builder = builder.no_sandbox();
    }

    let chrome_cfg = builder.build()
        .map_err(|e| DriverError::browser_error(format!("Config failed: {}", e)))?;

    let (browser, mut handler) = Browser::launch(chrome_cfg).await
        .map_err(|e| DriverError::browser_error(format!("Launch failed: {}", e)))?;

    let handler = tokio::spawn(async move { while handler.next().await.is_some() {} });

    match browser.new_page("about:blank").await {
        Ok(page) => Ok((browser, handler, page)),
        Err(e) => {
            handler.abort();
            Err(DriverError::browser_error(format!("New page failed: {}", e)))
        }
    }
}

async fn discard_profile(dir: &Path) {
    if let Err(e) = tokio::fs::remove_dir_all(dir).await {
        tracing::debug!(dir = %dir.display(), "profile cleanup failed: {}", e);
    }
}

fn clicked(result: &Value) -> bool {
    result.get("success").and_then(|v| v.as_bool()) == Some(true)
}

#[async_trait]
impl PageDriver for ChromiumSession {
    async fn navigate(&self, url: &str) -> Result<(), DriverError> {
        tracing::debug!(url, "navigating");
        tokio::time::timeout(self.timeouts.navigation, self.page.goto(url))
            .await
            .map_err(|_| DriverError::timeout_error(format!("Navigation to {} timed out", url)))?
            .map_err(|e| DriverError::navigation_error(format!("Navigation failed: {}", e))
                .with_context(json!({ "url": url })))?;

        self.wait_strategy.wait_for_stable(&self.page, self.timeouts.page_stable).await
    }

    async fn click(&self, selector: &str) -> Result<(), DriverError> {
        let state = self.call(js::element::CHECK_ELEMENT_STATE, &[json!(selector)], "Click").await?;
        ElementState::from_value(Some(&state)).ensure_clickable(selector)?;

        self.call(js::element::SCROLL_INTO_VIEW, &[json!(selector), json!("center")], "Scroll").await?;
        let result = self.call(js::element::SAFE_CLICK, &[json!(selector)], "Click").await?;
        if clicked(&result) {
            Ok(())
        } else {
            Err(DriverError::element_not_found(selector))
        }
    }

    async fn wait_until_clickable(&self, selector: &str, timeout: Duration) -> Result<(), DriverError> {
        self.wait_strategy.wait_for_element(&self.page, selector, timeout, true).await
    }

    async fn inner_text(&self, selector: &str) -> Result<String, DriverError> {
        match self.call(js::element::INNER_TEXT, &[json!(selector)], "InnerText").await? {
            Value::String(text) => Ok(text.trim().to_string()),
            Value::Null => Err(DriverError::element_not_found(selector)),
            other => Err(DriverError::script_error(format!("Unexpected innerText result: {}", other))),
        }
    }

    async fn content(&self) -> Result<String, DriverError> {
        self.page.content().await.map_err(|e| to_driver_error(e, "Content"))
    }

    async fn current_url(&self) -> Result<String, DriverError> {
        self.page.url().await
            .map_err(|e| to_driver_error(e, "Url"))?
            .ok_or_else(|| DriverError::browser_error("Page has no URL"))
    }
}
