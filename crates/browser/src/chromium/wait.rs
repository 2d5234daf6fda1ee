use chromiumoxide::page::Page;
use outreach_core::{DriverError, TimeoutConfig};
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::{Duration, Instant};
use tokio::time::sleep;

use crate::shared::{js, to_driver_error};

/// Pause before re-polling a page whose execution context was swapped out.
const CONTEXT_RETRY: Duration = Duration::from_millis(500);
const REQUIRED_STABLE_CHECKS: u32 = 5;

fn is_context_loss(err: &str) -> bool {
    err.contains("Cannot find context") || err.contains("Execution context was destroyed")
}

/// What `CHECK_ELEMENT_STATE` reports about a selector.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub(crate) struct ElementState {
    exists: bool,
    visible: bool,
    obscured: bool,
    disabled: bool,
}

impl ElementState {
    pub(crate) fn from_value(value: Option<&Value>) -> Self {
        value
            .and_then(|v| serde_json::from_value(v.clone()).ok())
            .unwrap_or_default()
    }

    fn ready(&self, check_clickable: bool) -> bool {
        self.exists && self.visible && !self.obscured && !(check_clickable && self.disabled)
    }

    /// A hidden or disabled control counts as absent: a script click on it
    /// would report success without doing anything. Overlap is tolerated
    /// since the click is dispatched to the element directly.
    pub(crate) fn ensure_clickable(&self, selector: &str) -> Result<(), DriverError> {
        if !self.exists {
            return Err(DriverError::element_not_found(selector));
        }
        let reason = if !self.visible {
            "hidden"
        } else if self.disabled {
            "disabled"
        } else {
            return Ok(());
        };

        tracing::debug!(selector, reason, "element present but not clickable");
        Err(DriverError::element_not_found(selector).with_context(json!({ "selector": selector, "state": reason })))
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct LoadState {
    ready_state: String,
    active_requests: u64,
}

pub struct WaitStrategy {
    config: TimeoutConfig,
}

impl WaitStrategy {
    pub fn new(config: TimeoutConfig) -> Self {
        Self { config }
    }

    /// Runs a polling script, treating a swapped execution context as "no
    /// answer yet" rather than an error.
    async fn poll(&self, page: &Page, script: String, action: &str) -> Result<Option<Value>, DriverError> {
        match page.evaluate(script).await {
            Ok(result) => Ok(result.value().cloned()),
            Err(e) if is_context_loss(&e.to_string()) => {
                tracing::debug!(action, "page context changed, retrying");
                sleep(CONTEXT_RETRY).await;
                Ok(None)
            }
            Err(e) => Err(to_driver_error(e, action)),
        }
    }

    /// Polls until `selector` is present, visible and unobscured (and enabled
    /// when `check_clickable` is set).
    ///
    /// An element that never shows up is reported as not found; one that
    /// exists but never becomes usable is a timeout.
    pub async fn wait_for_element(
        &self,
        page: &Page,
        selector: &str,
        timeout: Duration,
        check_clickable: bool,
    ) -> Result<(), DriverError> {
        let start = Instant::now();
        let mut last = ElementState::default();
        let mut seen = false;

        loop {
            let script = js::build_js_call(js::element::CHECK_ELEMENT_STATE, &[json!(selector)]);
            if let Some(value) = self.poll(page, script, "WaitFor").await? {
                let state = ElementState::from_value(Some(&value));
                seen |= state.exists;
                if state != last {
                    tracing::debug!(selector, ?state, "element state changed");
                }
                if state.ready(check_clickable) {
                    return Ok(());
                }
                last = state;
            }

            if start.elapsed() > timeout {
                let context = json!({
                    "selector": selector,
                    "timeout_ms": timeout.as_millis() as u64,
                    "state": format!("{:?}", last),
                });
                return Err(if seen {
                    DriverError::timeout_error(format!(
                        "Element '{}' not actionable after {}ms",
                        selector,
                        timeout.as_millis()
                    ))
                    .with_context(context)
                } else {
                    DriverError::element_not_found(selector).with_context(context)
                });
            }

            sleep(self.config.check_interval).await;
        }
    }

    /// Waits for `readyState == complete` with no in-flight requests over a
    /// few consecutive checks. Gives up with a warning after `timeout`.
    pub async fn wait_for_stable(&self, page: &Page, timeout: Duration) -> Result<(), DriverError> {
        let start = Instant::now();
        let mut stable_checks = 0;

        loop {
            let script = js::build_js_call(js::wait::CHECK_LOADING, &[]);
            let state: Option<LoadState> = self
                .poll(page, script, "WaitForStable")
                .await?
                .and_then(|v| serde_json::from_value(v).ok());

            match state {
                Some(s) if s.ready_state == "complete" && s.active_requests == 0 => stable_checks += 1,
                _ => stable_checks = 0,
            }

            if stable_checks >= REQUIRED_STABLE_CHECKS {
                tracing::debug!(elapsed_ms = start.elapsed().as_millis() as u64, "page stabilized");
                sleep(self.config.settle_delay).await;
                return Ok(());
            }

            if start.elapsed() > timeout {
                tracing::warn!("page stabilization timed out, continuing anyway");
                return Ok(());
            }

            sleep(self.config.check_interval).await;
        }
    }
}
