#![allow(dead_code)]

use async_trait::async_trait;
use outreach_core::{DriverError, PageDriver, ProgressSink, Selectors};
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

/// A scripted page served by [`FakePage`].
#[derive(Debug, Clone, Default)]
pub struct FakeDocument {
    pub html: String,
    /// Inner text per selector; absent selectors are "not found".
    pub texts: HashMap<String, Result<String, DriverError>>,
    /// How many times "load more" can be activated before it disappears.
    pub load_more: usize,
    /// Returned by the click after the available activations, instead of "not found".
    pub load_more_failure: Option<DriverError>,
    pub apply_clickable: bool,
}

impl FakeDocument {
    pub fn html(html: impl Into<String>) -> Self {
        Self {
            html: html.into(),
            ..Self::default()
        }
    }

    pub fn text(mut self, selector: &str, text: &str) -> Self {
        self.texts.insert(selector.to_string(), Ok(text.to_string()));
        self
    }

    pub fn text_error(mut self, selector: &str, err: DriverError) -> Self {
        self.texts.insert(selector.to_string(), Err(err));
        self
    }
}

#[derive(Debug, Default)]
struct State {
    current: Option<String>,
    remaining_load_more: usize,
    load_more_clicks: usize,
    apply_clicks: usize,
    visited: Vec<String>,
}

/// In-memory [`PageDriver`] keyed by URL.
#[derive(Debug, Default)]
pub struct FakePage {
    selectors: Selectors,
    documents: HashMap<String, FakeDocument>,
    state: Mutex<State>,
}

impl FakePage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, url: &str, document: FakeDocument) -> Self {
        self.documents.insert(url.to_string(), document);
        self
    }

    pub fn load_more_clicks(&self) -> usize {
        self.state.lock().unwrap().load_more_clicks
    }

    pub fn apply_clicks(&self) -> usize {
        self.state.lock().unwrap().apply_clicks
    }

    pub fn visited(&self) -> Vec<String> {
        self.state.lock().unwrap().visited.clone()
    }

    fn document(&self) -> Result<FakeDocument, DriverError> {
        let state = self.state.lock().unwrap();
        state
            .current
            .as_ref()
            .and_then(|url| self.documents.get(url))
            .cloned()
            .ok_or_else(|| DriverError::browser_error("No page loaded"))
    }
}

#[async_trait]
impl PageDriver for FakePage {
    async fn navigate(&self, url: &str) -> Result<(), DriverError> {
        let mut state = self.state.lock().unwrap();
        state.visited.push(url.to_string());
        match self.documents.get(url) {
            Some(doc) => {
                state.current = Some(url.to_string());
                state.remaining_load_more = doc.load_more;
                Ok(())
            }
            None => Err(DriverError::navigation_error(format!("Navigation failed: {} unreachable", url))),
        }
    }

    async fn click(&self, selector: &str) -> Result<(), DriverError> {
        let doc = self.document()?;
        let mut state = self.state.lock().unwrap();

        if selector == self.selectors.load_more {
            if state.remaining_load_more > 0 {
                state.remaining_load_more -= 1;
                state.load_more_clicks += 1;
                return Ok(());
            }
            return Err(doc
                .load_more_failure
                .unwrap_or_else(|| DriverError::element_not_found(selector)));
        }

        if selector == self.selectors.apply_button && doc.apply_clickable {
            state.apply_clicks += 1;
            return Ok(());
        }

        Err(DriverError::element_not_found(selector))
    }

    async fn wait_until_clickable(&self, selector: &str, timeout: Duration) -> Result<(), DriverError> {
        let doc = self.document()?;
        if selector == self.selectors.apply_button && doc.apply_clickable {
            Ok(())
        } else {
            Err(DriverError::timeout_error(format!(
                "Element '{}' not actionable after {}ms",
                selector,
                timeout.as_millis()
            )))
        }
    }

    async fn inner_text(&self, selector: &str) -> Result<String, DriverError> {
        let doc = self.document()?;
        doc.texts
            .get(selector)
            .cloned()
            .unwrap_or_else(|| Err(DriverError::element_not_found(selector)))
    }

    async fn content(&self) -> Result<String, DriverError> {
        Ok(self.document()?.html)
    }

    async fn current_url(&self) -> Result<String, DriverError> {
        self.state
            .lock()
            .unwrap()
            .current
            .clone()
            .ok_or_else(|| DriverError::browser_error("No page loaded"))
    }
}

/// Records every progress update.
#[derive(Debug, Default)]
pub struct RecordingProgress {
    pub updates: Mutex<Vec<(usize, Option<usize>, String)>>,
}

impl ProgressSink for RecordingProgress {
    fn advance(&self, done: usize, total: Option<usize>, message: &str) {
        self.updates.lock().unwrap().push((done, total, message.to_string()));
    }
}
