use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

mod config;

pub use config::{HarvestConfig, Selectors, TimeoutConfig};

/// Table sentinel for a posting whose how-to-apply block holds no address.
pub const NO_EMAIL_FOUND: &str = "No email found";

/// Table sentinel for a posting without a qualification element.
pub const NO_QUALIFICATION_FOUND: &str = "No qualification found";

const EXTRACTION_ERROR_PREFIX: &str = "Error finding email: ";

/// A (title, link) pair harvested from a search results page.
///
/// Titles repeat across containers and links are not deduplicated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobRecord {
    pub title: String,
    pub link: String,
}

impl JobRecord {
    pub fn new(title: impl Into<String>, link: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            link: link.into(),
        }
    }
}

/// Result of looking for an email address on a detail page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum EmailOutcome {
    Found(String),
    NotFound,
    ExtractionError(String),
}

impl EmailOutcome {
    pub fn address(&self) -> Option<&str> {
        match self {
            EmailOutcome::Found(address) => Some(address),
            _ => None,
        }
    }

    /// Renders the outcome the way it is stored in an exported table.
    pub fn to_cell(&self) -> String {
        match self {
            EmailOutcome::Found(address) => address.clone(),
            EmailOutcome::NotFound => NO_EMAIL_FOUND.to_string(),
            EmailOutcome::ExtractionError(reason) => format!("{}{}", EXTRACTION_ERROR_PREFIX, reason),
        }
    }

    /// Reads a table cell back into an outcome.
    ///
    /// A cell holding a single whitespace-free token with one `@` is treated
    /// as an address; the sentinels map back to their variants and anything
    /// else is kept as an extraction error.
    pub fn from_cell(cell: &str) -> Self {
        let cell = cell.trim();
        if cell.is_empty() || cell == NO_EMAIL_FOUND {
            return EmailOutcome::NotFound;
        }
        if let Some(reason) = cell.strip_prefix(EXTRACTION_ERROR_PREFIX) {
            return EmailOutcome::ExtractionError(reason.to_string());
        }

        let looks_like_address = !cell.chars().any(char::is_whitespace)
            && cell.matches('@').count() == 1
            && !cell.starts_with('@')
            && !cell.ends_with('@');

        if looks_like_address {
            EmailOutcome::Found(cell.to_string())
        } else {
            EmailOutcome::ExtractionError(cell.to_string())
        }
    }
}

/// A harvested posting enriched with its qualification and contact address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactRecord {
    pub title: String,
    pub link: String,
    pub qualification: String,
    pub email: EmailOutcome,
}

/// Error categories for telling normal absence apart from real failures
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Element not found or selector issues
    ElementNotFound,
    /// JavaScript execution errors
    ScriptExecution,
    /// Navigation or page load errors
    Navigation,
    /// Browser/driver errors
    Browser,
    /// Parsing errors (HTML, URLs)
    Parsing,
    /// Timeout errors
    Timeout,
}

/// Structured error raised by a [`PageDriver`].
#[derive(Debug, Clone, Serialize, Deserialize, thiserror::Error)]
#[error("[{category:?}] {message}")]
pub struct DriverError {
    /// Error category for programmatic handling
    pub category: ErrorCategory,
    /// Human-readable error message
    pub message: String,
    /// Optional context (URL, selector, timeout, etc.)
    pub context: serde_json::Value,
}

impl DriverError {
    pub fn new(category: ErrorCategory, message: impl Into<String>) -> Self {
        Self {
            category,
            message: message.into(),
            context: serde_json::json!({}),
        }
    }

    pub fn with_context(mut self, context: serde_json::Value) -> Self {
        self.context = context;
        self
    }

    pub fn is_not_found(&self) -> bool {
        self.category == ErrorCategory::ElementNotFound
    }

    pub fn element_not_found(selector: impl Into<String>) -> Self {
        let selector = selector.into();
        Self::new(ErrorCategory::ElementNotFound, format!("Element not found: {}", selector))
            .with_context(serde_json::json!({ "selector": selector }))
    }

    pub fn timeout_error(message: impl Into<String>) -> Self {
        Self::new(ErrorCategory::Timeout, message)
    }

    pub fn script_error(message: impl Into<String>) -> Self {
        Self::new(ErrorCategory::ScriptExecution, message)
    }

    pub fn navigation_error(message: impl Into<String>) -> Self {
        Self::new(ErrorCategory::Navigation, message)
    }

    pub fn browser_error(message: impl Into<String>) -> Self {
        Self::new(ErrorCategory::Browser, message)
    }

    pub fn parsing_error(message: impl Into<String>) -> Self {
        Self::new(ErrorCategory::Parsing, message)
    }
}

/// A single browser page the pipeline stages drive.
///
/// Implementations must report a missing element as
/// [`ErrorCategory::ElementNotFound`] and reserve every other category for
/// operational failures; the harvester relies on that split to end
/// pagination.
#[async_trait]
pub trait PageDriver: Send + Sync {
    async fn navigate(&self, url: &str) -> Result<(), DriverError>;

    /// Clicks the first element matching `selector`.
    async fn click(&self, selector: &str) -> Result<(), DriverError>;

    async fn wait_until_clickable(&self, selector: &str, timeout: Duration) -> Result<(), DriverError>;

    /// Rendered text of the first element matching `selector`.
    async fn inner_text(&self, selector: &str) -> Result<String, DriverError>;

    /// Serialized DOM of the current document.
    async fn content(&self) -> Result<String, DriverError>;

    async fn current_url(&self) -> Result<String, DriverError>;
}

/// Receives status updates between blocking pipeline steps.
pub trait ProgressSink: Send + Sync {
    /// `total` is `None` while the amount of work is unknown (pagination).
    fn advance(&self, done: usize, total: Option<usize>, message: &str);

    fn finish(&self, _message: &str) {}
}

/// Progress sink that drops every update.
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn advance(&self, _done: usize, _total: Option<usize>, _message: &str) {}
}
