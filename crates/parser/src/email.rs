use outreach_core::EmailOutcome;
use regex::Regex;
use std::sync::LazyLock;

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::unwrap_used)]
    Regex::new(r"(?i)\b[a-z0-9._%+-]+@[a-z0-9.-]+\.[a-z]{2,}\b").unwrap()
});

/// First email address in `text`, with its original casing.
pub fn first_email(text: &str) -> Option<&str> {
    EMAIL_PATTERN.find(text).map(|m| m.as_str())
}

pub fn extract_email(text: &str) -> EmailOutcome {
    match first_email(text) {
        Some(address) => EmailOutcome::Found(address.to_string()),
        None => EmailOutcome::NotFound,
    }
}
