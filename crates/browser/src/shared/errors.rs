use outreach_core::DriverError;

/// Maps a raw chromiumoxide failure onto a driver error category.
pub fn to_driver_error(e: impl std::fmt::Display, action: &str) -> DriverError {
    let s = e.to_string();
    if s.contains("timeout") || s.contains("Timeout") {
        DriverError::timeout_error(format!("{} timed out: {}", action, s))
    } else if s.contains("navigation") || s.contains("Navigation") {
        DriverError::navigation_error(format!("{} navigation failed: {}", action, s))
    } else {
        DriverError::browser_error(format!("{} failed: {}", action, s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use outreach_core::ErrorCategory;

    #[test]
    fn categorizes_by_message() {
        assert_eq!(to_driver_error("Request timeout", "Click").category, ErrorCategory::Timeout);
        assert_eq!(to_driver_error("Navigation aborted", "Goto").category, ErrorCategory::Navigation);

        let other = to_driver_error("channel closed", "InnerText");
        assert_eq!(other.category, ErrorCategory::Browser);
        assert_eq!(other.message, "InnerText failed: channel closed");
    }

    #[test]
    fn raw_failures_never_read_as_missing_elements() {
        assert!(!to_driver_error("node not found", "Click").is_not_found());
    }
}
