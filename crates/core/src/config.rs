use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct TimeoutConfig {
    pub navigation: Duration,
    pub page_stable: Duration,
    pub check_interval: Duration,
    pub settle_delay: Duration,
    /// Pause after each "load more" activation while results render.
    pub load_more_delay: Duration,
    /// How long the apply control may take to become clickable.
    pub apply_wait: Duration,
    pub post_apply_delay: Duration,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            navigation: Duration::from_millis(30000),
            page_stable: Duration::from_millis(30000),
            check_interval: Duration::from_millis(300),
            settle_delay: Duration::from_millis(1000),
            load_more_delay: Duration::from_millis(3000),
            apply_wait: Duration::from_millis(10000),
            post_apply_delay: Duration::from_millis(2000),
        }
    }
}

impl TimeoutConfig {
    pub fn with_navigation(mut self, ms: u64) -> Self {
        self.navigation = Duration::from_millis(ms);
        self
    }

    pub fn with_load_more_delay(mut self, ms: u64) -> Self {
        self.load_more_delay = Duration::from_millis(ms);
        self
    }

    pub fn with_apply_wait(mut self, ms: u64) -> Self {
        self.apply_wait = Duration::from_millis(ms);
        self
    }

    /// No pauses at all; for driving in-memory pages.
    pub fn immediate() -> Self {
        Self {
            navigation: Duration::ZERO,
            page_stable: Duration::ZERO,
            check_interval: Duration::ZERO,
            settle_delay: Duration::ZERO,
            load_more_delay: Duration::ZERO,
            apply_wait: Duration::ZERO,
            post_apply_delay: Duration::ZERO,
        }
    }
}

/// CSS selectors for the job board markup. Defaults target jobbank.gc.ca.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Selectors {
    pub load_more: String,
    pub listing_item: String,
    pub listing_title: String,
    pub listing_link: String,
    pub qualification: String,
    pub apply_button: String,
    pub how_to_apply: String,
    /// Links containing this prefix redirect to the sign-in page and are dropped.
    pub login_prefix: String,
}

impl Default for Selectors {
    fn default() -> Self {
        Self {
            load_more: "#morepage button".to_string(),
            listing_item: "article".to_string(),
            listing_title: ".noctitle".to_string(),
            listing_link: "a".to_string(),
            qualification: "p[property='qualification']".to_string(),
            apply_button: "#applynowbutton".to_string(),
            how_to_apply: "#howtoapply".to_string(),
            login_prefix: "https://www.jobbank.gc.ca/login".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct HarvestConfig {
    /// Upper bound on "load more" activations for pages that never drop the control.
    pub max_load_more: usize,
}

impl Default for HarvestConfig {
    fn default() -> Self {
        Self { max_load_more: 500 }
    }
}
