use indicatif::{ProgressBar, ProgressStyle};
use outreach_core::ProgressSink;
use std::time::Duration;

/// Terminal progress: a spinner until the total is known, then a bar.
pub struct BarProgress {
    bar: ProgressBar,
}

impl BarProgress {
    pub fn new(message: &str) -> Self {
        let bar = ProgressBar::new_spinner();
        bar.set_style(style("{spinner:.green} {msg}"));
        bar.set_message(message.to_string());
        bar.enable_steady_tick(Duration::from_millis(100));
        Self { bar }
    }

    pub fn clear(&self) {
        self.bar.finish_and_clear();
    }
}

fn style(template: &str) -> ProgressStyle {
    ProgressStyle::default_bar()
        .template(template)
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
}

impl ProgressSink for BarProgress {
    fn advance(&self, done: usize, total: Option<usize>, message: &str) {
        if let Some(total) = total {
            if self.bar.length() != Some(total as u64) {
                self.bar.set_length(total as u64);
                self.bar.set_style(style("{bar:40.cyan/blue} {pos}/{len} {msg}"));
            }
            self.bar.set_position(done as u64);
        }
        self.bar.set_message(message.to_string());
    }

    fn finish(&self, message: &str) {
        self.bar.finish_with_message(message.to_string());
    }
}
