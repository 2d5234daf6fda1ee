//! Chromium-backed [`PageDriver`](outreach_core::PageDriver).

mod chromium;
mod shared;

pub use chromium::{ChromiumSession, WaitStrategy};
pub use shared::{to_driver_error, LaunchConfig};
