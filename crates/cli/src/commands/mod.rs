mod enrich;
mod harvest;
mod send;
mod show;

pub use enrich::enrich;
pub use harvest::harvest;
pub use send::{send, SendArgs, TemplateArgs};
pub use show::show;

use anyhow::{Context, Result};
use outreach_browser::{ChromiumSession, LaunchConfig};
use outreach_core::TimeoutConfig;

async fn launch_browser(headful: bool, timeouts: TimeoutConfig) -> Result<ChromiumSession> {
    let config = if headful {
        LaunchConfig::default().headful()
    } else {
        LaunchConfig::default()
    };
    ChromiumSession::launch(config, timeouts)
        .await
        .context("could not start Chromium")
}
