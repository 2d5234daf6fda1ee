use outreach_core::{DriverError, HarvestConfig, JobRecord, PageDriver, ProgressSink, Selectors, TimeoutConfig};
use outreach_parser::{job_records, parse_listing};
use serde::Serialize;
use tokio::time::sleep;

/// Records collected from one search results page.
#[derive(Debug, Clone, Serialize)]
pub struct Harvest {
    pub records: Vec<JobRecord>,
    pub load_more_clicks: usize,
    /// Pagination stopped at `max_load_more` with the control still present.
    pub hit_ceiling: bool,
}

pub struct Harvester {
    selectors: Selectors,
    timeouts: TimeoutConfig,
    config: HarvestConfig,
}

impl Harvester {
    pub fn new(selectors: Selectors, timeouts: TimeoutConfig, config: HarvestConfig) -> Self {
        Self {
            selectors,
            timeouts,
            config,
        }
    }

    /// Loads `url`, expands the result list and extracts (title, link) pairs.
    pub async fn harvest(
        &self,
        page: &dyn PageDriver,
        url: &str,
        progress: &dyn ProgressSink,
    ) -> Result<Harvest, DriverError> {
        tracing::info!(url, "harvesting search results");
        page.navigate(url).await?;

        let (load_more_clicks, hit_ceiling) = self.expand(page, progress).await?;
        progress.advance(load_more_clicks, None, "Extracting job information...");

        let html = page.content().await?;
        let base = match page.current_url().await {
            Ok(current) => current,
            Err(e) => {
                tracing::debug!("current url unavailable, resolving against input: {}", e);
                url.to_string()
            }
        };

        let cards = parse_listing(&html, &base, &self.selectors)?;
        let records = job_records(&cards, &self.selectors.login_prefix);

        tracing::info!(
            containers = cards.len(),
            records = records.len(),
            load_more_clicks,
            "harvest complete"
        );
        progress.finish(&format!("Total jobs scraped: {}", records.len()));

        Ok(Harvest {
            records,
            load_more_clicks,
            hit_ceiling,
        })
    }

    /// Activates "load more" until it disappears or the ceiling is reached.
    ///
    /// Only a missing control ends the loop normally; any other click failure
    /// aborts the harvest.
    async fn expand(&self, page: &dyn PageDriver, progress: &dyn ProgressSink) -> Result<(usize, bool), DriverError> {
        let mut clicks = 0;
        loop {
            if clicks >= self.config.max_load_more {
                tracing::warn!(
                    max = self.config.max_load_more,
                    "load more control still present at the activation ceiling, stopping"
                );
                return Ok((clicks, true));
            }

            match page.click(&self.selectors.load_more).await {
                Ok(()) => {
                    clicks += 1;
                    progress.advance(clicks, None, &format!("Loaded {} more pages...", clicks));
                    sleep(self.timeouts.load_more_delay).await;
                }
                Err(e) if e.is_not_found() => {
                    tracing::debug!(clicks, "load more control gone");
                    return Ok((clicks, false));
                }
                Err(e) => {
                    tracing::error!(clicks, "load more failed: {}", e);
                    return Err(e);
                }
            }
        }
    }
}
