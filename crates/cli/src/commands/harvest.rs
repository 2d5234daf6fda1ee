use std::path::Path;

use anyhow::{Context, Result};
use console::style;
use outreach_core::{HarvestConfig, Selectors, TimeoutConfig};
use outreach_pipeline::Harvester;
use outreach_storage::{records, write_table};

use super::launch_browser;
use crate::progress::BarProgress;

pub async fn harvest(url: &str, output: &Path, max_load_more: usize, timeouts: TimeoutConfig, headful: bool) -> Result<()> {
    println!("{} {}", style("Harvesting").bold(), style(url).cyan());

    let harvester = Harvester::new(Selectors::default(), timeouts.clone(), HarvestConfig { max_load_more });

    let progress = BarProgress::new("Starting browser...");
    let session = match launch_browser(headful, timeouts).await {
        Ok(session) => session,
        Err(e) => {
            progress.clear();
            return Err(e);
        }
    };

    let result = harvester.harvest(&session, url, &progress).await;
    session.close().await;

    let harvest = match result {
        Ok(harvest) => harvest,
        Err(e) => {
            progress.clear();
            return Err(e).context("harvest failed");
        }
    };

    write_table(output, &records::job_table(&harvest.records))?;

    println!("  Jobs: {}", style(harvest.records.len()).green());
    println!("  Load more clicks: {}", harvest.load_more_clicks);
    tracing::info!(records = harvest.records.len(), output = %output.display(), "job links saved");
    if harvest.hit_ceiling {
        tracing::warn!(max_load_more, url, "harvest stopped at the load more ceiling");
        println!(
            "  {} stopped at --max-load-more {}, results may be incomplete",
            style("Warning:").yellow().bold(),
            max_load_more
        );
    }
    println!("{} {}", style("Saved to:").green().bold(), output.display());
    Ok(())
}
