use std::path::Path;

use anyhow::Result;
use console::style;
use outreach_core::{Selectors, TimeoutConfig};
use outreach_parser::HttpPage;
use outreach_pipeline::{contacts, EnrichOutcome, Enricher};
use outreach_storage::{read_table, records, write_table};

use super::launch_browser;
use crate::cli::Driver;
use crate::progress::BarProgress;

pub async fn enrich(input: &Path, output: &Path, timeouts: TimeoutConfig, driver: Driver, headful: bool) -> Result<()> {
    let jobs = records::job_records(&read_table(input)?)?;
    println!("{} {} postings", style("Enriching").bold(), style(jobs.len()).cyan());

    let enricher = Enricher::new(Selectors::default(), timeouts.clone());
    let progress = BarProgress::new("Starting...");

    let outcomes = match driver {
        Driver::Chromium => {
            let session = match launch_browser(headful, timeouts).await {
                Ok(session) => session,
                Err(e) => {
                    progress.clear();
                    return Err(e);
                }
            };
            let outcomes = enricher.enrich(&session, &jobs, &progress).await;
            session.close().await;
            outcomes
        }
        Driver::Http => enricher.enrich(&HttpPage::new(), &jobs, &progress).await,
    };

    let exported = contacts(&outcomes);
    write_table(output, &records::contact_table(&exported))?;

    let with_email = exported.iter().filter(|c| c.email.address().is_some()).count();
    tracing::info!(
        enriched = exported.len(),
        with_email,
        output = %output.display(),
        "contacts saved"
    );
    println!("  Enriched: {}", style(exported.len()).green());
    println!("  With email: {}", with_email);

    let skipped: Vec<_> = outcomes
        .iter()
        .filter_map(|o| match o {
            EnrichOutcome::Skipped { job, reason } => Some((job, reason)),
            EnrichOutcome::Enriched(_) => None,
        })
        .collect();
    if !skipped.is_empty() {
        println!("  Skipped: {}", style(skipped.len()).yellow().bold());
        for (job, reason) in skipped {
            println!("    {} ({})", job.link, reason);
        }
    }

    println!("{} {}", style("Saved to:").green().bold(), output.display());
    Ok(())
}
