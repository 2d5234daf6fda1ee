use outreach_core::{
    ContactRecord, DriverError, EmailOutcome, JobRecord, PageDriver, ProgressSink, Selectors, TimeoutConfig,
    NO_QUALIFICATION_FOUND,
};
use outreach_parser::extract_email;
use serde::Serialize;
use tokio::time::sleep;

/// What happened to one harvested record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum EnrichOutcome {
    Enriched(ContactRecord),
    /// The detail page could not be processed; nothing is exported for it.
    Skipped { job: JobRecord, reason: String },
}

impl EnrichOutcome {
    pub fn contact(&self) -> Option<&ContactRecord> {
        match self {
            EnrichOutcome::Enriched(contact) => Some(contact),
            EnrichOutcome::Skipped { .. } => None,
        }
    }
}

/// The exportable records, in input order.
pub fn contacts(outcomes: &[EnrichOutcome]) -> Vec<ContactRecord> {
    outcomes.iter().filter_map(EnrichOutcome::contact).cloned().collect()
}

pub struct Enricher {
    selectors: Selectors,
    timeouts: TimeoutConfig,
}

impl Enricher {
    pub fn new(selectors: Selectors, timeouts: TimeoutConfig) -> Self {
        Self { selectors, timeouts }
    }

    /// Visits every link in order, producing exactly one outcome per record.
    pub async fn enrich(
        &self,
        page: &dyn PageDriver,
        jobs: &[JobRecord],
        progress: &dyn ProgressSink,
    ) -> Vec<EnrichOutcome> {
        let total = jobs.len();
        let mut outcomes = Vec::with_capacity(total);

        for (idx, job) in jobs.iter().enumerate() {
            let outcome = match self.enrich_one(page, job).await {
                Ok(contact) => EnrichOutcome::Enriched(contact),
                Err(e) => {
                    tracing::error!(link = %job.link, "Error scraping: {}", e);
                    EnrichOutcome::Skipped {
                        job: job.clone(),
                        reason: e.to_string(),
                    }
                }
            };
            outcomes.push(outcome);

            let done = idx + 1;
            progress.advance(
                done,
                Some(total),
                &format!("Progress: {}/{} ({:.1}%)", done, total, done as f64 * 100.0 / total as f64),
            );
        }

        let enriched = outcomes.iter().filter(|o| o.contact().is_some()).count();
        tracing::info!(total, enriched, skipped = total - enriched, "enrichment complete");
        progress.finish(&format!("Enriched {} of {} postings", enriched, total));
        outcomes
    }

    /// Scrapes one detail page. Missing fields fall back to sentinels; only
    /// navigation and unexpected driver failures are errors.
    pub async fn enrich_one(&self, page: &dyn PageDriver, job: &JobRecord) -> Result<ContactRecord, DriverError> {
        page.navigate(&job.link).await?;

        let qualification = match page.inner_text(&self.selectors.qualification).await {
            Ok(text) => text,
            Err(e) if e.is_not_found() => NO_QUALIFICATION_FOUND.to_string(),
            Err(e) => return Err(e),
        };

        self.activate_apply(page, &job.link).await;

        let email = match page.inner_text(&self.selectors.how_to_apply).await {
            Ok(text) => extract_email(&text),
            Err(e) => EmailOutcome::ExtractionError(e.to_string()),
        };

        if let EmailOutcome::ExtractionError(reason) = &email {
            tracing::warn!(link = %job.link, "Error finding email: {}", reason);
        }

        Ok(ContactRecord {
            title: job.title.clone(),
            link: job.link.clone(),
            qualification,
            email,
        })
    }

    /// Best effort: the email block is read whether or not this succeeds.
    async fn activate_apply(&self, page: &dyn PageDriver, link: &str) {
        let selector = &self.selectors.apply_button;
        let result = match page.wait_until_clickable(selector, self.timeouts.apply_wait).await {
            Ok(()) => page.click(selector).await,
            Err(e) => Err(e),
        };

        match result {
            Ok(()) => sleep(self.timeouts.post_apply_delay).await,
            Err(e) => tracing::warn!(link, "Could not click apply button: {}", e),
        }
    }
}
