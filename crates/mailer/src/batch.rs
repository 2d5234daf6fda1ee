use lettre::message::Mailbox;
use outreach_core::{EmailOutcome, ProgressSink};
use outreach_storage::records::{self, EMAIL, QUALIFICATION};
use outreach_storage::Table;
use serde::Serialize;
use std::time::Duration;
use tokio::time::sleep;

use crate::error::Result;
use crate::message::{compose, mailbox};
use crate::template::{QualificationRouter, TemplateSet};
use crate::transport::MailTransport;

#[derive(Debug, Clone)]
pub struct MailerConfig {
    /// Contacts attempted per run; the rest are returned untouched.
    pub batch_size: usize,
    /// Pause after every delivery attempt.
    pub send_interval: Duration,
}

impl Default for MailerConfig {
    fn default() -> Self {
        Self {
            batch_size: 100,
            send_interval: Duration::from_millis(500),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "reason", rename_all = "snake_case")]
pub enum SendOutcome {
    Sent,
    Failed(String),
    Skipped(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SendResult {
    pub email: String,
    pub qualification: String,
    pub outcome: SendOutcome,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub results: Vec<SendResult>,
    /// Rows after the batch, in file order with every column.
    #[serde(skip)]
    pub remaining: Table,
}

impl BatchReport {
    fn count(&self, f: impl Fn(&SendOutcome) -> bool) -> usize {
        self.results.iter().filter(|r| f(&r.outcome)).count()
    }

    pub fn sent(&self) -> usize {
        self.count(|o| matches!(o, SendOutcome::Sent))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, SendOutcome::Failed(_)))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, SendOutcome::Skipped(_)))
    }
}

pub struct Mailer {
    templates: TemplateSet,
    router: QualificationRouter,
    sender: Mailbox,
    config: MailerConfig,
}

impl Mailer {
    pub fn new(templates: TemplateSet, router: QualificationRouter, sender: &str, config: MailerConfig) -> Result<Self> {
        Ok(Self {
            templates,
            router,
            sender: mailbox(sender)?,
            config,
        })
    }

    /// Sends to the leading `batch_size` contacts and hands back the rest.
    ///
    /// Column validation happens before anything is sent. Per-contact
    /// problems are recorded in the report and never stop the batch.
    pub async fn send_batch(
        &self,
        contacts: Table,
        transport: &dyn MailTransport,
        progress: &dyn ProgressSink,
    ) -> Result<BatchReport> {
        contacts.require_columns(&[QUALIFICATION, EMAIL])?;

        let (batch, remaining) = contacts.split_at(self.config.batch_size);
        let batch = records::contact_records(&batch)?;
        let total = batch.len();
        tracing::info!(batch = total, remaining = remaining.len(), "sending batch");

        let mut results = Vec::with_capacity(total);
        for (idx, contact) in batch.iter().enumerate() {
            let outcome = self.send_one(&contact.qualification, &contact.email, transport).await;
            results.push(SendResult {
                email: contact.email.to_cell(),
                qualification: contact.qualification.clone(),
                outcome,
            });
            progress.advance(idx + 1, Some(total), &format!("Emails processed: {}/{}", idx + 1, total));
        }

        let report = BatchReport { results, remaining };
        tracing::info!(
            sent = report.sent(),
            failed = report.failed(),
            skipped = report.skipped(),
            remaining = report.remaining.len(),
            "batch complete"
        );
        progress.finish(&format!("Sent {} of {} emails", report.sent(), total));
        Ok(report)
    }

    async fn send_one(&self, qualification: &str, email: &EmailOutcome, transport: &dyn MailTransport) -> SendOutcome {
        let Some(bucket) = self.router.route(qualification) else {
            tracing::warn!(qualification, email = %email.to_cell(), "No template for qualification, skipping");
            return SendOutcome::Skipped(format!("Unknown qualification: {}", qualification.trim()));
        };

        let Some(address) = email.address() else {
            tracing::warn!(qualification, email = %email.to_cell(), "No address to send to, skipping");
            return SendOutcome::Skipped(format!("No address: {}", email.to_cell()));
        };

        let message = match compose(&self.sender, address, self.templates.get(bucket)) {
            Ok(message) => message,
            Err(e) => {
                tracing::warn!(email = address, "Failed to send email: {}", e);
                return SendOutcome::Failed(e.to_string());
            }
        };

        let outcome = match transport.deliver(message).await {
            Ok(()) => {
                tracing::info!(email = address, ?bucket, "Email sent");
                SendOutcome::Sent
            }
            Err(e) => {
                tracing::warn!(email = address, "Failed to send email: {}", e);
                SendOutcome::Failed(e.to_string())
            }
        };

        sleep(self.config.send_interval).await;
        outcome
    }
}
