use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use console::style;
use outreach_mailer::{
    Attachment, EmailTemplate, Mailer, MailerConfig, QualificationRouter, RouteRule, SendOutcome, SmtpMailer,
    SmtpSettings, TemplateSet,
};
use outreach_storage::records::{EMAIL, QUALIFICATION};
use outreach_storage::{read_table, to_report, write_table, JsonFileStorage, ReportStorage};
use secrecy::SecretString;

use crate::progress::BarProgress;

const PASSWORD_VAR: &str = "OUTREACH_SMTP_PASSWORD";

pub struct TemplateArgs {
    pub subject: String,
    pub body_file: PathBuf,
    pub attachment: Option<PathBuf>,
}

impl TemplateArgs {
    async fn load(self) -> Result<EmailTemplate> {
        let body = tokio::fs::read_to_string(&self.body_file)
            .await
            .with_context(|| format!("reading body file {}", self.body_file.display()))?;
        let template = EmailTemplate::new(self.subject, body);

        Ok(match self.attachment {
            Some(path) => template.with_attachment(Attachment::load(&path).await?),
            None => template,
        })
    }
}

pub struct SendArgs {
    pub contacts: PathBuf,
    pub english: TemplateArgs,
    pub french: TemplateArgs,
    pub smtp_host: String,
    pub smtp_port: u16,
    pub smtp_user: Option<String>,
    pub sender: String,
    pub routes: Vec<RouteRule>,
    pub batch_size: usize,
    pub send_interval_ms: u64,
    pub output: PathBuf,
    pub report_dir: Option<PathBuf>,
}

pub async fn send(args: SendArgs) -> Result<()> {
    let password = std::env::var(PASSWORD_VAR)
        .map(SecretString::from)
        .with_context(|| format!("{} is not set", PASSWORD_VAR))?;

    let table = read_table(&args.contacts)?;
    table.require_columns(&[QUALIFICATION, EMAIL])?;

    let templates = TemplateSet {
        english: args.english.load().await?,
        french: args.french.load().await?,
    };
    let config = MailerConfig {
        batch_size: args.batch_size,
        send_interval: Duration::from_millis(args.send_interval_ms),
    };
    let mailer = Mailer::new(templates, QualificationRouter::new(args.routes), &args.sender, config)?;

    let username = args.smtp_user.unwrap_or_else(|| args.sender.clone());
    let settings = SmtpSettings::new(args.smtp_host, args.smtp_port, username, password);
    let transport = SmtpMailer::connect(&settings)?;
    transport
        .verify()
        .await
        .with_context(|| format!("SMTP login to {} failed", settings.host))?;

    println!(
        "{} up to {} of {} contacts as {}",
        style("Sending").bold(),
        args.batch_size.min(table.len()),
        table.len(),
        style(&args.sender).cyan()
    );

    let progress = BarProgress::new("Sending...");
    let report = mailer.send_batch(table, &transport, &progress).await?;

    write_table(&args.output, &report.remaining)?;
    tracing::info!(
        remaining = report.remaining.len(),
        output = %args.output.display(),
        "remaining contacts saved"
    );

    println!("  Sent: {}", style(report.sent()).green());
    if report.failed() > 0 {
        println!("  Failed: {}", style(report.failed()).red().bold());
    }
    if report.skipped() > 0 {
        println!("  Skipped: {}", style(report.skipped()).yellow());
    }
    for result in &report.results {
        if let SendOutcome::Failed(reason) = &result.outcome {
            println!("    {} ({})", result.email, reason);
        }
    }

    if let Some(dir) = &args.report_dir {
        let path = save_report(dir, &report).await?;
        println!("  Report: {}", path.display());
    }

    println!(
        "{} {} ({} contacts left)",
        style("Remaining saved to:").green().bold(),
        args.output.display(),
        report.remaining.len()
    );
    Ok(())
}

async fn save_report(dir: &Path, report: &outreach_mailer::BatchReport) -> Result<PathBuf> {
    let stamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default();
    let storage = JsonFileStorage::new(dir)?;
    storage.save_report(&format!("send-{}", stamp), &to_report(report)?).await
}
