//! Command-line interface for the outreach pipeline.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use outreach_core::TimeoutConfig;
use outreach_mailer::RouteRule;

use crate::commands;

/// Job board harvesting, contact enrichment and templated outreach email.
#[derive(Parser)]
#[command(name = "outreach")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Driver {
    /// Headless Chromium, needed for the apply button.
    Chromium,
    /// Plain HTTP fetches; works when contact details are in the served HTML.
    Http,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Collect job titles and links from a search results page.
    Harvest {
        /// Search results URL
        url: String,

        /// Output table (.xlsx, .csv, .tsv)
        #[arg(short, long, default_value = "job_links.xlsx")]
        output: PathBuf,

        /// Upper bound on "load more" activations
        #[arg(long, default_value_t = 500, env = "OUTREACH_MAX_LOAD_MORE")]
        max_load_more: usize,

        /// Pause after each "load more" activation
        #[arg(long, default_value_t = 3000)]
        load_more_delay_ms: u64,

        /// Page load timeout
        #[arg(long, default_value_t = 30_000)]
        navigation_timeout_ms: u64,

        /// Show the browser window
        #[arg(long)]
        headful: bool,
    },

    /// Visit each harvested link and record qualification and contact email.
    Enrich {
        /// Table with Title and Link columns
        input: PathBuf,

        #[arg(short, long, default_value = "scraped_data.xlsx")]
        output: PathBuf,

        /// How long to wait for the apply button
        #[arg(long, default_value_t = 10_000)]
        apply_wait_ms: u64,

        /// Page load timeout
        #[arg(long, default_value_t = 30_000)]
        navigation_timeout_ms: u64,

        #[arg(long, value_enum, default_value_t = Driver::Chromium)]
        driver: Driver,

        #[arg(long)]
        headful: bool,
    },

    /// Send templated emails to one batch of contacts.
    ///
    /// The SMTP password is read from OUTREACH_SMTP_PASSWORD.
    Send {
        /// Table with Qualification and Email columns
        contacts: PathBuf,

        #[arg(long)]
        en_subject: String,

        /// Plain text body for English contacts
        #[arg(long)]
        en_body_file: PathBuf,

        #[arg(long)]
        en_attachment: Option<PathBuf>,

        #[arg(long)]
        fr_subject: String,

        #[arg(long)]
        fr_body_file: PathBuf,

        #[arg(long)]
        fr_attachment: Option<PathBuf>,

        #[arg(long, default_value = "smtp.gmail.com", env = "OUTREACH_SMTP_HOST")]
        smtp_host: String,

        #[arg(long, default_value_t = 587, env = "OUTREACH_SMTP_PORT")]
        smtp_port: u16,

        /// Login name, defaults to the sender address
        #[arg(long, env = "OUTREACH_SMTP_USER")]
        smtp_user: Option<String>,

        /// From address
        #[arg(long, env = "OUTREACH_SENDER")]
        sender: String,

        /// Extra qualification label, e.g. "english or french=en"
        #[arg(long = "route", value_parser = parse_route)]
        routes: Vec<RouteRule>,

        #[arg(long, default_value_t = 100)]
        batch_size: usize,

        /// Pause between sends
        #[arg(long, default_value_t = 500)]
        send_interval_ms: u64,

        /// Where the contacts after this batch are written
        #[arg(short, long, default_value = "updated_contacts.xlsx")]
        output: PathBuf,

        /// Folder for a JSON report of every send result
        #[arg(long)]
        report_dir: Option<PathBuf>,
    },

    /// Print one page of a table.
    Show {
        input: PathBuf,

        /// Zero based page index
        #[arg(long, default_value_t = 0)]
        page: usize,

        #[arg(long, default_value_t = 10)]
        page_size: usize,
    },
}

fn parse_route(s: &str) -> Result<RouteRule, String> {
    s.parse::<RouteRule>().map_err(|e| e.to_string())
}

/// Run the CLI.
pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Harvest {
            url,
            output,
            max_load_more,
            load_more_delay_ms,
            navigation_timeout_ms,
            headful,
        } => {
            let timeouts = TimeoutConfig::default()
                .with_navigation(navigation_timeout_ms)
                .with_load_more_delay(load_more_delay_ms);
            commands::harvest(&url, &output, max_load_more, timeouts, headful).await
        }
        Commands::Enrich {
            input,
            output,
            apply_wait_ms,
            navigation_timeout_ms,
            driver,
            headful,
        } => {
            let timeouts = TimeoutConfig::default()
                .with_navigation(navigation_timeout_ms)
                .with_apply_wait(apply_wait_ms);
            commands::enrich(&input, &output, timeouts, driver, headful).await
        }
        Commands::Send {
            contacts,
            en_subject,
            en_body_file,
            en_attachment,
            fr_subject,
            fr_body_file,
            fr_attachment,
            smtp_host,
            smtp_port,
            smtp_user,
            sender,
            routes,
            batch_size,
            send_interval_ms,
            output,
            report_dir,
        } => {
            let args = commands::SendArgs {
                contacts,
                english: commands::TemplateArgs {
                    subject: en_subject,
                    body_file: en_body_file,
                    attachment: en_attachment,
                },
                french: commands::TemplateArgs {
                    subject: fr_subject,
                    body_file: fr_body_file,
                    attachment: fr_attachment,
                },
                smtp_host,
                smtp_port,
                smtp_user,
                sender,
                routes,
                batch_size,
                send_interval_ms,
                output,
                report_dir,
            };
            commands::send(args).await
        }
        Commands::Show { input, page, page_size } => commands::show(&input, page, page_size),
    }
}
