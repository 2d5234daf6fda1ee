use async_trait::async_trait;
use lettre::Message;
use outreach_core::NoProgress;
use outreach_mailer::{
    BatchReport, EmailTemplate, MailError, MailTransport, Mailer, MailerConfig, QualificationRouter, SendOutcome,
    TemplateSet,
};
use outreach_storage::{Table, TableError};
use pretty_assertions::assert_eq;
use std::collections::HashSet;
use std::sync::Mutex;
use std::time::Duration;

/// Records every recipient and subject; refuses listed recipients.
#[derive(Default)]
struct MockTransport {
    delivered: Mutex<Vec<(String, String)>>,
    attempts: Mutex<usize>,
    refuse: HashSet<String>,
}

impl MockTransport {
    fn refusing(addresses: &[&str]) -> Self {
        Self {
            refuse: addresses.iter().map(|a| a.to_string()).collect(),
            ..Self::default()
        }
    }

    fn attempts(&self) -> usize {
        *self.attempts.lock().unwrap()
    }

    fn delivered(&self) -> Vec<(String, String)> {
        self.delivered.lock().unwrap().clone()
    }
}

#[async_trait]
impl MailTransport for MockTransport {
    async fn deliver(&self, message: Message) -> Result<(), MailError> {
        *self.attempts.lock().unwrap() += 1;
        let to = message.envelope().to()[0].to_string();
        if self.refuse.contains(&to) {
            return Err(MailError::Delivery(format!("550 mailbox unavailable: {}", to)));
        }
        let subject = message.headers().get_raw("Subject").unwrap_or_default().to_string();
        self.delivered.lock().unwrap().push((to, subject));
        Ok(())
    }
}

fn mailer(batch_size: usize) -> Mailer {
    let templates = TemplateSet {
        english: EmailTemplate::new("Application", "Hello"),
        french: EmailTemplate::new("Candidature", "Bonjour"),
    };
    let config = MailerConfig {
        batch_size,
        send_interval: Duration::ZERO,
    };
    Mailer::new(templates, QualificationRouter::default(), "recruiting@example.ca", config).unwrap()
}

fn contacts(rows: &[(&str, &str)]) -> Table {
    let mut table = Table::new(["Title", "Link", "Qualification", "Email", "Notes"]);
    for (i, (qualification, email)) in rows.iter().enumerate() {
        table.push_row([
            format!("Job {i}"),
            format!("https://example.ca/{i}"),
            qualification.to_string(),
            email.to_string(),
            format!("note {i}"),
        ]);
    }
    table
}

async fn send(mailer: &Mailer, table: Table, transport: &MockTransport) -> BatchReport {
    mailer.send_batch(table, transport, &NoProgress).await.unwrap()
}

#[tokio::test]
async fn batch_is_bounded_and_the_rest_is_kept_in_order() {
    let addresses: Vec<String> = (0..150).map(|i| format!("contact{i}@example.ca")).collect();
    let rows: Vec<(&str, &str)> = addresses.iter().map(|a| ("English", a.as_str())).collect();
    let transport = MockTransport::default();

    let report = send(&mailer(100), contacts(&rows), &transport).await;

    assert_eq!(transport.attempts(), 100);
    assert_eq!(report.results.len(), 100);
    assert_eq!(report.sent(), 100);
    assert_eq!(report.remaining.len(), 50);
    assert_eq!(report.remaining.headers(), ["Title", "Link", "Qualification", "Email", "Notes"]);
    assert_eq!(report.remaining.rows()[0][3], "contact100@example.ca");
    assert_eq!(report.remaining.rows()[49][4], "note 149");
}

#[tokio::test]
async fn qualification_picks_the_template() {
    let transport = MockTransport::default();
    let table = contacts(&[(" english ", "a@example.ca"), ("FRENCH", "b@example.ca")]);

    send(&mailer(100), table, &transport).await;

    assert_eq!(
        transport.delivered(),
        vec![
            ("a@example.ca".to_string(), "Application".to_string()),
            ("b@example.ca".to_string(), "Candidature".to_string()),
        ]
    );
}

#[tokio::test]
async fn unknown_qualification_and_missing_address_are_skipped() {
    let transport = MockTransport::default();
    let table = contacts(&[
        ("English or French", "a@example.ca"),
        ("No qualification found", "b@example.ca"),
        ("English", "No email found"),
        ("French", "c@example.ca"),
    ]);

    let report = send(&mailer(100), table, &transport).await;

    assert_eq!(transport.attempts(), 1);
    assert_eq!(report.skipped(), 3);
    assert!(matches!(&report.results[0].outcome, SendOutcome::Skipped(r) if r.contains("English or French")));
    assert_eq!(report.results[3].outcome, SendOutcome::Sent);
}

#[tokio::test]
async fn failures_do_not_stop_the_batch() {
    let transport = MockTransport::refusing(&["b@example.ca"]);
    let table = contacts(&[("English", "a@example.ca"), ("English", "b@example.ca"), ("French", "c@example.ca")]);

    let report = send(&mailer(100), table, &transport).await;

    assert_eq!(transport.attempts(), 3);
    assert_eq!(report.sent(), 2);
    assert!(matches!(&report.results[1].outcome, SendOutcome::Failed(r) if r.contains("550")));
    assert_eq!(report.results[1].email, "b@example.ca");
}

#[tokio::test]
async fn malformed_recipient_fails_without_stopping_the_batch() {
    let transport = MockTransport::default();
    let table = contacts(&[("English", "a..b@example.ca"), ("English", "c@example.ca")]);

    let report = send(&mailer(100), table, &transport).await;

    assert_eq!(transport.attempts(), 1);
    assert!(matches!(
        &report.results[0].outcome,
        SendOutcome::Failed(r) if r.starts_with("Invalid address 'a..b@example.ca'")
    ));
    assert_eq!(report.results[1].outcome, SendOutcome::Sent);
    assert_eq!(transport.delivered(), vec![("c@example.ca".to_string(), "Application".to_string())]);
}

#[tokio::test]
async fn missing_columns_abort_before_sending() {
    let mut table = Table::new(["Title", "Email"]);
    table.push_row(["Cook", "a@example.ca"]);
    let transport = MockTransport::default();

    let err = mailer(100).send_batch(table, &transport, &NoProgress).await.unwrap_err();

    assert!(matches!(err, MailError::Table(TableError::MissingColumns(c)) if c == vec!["Qualification".to_string()]));
    assert_eq!(transport.attempts(), 0);
}

#[tokio::test]
async fn short_file_leaves_nothing_remaining() {
    let transport = MockTransport::default();
    let report = send(&mailer(100), contacts(&[("English", "a@example.ca")]), &transport).await;

    assert!(report.remaining.is_empty());
    assert_eq!(report.remaining.headers().len(), 5);
}

#[test]
fn invalid_sender_is_rejected() {
    let templates = TemplateSet {
        english: EmailTemplate::new("s", "b"),
        french: EmailTemplate::new("s", "b"),
    };
    let result = Mailer::new(templates, QualificationRouter::default(), "nobody", MailerConfig::default());
    assert!(matches!(result, Err(MailError::Address { .. })));
}
