//! Templated outreach email, one bounded batch at a time.

mod batch;
mod error;
mod message;
mod template;
mod transport;

pub use batch::{BatchReport, Mailer, MailerConfig, SendOutcome, SendResult};
pub use error::{MailError, Result};
pub use message::{compose, mailbox};
pub use template::{Attachment, Bucket, EmailTemplate, QualificationRouter, RouteRule, TemplateSet};
pub use transport::{MailTransport, SmtpMailer, SmtpSettings};
