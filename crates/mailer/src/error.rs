use outreach_storage::TableError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MailError {
    #[error("Invalid address '{address}': {source}")]
    Address {
        address: String,
        #[source]
        source: lettre::address::AddressError,
    },

    #[error("Could not build message: {0}")]
    Message(#[from] lettre::error::Error),

    #[error("Invalid content type: {0}")]
    ContentType(#[from] lettre::message::header::ContentTypeErr),

    #[error("SMTP error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),

    /// The server accepted the connection but refused the session.
    #[error("SMTP server {0} did not accept the connection")]
    Unreachable(String),

    /// Rejection reported by a non-SMTP [`MailTransport`](crate::MailTransport).
    #[error("Delivery failed: {0}")]
    Delivery(String),

    #[error("Could not read attachment {}: {source}", .path.display())]
    Attachment {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid route '{0}'. Expected LABEL=en or LABEL=fr")]
    InvalidRoute(String),

    #[error(transparent)]
    Table(#[from] TableError),
}

pub type Result<T> = std::result::Result<T, MailError>;
