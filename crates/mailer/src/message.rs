use lettre::message::header::ContentType;
use lettre::message::{Attachment as AttachmentPart, Mailbox, MultiPart, SinglePart};
use lettre::Message;

use crate::error::{MailError, Result};
use crate::template::EmailTemplate;

pub fn mailbox(address: &str) -> Result<Mailbox> {
    address.trim().parse().map_err(|source| MailError::Address {
        address: address.to_string(),
        source,
    })
}

/// Builds a plain text message with the template's attachment, if any.
pub fn compose(sender: &Mailbox, recipient: &str, template: &EmailTemplate) -> Result<Message> {
    let mut parts = MultiPart::mixed().singlepart(SinglePart::plain(template.body.clone()));

    if let Some(attachment) = &template.attachment {
        let content_type = ContentType::parse("application/octet-stream")?;
        parts = parts.singlepart(
            AttachmentPart::new(attachment.filename.clone()).body(attachment.bytes.clone(), content_type),
        );
    }

    let message = Message::builder()
        .from(sender.clone())
        .to(mailbox(recipient)?)
        .subject(template.subject.clone())
        .multipart(parts)?;
    Ok(message)
}
