use serde::Serialize;
use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;

use crate::error::{MailError, Result};

/// Which template a contact receives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Bucket {
    English,
    French,
}

impl FromStr for Bucket {
    type Err = MailError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "en" | "english" => Ok(Bucket::English),
            "fr" | "french" => Ok(Bucket::French),
            other => Err(MailError::InvalidRoute(other.to_string())),
        }
    }
}

/// A file sent with every message of one template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl Attachment {
    pub fn new(filename: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            bytes,
        }
    }

    /// Reads `path` once; the bytes are reused for every message.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await.map_err(|source| MailError::Attachment {
            path: path.to_path_buf(),
            source,
        })?;
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "attachment".to_string());

        Ok(Self::new(filename, bytes))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailTemplate {
    pub subject: String,
    /// Plain text body, sent as is.
    pub body: String,
    pub attachment: Option<Attachment>,
}

impl EmailTemplate {
    pub fn new(subject: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            body: body.into(),
            attachment: None,
        }
    }

    pub fn with_attachment(mut self, attachment: Attachment) -> Self {
        self.attachment = Some(attachment);
        self
    }
}

#[derive(Debug, Clone)]
pub struct TemplateSet {
    pub english: EmailTemplate,
    pub french: EmailTemplate,
}

impl TemplateSet {
    pub fn get(&self, bucket: Bucket) -> &EmailTemplate {
        match bucket {
            Bucket::English => &self.english,
            Bucket::French => &self.french,
        }
    }
}

/// An operator supplied `LABEL=en|fr` mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteRule {
    pub label: String,
    pub bucket: Bucket,
}

impl FromStr for RouteRule {
    type Err = MailError;

    fn from_str(s: &str) -> Result<Self> {
        let (label, bucket) = s
            .rsplit_once('=')
            .ok_or_else(|| MailError::InvalidRoute(s.to_string()))?;
        let label = normalize(label);
        if label.is_empty() {
            return Err(MailError::InvalidRoute(s.to_string()));
        }

        Ok(Self {
            label,
            bucket: bucket.parse().map_err(|_| MailError::InvalidRoute(s.to_string()))?,
        })
    }
}

/// Maps a contact's qualification cell to a template bucket.
///
/// Matching is on the trimmed, lowercased cell. `english` and `french` are
/// always known; rules add further labels and may override those two.
#[derive(Debug, Clone)]
pub struct QualificationRouter {
    labels: HashMap<String, Bucket>,
}

impl Default for QualificationRouter {
    fn default() -> Self {
        Self::new(std::iter::empty())
    }
}

impl QualificationRouter {
    pub fn new(rules: impl IntoIterator<Item = RouteRule>) -> Self {
        let mut labels = HashMap::from([
            ("english".to_string(), Bucket::English),
            ("french".to_string(), Bucket::French),
        ]);
        labels.extend(rules.into_iter().map(|rule| (rule.label, rule.bucket)));
        Self { labels }
    }

    pub fn route(&self, qualification: &str) -> Option<Bucket> {
        self.labels.get(&normalize(qualification)).copied()
    }
}

fn normalize(label: &str) -> String {
    label.trim().to_lowercase()
}
