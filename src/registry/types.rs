use serde::{Deserialize, Serialize};
use std::fmt;

/// Index of a certificate document in the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DocumentId(pub u32);

impl DocumentId {
    /// Build the detail page URL, zero-padding the id to `width` digits.
    pub fn url(&self, base_url: &str, width: usize) -> String {
        format!("{}{:0width$}", base_url, self.0, width = width)
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Raw fields pulled from a detail page. Either may be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CertificateFields {
    pub expiration_date: Option<String>,
    pub applicant: Option<String>,
}

/// A document whose expiration date is still ahead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidDocument {
    pub url: String,
    pub expiration_date: String,
    pub applicant: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentOutcome {
    Valid(ValidDocument),
    /// Fetched and parsed, but expired, undated or not parseable as a date.
    NotApplicable,
    Failed { message: String },
}

impl DocumentOutcome {
    pub fn failed(id: DocumentId, cause: impl fmt::Display) -> Self {
        DocumentOutcome::Failed {
            message: format!("Error parsing document {}: {}", id, cause),
        }
    }
}
