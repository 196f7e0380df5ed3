use std::fmt;

use crate::registry::types::ValidDocument;

const DATE_SEPARATOR: &str = " | Expiration Date: ";
const APPLICANT_SEPARATOR: &str = " | Applicant: ";
/// Written in place of an applicant the page did not list at all.
const MISSING_APPLICANT: &str = "None";

/// One numbered line of the valid-documents log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidLine {
    pub index: usize,
    pub document: ValidDocument,
}

impl ValidLine {
    pub fn new(index: usize, document: ValidDocument) -> Self {
        Self { index, document }
    }

    /// Inverse of `Display`. `None` reads back as a missing applicant, an
    /// empty value as an empty one.
    pub fn parse(line: &str) -> Option<Self> {
        let (index, rest) = line.split_once(". ")?;
        let index = index.parse().ok()?;
        let (url, rest) = rest.split_once(DATE_SEPARATOR)?;
        let (expiration_date, applicant) = rest.split_once(APPLICANT_SEPARATOR)?;

        Some(Self {
            index,
            document: ValidDocument {
                url: url.to_string(),
                expiration_date: expiration_date.to_string(),
                applicant: (applicant != MISSING_APPLICANT).then(|| applicant.to_string()),
            },
        })
    }
}

impl fmt::Display for ValidLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}. {}{}{}{}{}",
            self.index,
            self.document.url,
            DATE_SEPARATOR,
            self.document.expiration_date,
            APPLICANT_SEPARATOR,
            self.document.applicant.as_deref().unwrap_or(MISSING_APPLICANT)
        )
    }
}
