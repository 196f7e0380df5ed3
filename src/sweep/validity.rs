use chrono::{Local, NaiveDate, NaiveDateTime};
use tracing::debug;

use crate::config::DEFAULT_DATE_FORMAT;

/// Decides whether an expiration date string is still in force.
#[derive(Debug, Clone)]
pub struct ExpiryValidator {
    date_format: String,
}

impl ExpiryValidator {
    pub fn new(date_format: impl Into<String>) -> Self {
        Self {
            date_format: date_format.into(),
        }
    }

    /// Check against the local wall clock, read fresh on every call.
    pub fn is_valid(&self, text: &str) -> bool {
        self.is_valid_at(text, Local::now().naive_local())
    }

    /// The date counts from its midnight, so it is valid only while that
    /// midnight has not passed `now`.
    pub fn is_valid_at(&self, text: &str, now: NaiveDateTime) -> bool {
        match self.parse(text) {
            Some(date) => date.and_hms_opt(0, 0, 0).is_some_and(|expires| expires >= now),
            None => {
                debug!("Unparseable expiration date: {:?}", text);
                false
            }
        }
    }

    /// Strict parse: the text must be exactly what the format would print,
    /// so unpadded `1.1.2024` is rejected.
    pub fn parse(&self, text: &str) -> Option<NaiveDate> {
        let date = NaiveDate::parse_from_str(text, &self.date_format).ok()?;
        (date.format(&self.date_format).to_string() == text).then_some(date)
    }
}

impl Default for ExpiryValidator {
    fn default() -> Self {
        Self::new(DEFAULT_DATE_FORMAT)
    }
}

pub fn is_valid_date(text: &str) -> bool {
    ExpiryValidator::default().is_valid(text)
}

pub fn is_valid_date_at(text: &str, now: NaiveDateTime) -> bool {
    ExpiryValidator::default().is_valid_at(text, now)
}
