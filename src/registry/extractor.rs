use scraper::{ElementRef, Html, Selector};

use crate::{error::DocumentError, registry::types::CertificateFields};

pub const EXPIRATION_LABEL: &str = "Дата окончания:";
pub const APPLICANT_LABEL: &str = "Заявитель:";

/// Pulls the certificate fields out of a registry detail page.
///
/// The page is a definition list: each `<dt>` label is followed in document
/// order by the `<dd>` holding its value. Labels match exactly, case included.
pub struct CertificateExtractor {
    terms: Selector,
}

impl CertificateExtractor {
    pub fn new() -> Result<Self, DocumentError> {
        let terms = Selector::parse("dt, dd")
            .map_err(|e| DocumentError::ParseFailed(format!("invalid selector: {}", e)))?;
        Ok(Self { terms })
    }

    pub fn extract(&self, html: &str) -> CertificateFields {
        let document = Html::parse_document(html);
        let nodes: Vec<ElementRef<'_>> = document.select(&self.terms).collect();

        CertificateFields {
            expiration_date: value_after_label(&nodes, EXPIRATION_LABEL),
            applicant: value_after_label(&nodes, APPLICANT_LABEL),
        }
    }
}

/// First `<dd>` after the first `<dt>` whose sole string is exactly `label`.
/// A present but blank `<dd>` yields `Some("")`.
fn value_after_label(nodes: &[ElementRef<'_>], label: &str) -> Option<String> {
    let start = nodes
        .iter()
        .position(|node| node.value().name() == "dt" && sole_string(*node) == Some(label))?;

    let value = nodes[start + 1..]
        .iter()
        .find(|node| node.value().name() == "dd")?
        .text()
        .collect::<String>();

    Some(value.trim().to_string())
}

/// The text of an element with exactly one child, descending through
/// single-child wrappers. Mixed content has no sole string.
fn sole_string(element: ElementRef<'_>) -> Option<&str> {
    let mut children = element.children();
    let only = children.next()?;
    if children.next().is_some() {
        return None;
    }
    if let Some(text) = only.value().as_text() {
        return Some(&**text);
    }
    ElementRef::wrap(only).and_then(sole_string)
}
