use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use tracing::debug;

use crate::{
    error::DocumentError,
    registry::{
        client::Fetcher,
        extractor::CertificateExtractor,
        types::{DocumentId, DocumentOutcome, ValidDocument},
    },
    sweep::validity::ExpiryValidator,
};

/// Runs fetch, extract and validate for one identifier.
pub struct DocumentChecker<F: Fetcher> {
    fetcher: F,
    extractor: CertificateExtractor,
    validator: ExpiryValidator,
    base_url: String,
    id_width: usize,
}

impl<F: Fetcher> DocumentChecker<F> {
    pub fn new(
        fetcher: F,
        validator: ExpiryValidator,
        base_url: impl Into<String>,
        id_width: usize,
    ) -> Result<Self, DocumentError> {
        Ok(Self {
            fetcher,
            extractor: CertificateExtractor::new()?,
            validator,
            base_url: base_url.into(),
            id_width,
        })
    }

    pub fn url_for(&self, id: DocumentId) -> String {
        id.url(&self.base_url, self.id_width)
    }

    /// Never fails: fetch errors, parse errors and panics all become
    /// `DocumentOutcome::Failed`.
    pub async fn check(&self, id: DocumentId) -> DocumentOutcome {
        match AssertUnwindSafe(self.try_check(id)).catch_unwind().await {
            Ok(Ok(outcome)) => outcome,
            Ok(Err(err)) => DocumentOutcome::failed(id, err),
            Err(panic) => {
                let cause = panic
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| panic.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unexpected page structure".to_string());
                DocumentOutcome::failed(id, DocumentError::ParseFailed(cause))
            }
        }
    }

    async fn try_check(&self, id: DocumentId) -> Result<DocumentOutcome, DocumentError> {
        let url = self.url_for(id);
        let body = self.fetcher.fetch(&url).await?;
        let fields = self.extractor.extract(&body);

        match fields.expiration_date {
            Some(expiration_date) if self.validator.is_valid(&expiration_date) => {
                Ok(DocumentOutcome::Valid(ValidDocument {
                    url,
                    expiration_date,
                    applicant: fields.applicant,
                }))
            }
            other => {
                debug!("Document {} not applicable (expiration: {:?})", id, other);
                Ok(DocumentOutcome::NotApplicable)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::client::MockFetcher;
    use mockall::predicate::eq;

    const BASE: &str = "https://sert-reestr.net/ss_product_";

    fn page(expiration: &str, applicant: &str) -> String {
        format!(
            "<dl><dt>Дата окончания:</dt><dd>{}</dd><dt>Заявитель:</dt><dd>{}</dd></dl>",
            expiration, applicant
        )
    }

    fn checker(fetcher: MockFetcher) -> DocumentChecker<MockFetcher> {
        DocumentChecker::new(fetcher, ExpiryValidator::default(), BASE, 6).unwrap()
    }

    #[tokio::test]
    async fn test_valid_document() {
        let mut fetcher = MockFetcher::new();
        fetcher
            .expect_fetch()
            .with(eq("https://sert-reestr.net/ss_product_000042"))
            .times(1)
            .returning(|_| Ok(page("31.12.2999", "ООО Ромашка")));

        let outcome = checker(fetcher).check(DocumentId(42)).await;
        assert_eq!(
            outcome,
            DocumentOutcome::Valid(ValidDocument {
                url: "https://sert-reestr.net/ss_product_000042".to_string(),
                expiration_date: "31.12.2999".to_string(),
                applicant: Some("ООО Ромашка".to_string()),
            })
        );
    }

    #[tokio::test]
    async fn test_valid_without_applicant() {
        let mut fetcher = MockFetcher::new();
        fetcher
            .expect_fetch()
            .returning(|_| Ok("<dl><dt>Дата окончания:</dt><dd>01.01.2999</dd></dl>".to_string()));

        match checker(fetcher).check(DocumentId(7)).await {
            DocumentOutcome::Valid(doc) => assert_eq!(doc.applicant, None),
            other => panic!("expected valid outcome, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_expired_is_not_applicable() {
        let mut fetcher = MockFetcher::new();
        fetcher.expect_fetch().returning(|_| Ok(page("01.01.2000", "ИП Петров")));

        assert_eq!(checker(fetcher).check(DocumentId(1)).await, DocumentOutcome::NotApplicable);
    }

    #[tokio::test]
    async fn test_missing_label_is_not_applicable() {
        let mut fetcher = MockFetcher::new();
        fetcher
            .expect_fetch()
            .returning(|_| Ok("<html><body>404</body></html>".to_string()));

        assert_eq!(checker(fetcher).check(DocumentId(2)).await, DocumentOutcome::NotApplicable);
    }

    #[tokio::test]
    async fn test_malformed_date_is_not_applicable() {
        let mut fetcher = MockFetcher::new();
        fetcher.expect_fetch().returning(|_| Ok(page("2999-01-01", "x")));

        assert_eq!(checker(fetcher).check(DocumentId(3)).await, DocumentOutcome::NotApplicable);
    }

    #[tokio::test]
    async fn test_fetch_failure_keeps_parsing_label() {
        let mut fetcher = MockFetcher::new();
        fetcher
            .expect_fetch()
            .returning(|_| Err(DocumentError::FetchFailed("connection refused".to_string())));

        assert_eq!(
            checker(fetcher).check(DocumentId(1234)).await,
            DocumentOutcome::Failed {
                message: "Error parsing document 1234: connection refused".to_string()
            }
        );
    }

    struct PanickingFetcher;

    #[async_trait::async_trait]
    impl Fetcher for PanickingFetcher {
        async fn fetch(&self, _url: &str) -> Result<String, DocumentError> {
            panic!("tree walk blew up")
        }
    }

    #[tokio::test]
    async fn test_panic_becomes_failure() {
        let checker =
            DocumentChecker::new(PanickingFetcher, ExpiryValidator::default(), BASE, 6).unwrap();

        assert_eq!(
            checker.check(DocumentId(5)).await,
            DocumentOutcome::Failed {
                message: "Error parsing document 5: tree walk blew up".to_string()
            }
        );
    }
}
