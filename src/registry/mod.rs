pub mod client;
pub mod extractor;
pub mod types;

pub use client::{Fetcher, RegistryClient};
pub use extractor::CertificateExtractor;
pub use types::{CertificateFields, DocumentId, DocumentOutcome, ValidDocument};
