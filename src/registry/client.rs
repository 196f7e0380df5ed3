use async_trait::async_trait;
use encoding_rs::{Encoding, UTF_8};
use reqwest::{header::CONTENT_TYPE, Client, Response};
use tracing::debug;

use crate::{
    config::RegistryConfig,
    error::{DocumentError, Result},
};

/// Source of raw detail-page bodies.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> std::result::Result<String, DocumentError>;
}

#[async_trait]
impl<T: Fetcher + ?Sized> Fetcher for std::sync::Arc<T> {
    async fn fetch(&self, url: &str) -> std::result::Result<String, DocumentError> {
        (**self).fetch(url).await
    }
}

/// Registry HTTP client. One instance is shared by every request of a run;
/// connection pooling lives in the inner `reqwest::Client`.
#[derive(Clone)]
pub struct RegistryClient {
    client: Client,
}

impl RegistryClient {
    pub fn new(config: &RegistryConfig) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        if let Some(agent) = &config.user_agent {
            builder = builder.user_agent(agent.clone());
        }
        Ok(Self { client: builder.build()? })
    }
}

#[async_trait]
impl Fetcher for RegistryClient {
    /// Returns the decoded body for any status code.
    async fn fetch(&self, url: &str) -> std::result::Result<String, DocumentError> {
        let response = self.client.get(url).send().await?;
        debug!("GET {} -> {}", url, response.status());
        let charset = response_charset(&response);
        let body = response.bytes().await?;
        decode_body(&body, charset.as_deref())
    }
}

fn response_charset(response: &Response) -> Option<String> {
    let content_type = response.headers().get(CONTENT_TYPE)?.to_str().ok()?;
    content_type.split(';').skip(1).find_map(|param| {
        let (name, value) = param.split_once('=')?;
        name.trim()
            .eq_ignore_ascii_case("charset")
            .then(|| value.trim().trim_matches('"').to_string())
    })
}

/// Strict decode: malformed bytes or an unknown charset fail the fetch
/// instead of being replaced. Without a declared charset the body must be UTF-8.
fn decode_body(body: &[u8], charset: Option<&str>) -> std::result::Result<String, DocumentError> {
    let encoding = match charset {
        Some(label) => Encoding::for_label(label.as_bytes()).ok_or_else(|| {
            DocumentError::FetchFailed(format!("unknown charset: {}", label))
        })?,
        None => UTF_8,
    };
    encoding
        .decode_without_bom_handling_and_without_replacement(body)
        .map(|text| text.into_owned())
        .ok_or_else(|| {
            DocumentError::FetchFailed(format!(
                "response body is not valid {}",
                encoding.name()
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client() -> RegistryClient {
        RegistryClient::new(&crate::config::Config::default().registry).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_returns_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ss_product_000042"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<dl></dl>"))
            .mount(&server)
            .await;

        let url = format!("{}/ss_product_000042", server.uri());
        assert_eq!(client().fetch(&url).await.unwrap(), "<dl></dl>");
    }

    #[tokio::test]
    async fn test_fetch_ignores_status_code() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404).set_body_string("not found"))
            .mount(&server)
            .await;

        let url = format!("{}/ss_product_000001", server.uri());
        assert_eq!(client().fetch(&url).await.unwrap(), "not found");
    }

    #[tokio::test]
    async fn test_fetch_rejects_malformed_utf8() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_bytes(vec![0x3c, 0x70, 0x3e, 0xff, 0xfe, 0xc3, 0x28])
                    .insert_header("Content-Type", "text/html; charset=utf-8"),
            )
            .mount(&server)
            .await;

        let url = format!("{}/ss_product_000009", server.uri());
        let err = client().fetch(&url).await.unwrap_err();
        assert_eq!(
            err,
            DocumentError::FetchFailed("response body is not valid UTF-8".to_string())
        );
    }

    #[tokio::test]
    async fn test_fetch_decodes_declared_charset() {
        let server = MockServer::start().await;
        // "Заявитель:" in windows-1251
        let body = vec![0xc7, 0xe0, 0xff, 0xe2, 0xe8, 0xf2, 0xe5, 0xeb, 0xfc, 0x3a];
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_bytes(body)
                    .insert_header("Content-Type", "text/html; charset=\"windows-1251\""),
            )
            .mount(&server)
            .await;

        let url = format!("{}/ss_product_000010", server.uri());
        assert_eq!(client().fetch(&url).await.unwrap(), "Заявитель:");
    }

    #[test]
    fn test_decode_body_unknown_charset_fails() {
        assert!(matches!(
            decode_body(b"<p></p>", Some("x-klingon")),
            Err(DocumentError::FetchFailed(_))
        ));
        assert_eq!(decode_body("<p>ок</p>".as_bytes(), None).unwrap(), "<p>ок</p>");
    }

    #[tokio::test]
    async fn test_fetch_connection_refused_is_fetch_failure() {
        // Nothing listens on port 1.
        let url = "http://127.0.0.1:1/ss_product_000001";
        let err = client().fetch(url).await.unwrap_err();
        assert!(matches!(err, DocumentError::FetchFailed(_)));
    }
}
