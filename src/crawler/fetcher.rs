//! HTTP fetching
//!
//! One client is shared by the whole run, identified by a crawler UA
//! string built from the configuration. A fetch succeeds only on HTTP 200
//! with a readable body; every other outcome is a [`FetchError`] the
//! engine counts and moves past. There is no retry here: a failed URL
//! stays consumed for the rest of the run.

use crate::config::UserAgentConfig;
use crate::FetchError;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use url::Url;

/// A successfully fetched page, consumed immediately by extraction
#[derive(Debug)]
pub struct PageResult {
    /// The URL as requested (the frontier dedup key)
    pub url: Url,

    /// Final URL after redirects
    pub final_url: Url,

    /// HTTP status code (always 200 for a success)
    pub status_code: u16,

    /// Decoded response body
    pub body: String,
}

/// Builds the HTTP client shared by page fetches and PDF downloads.
///
/// The user agent follows the
/// `CrawlerName/Version (+ContactURL; ContactEmail)` convention so site
/// operators can identify and reach us.
pub fn build_http_client(config: &UserAgentConfig) -> Result<Client, reqwest::Error> {
    let user_agent = format!(
        "{}/{} (+{}; {})",
        config.crawler_name, config.crawler_version, config.contact_url, config.contact_email
    );

    Client::builder()
        .user_agent(user_agent)
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a page, requiring HTTP 200.
pub async fn fetch_page(client: &Client, url: &Url) -> Result<PageResult, FetchError> {
    let response = client
        .get(url.clone())
        .send()
        .await
        .map_err(|e| classify_error(url, e))?;

    let status = response.status();
    if status != StatusCode::OK {
        return Err(FetchError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let final_url = response.url().clone();
    let body = response.text().await.map_err(|e| classify_error(url, e))?;

    Ok(PageResult {
        url: url.clone(),
        final_url,
        status_code: status.as_u16(),
        body,
    })
}

/// Fetches a raw document body (PDF payloads), requiring HTTP 200.
pub async fn fetch_bytes(client: &Client, url: &Url) -> Result<Vec<u8>, FetchError> {
    let response = client
        .get(url.clone())
        .send()
        .await
        .map_err(|e| classify_error(url, e))?;

    let status = response.status();
    if status != StatusCode::OK {
        return Err(FetchError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let bytes = response.bytes().await.map_err(|e| classify_error(url, e))?;
    Ok(bytes.to_vec())
}

fn classify_error(url: &Url, error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout {
            url: url.to_string(),
        }
    } else {
        FetchError::Http {
            url: url.to_string(),
            source: error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_user_agent() -> UserAgentConfig {
        UserAgentConfig {
            crawler_name: "EzhuthuBot".to_string(),
            crawler_version: "1.0".to_string(),
            contact_url: "https://example.com/about".to_string(),
            contact_email: "admin@example.com".to_string(),
        }
    }

    #[test]
    fn test_build_http_client() {
        assert!(build_http_client(&test_user_agent()).is_ok());
    }

    #[tokio::test]
    async fn test_fetch_page_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/page"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>കേരളം</html>"))
            .mount(&server)
            .await;

        let client = build_http_client(&test_user_agent()).unwrap();
        let url = Url::parse(&format!("{}/page", server.uri())).unwrap();
        let result = fetch_page(&client, &url).await.unwrap();

        assert_eq!(result.status_code, 200);
        assert!(result.body.contains("കേരളം"));
        assert_eq!(result.url, url);
    }

    #[tokio::test]
    async fn test_non_200_is_fetch_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/missing"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let client = build_http_client(&test_user_agent()).unwrap();
        let url = Url::parse(&format!("{}/missing", server.uri())).unwrap();

        match fetch_page(&client, &url).await {
            Err(FetchError::Status { status, .. }) => assert_eq!(status, 404),
            other => panic!("expected status error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_redirect_resolves_final_url() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/old"))
            .respond_with(
                ResponseTemplate::new(301).insert_header("location", "/new"),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/new"))
            .respond_with(ResponseTemplate::new(200).set_body_string("moved"))
            .mount(&server)
            .await;

        let client = build_http_client(&test_user_agent()).unwrap();
        let url = Url::parse(&format!("{}/old", server.uri())).unwrap();
        let result = fetch_page(&client, &url).await.unwrap();

        assert!(result.final_url.path().ends_with("/new"));
        assert_eq!(result.url, url);
    }

    #[tokio::test]
    async fn test_fetch_bytes_returns_raw_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/doc.pdf"))
            .respond_with(
                ResponseTemplate::new(200).set_body_bytes(vec![0x25, 0x50, 0x44, 0x46]),
            )
            .mount(&server)
            .await;

        let client = build_http_client(&test_user_agent()).unwrap();
        let url = Url::parse(&format!("{}/doc.pdf", server.uri())).unwrap();
        let bytes = fetch_bytes(&client, &url).await.unwrap();
        assert_eq!(bytes, b"%PDF");
    }
}
