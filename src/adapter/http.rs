//! HTTP helpers for adapter implementers
//!
//! Adapters own their transport, but they all need the same two things: a
//! sensibly configured client and a consistent mapping from HTTP outcomes to
//! [`FetchError`] classes. Keeping the mapping here means every site reports
//! rate limits, transport failures, and empty payloads the same way.

use crate::adapter::FetchError;
use reqwest::{Client, StatusCode};
use std::time::Duration;

/// Browser-style user agent presented to result sites
///
/// Several timing providers refuse requests from obvious bot agents.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/136.0.0.0 Safari/537.36";

/// Builds an HTTP client with the defaults shared by all adapters
pub fn build_http_client(user_agent: &str) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent)
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .https_only(true)
        .gzip(true)
        .brotli(true)
        .build()
}

/// Maps an HTTP status to a fetch error, or `Ok(())` for success statuses
pub fn check_status(status: StatusCode) -> Result<(), FetchError> {
    if status == StatusCode::TOO_MANY_REQUESTS {
        return Err(FetchError::RateLimited);
    }
    if !status.is_success() {
        return Err(FetchError::Http {
            status: status.as_u16(),
        });
    }
    Ok(())
}

/// Maps a reqwest error to a fetch error class
pub fn classify_transport_error(error: &reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Transport("request timeout".to_string())
    } else if error.is_connect() {
        FetchError::Transport("connection failed".to_string())
    } else if error.is_decode() {
        FetchError::Malformed(error.to_string())
    } else {
        FetchError::Transport(error.to_string())
    }
}

/// Fetches a URL and returns its body, classifying failures
///
/// A successful response with an empty (or whitespace-only) body maps to
/// [`FetchError::EmptyPayload`] so the retry policy can re-issue the request.
pub async fn fetch_text(client: &Client, url: &str) -> Result<String, FetchError> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| classify_transport_error(&e))?;

    check_status(response.status())?;

    let body = response
        .text()
        .await
        .map_err(|e| classify_transport_error(&e))?;

    if body.trim().is_empty() {
        return Err(FetchError::EmptyPayload);
    }

    Ok(body)
}

/// Fetches a URL and decodes its body as JSON
pub async fn fetch_json(client: &Client, url: &str) -> Result<serde_json::Value, FetchError> {
    let body = fetch_text(client, url).await?;
    serde_json::from_str(&body).map_err(|e| FetchError::Malformed(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_build_http_client() {
        let client = build_http_client(DEFAULT_USER_AGENT);
        assert!(client.is_ok());
    }

    #[test]
    fn test_check_status_classes() {
        assert!(check_status(StatusCode::OK).is_ok());
        assert!(matches!(
            check_status(StatusCode::TOO_MANY_REQUESTS),
            Err(FetchError::RateLimited)
        ));
        assert!(matches!(
            check_status(StatusCode::INTERNAL_SERVER_ERROR),
            Err(FetchError::Http { status: 500 })
        ));
        assert!(matches!(
            check_status(StatusCode::NOT_FOUND),
            Err(FetchError::Http { status: 404 })
        ));
    }

    // Mock server is plain HTTP, so drop the https_only default here
    fn test_client() -> Client {
        Client::builder()
            .user_agent(DEFAULT_USER_AGENT)
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn test_fetch_text_empty_body_is_empty_payload() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/results"))
            .respond_with(ResponseTemplate::new(200).set_body_string("  "))
            .mount(&server)
            .await;

        let client = test_client();
        let result = fetch_text(&client, &format!("{}/results", server.uri())).await;
        assert!(matches!(result, Err(FetchError::EmptyPayload)));
    }

    #[tokio::test]
    async fn test_fetch_text_rate_limited() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/results"))
            .respond_with(ResponseTemplate::new(429))
            .mount(&server)
            .await;

        let client = test_client();
        let result = fetch_text(&client, &format!("{}/results", server.uri())).await;
        assert!(matches!(result, Err(FetchError::RateLimited)));
    }

    #[tokio::test]
    async fn test_fetch_json_malformed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/results"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let client = test_client();
        let result = fetch_json(&client, &format!("{}/results", server.uri())).await;
        assert!(matches!(result, Err(FetchError::Malformed(_))));
    }

    #[tokio::test]
    async fn test_fetch_json_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/results"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"bib_number":"42"}"#))
            .mount(&server)
            .await;

        let client = test_client();
        let value = fetch_json(&client, &format!("{}/results", server.uri()))
            .await
            .unwrap();
        assert_eq!(value["bib_number"], "42");
    }
}
