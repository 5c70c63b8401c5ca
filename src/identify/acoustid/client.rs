//! AcoustID HTTP client
//!
//! Handles communication with the AcoustID web service.
//! See: https://acoustid.org/webservice
//!
//! ## API Quirks
//!
//! The `meta` parameter is a list separated by `+`, and the API does not
//! accept `%2B` as that separator. We send the lookup as an
//! `application/x-www-form-urlencoded` POST body, where form encoding turns
//! the spaces in `"recordings releasegroups compress"` into literal `+`,
//! which is exactly what the API expects. Fingerprints can be several
//! kilobytes long, so the body is preferred over a query string.

use super::dto;
use crate::identify::domain::IdentifyError;

/// Public AcoustID lookup endpoint
pub const DEFAULT_ENDPOINT: &str = "https://api.acoustid.org/v2/lookup";

/// Metadata requested with every lookup
const LOOKUP_META: &str = "recordings releasegroups compress";

/// AcoustID API client
pub struct AcoustIdClient {
    api_key: String,
    http_client: reqwest::Client,
    endpoint: String,
}

impl AcoustIdClient {
    /// Create a new client with the given API key and lookup endpoint
    ///
    /// The client is configured to:
    /// - Accept gzip-compressed responses (reduces bandwidth)
    /// - Send User-Agent header identifying the application
    pub fn new(
        api_key: impl Into<String>,
        endpoint: impl Into<String>,
    ) -> Result<Self, IdentifyError> {
        let http_client = reqwest::Client::builder()
            .gzip(true)
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .build()?;

        Ok(Self {
            api_key: api_key.into(),
            http_client,
            endpoint: endpoint.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Look up a fingerprint
    ///
    /// Returns the response as parsed; absent optional fields are kept absent.
    pub async fn lookup(
        &self,
        fingerprint: &str,
        duration_secs: u32,
    ) -> Result<dto::LookupResponse, IdentifyError> {
        let duration = duration_secs.to_string();
        let form = [
            ("client", self.api_key.as_str()),
            ("duration", duration.as_str()),
            ("fingerprint", fingerprint),
            ("meta", LOOKUP_META),
        ];

        tracing::debug!(duration_secs, "Querying AcoustID");

        let response = self
            .http_client
            .post(&self.endpoint)
            .form(&form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(IdentifyError::Api {
                status: status.as_u16(),
                status_text: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }

        let parsed = response
            .json::<dto::LookupResponse>()
            .await
            .map_err(|e| IdentifyError::Parse(e.to_string()))?;

        if let Some(ref error) = parsed.error {
            tracing::warn!(code = error.code, "AcoustID reported an error: {}", error.message);
        }
        tracing::debug!(
            status = %parsed.status,
            results = parsed.results.as_ref().map_or(0, Vec::len),
            "AcoustID lookup complete"
        );

        Ok(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::SAMPLE_LOOKUP_JSON;
    use wiremock::matchers::{body_string_contains, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> AcoustIdClient {
        AcoustIdClient::new("test-key", format!("{}/v2/lookup", server.uri())).unwrap()
    }

    #[test]
    fn test_client_creation() {
        let client = AcoustIdClient::new("test-key", DEFAULT_ENDPOINT).unwrap();
        assert_eq!(client.api_key, "test-key");
        assert_eq!(client.endpoint(), "https://api.acoustid.org/v2/lookup");
    }

    #[tokio::test]
    async fn test_lookup_posts_form_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v2/lookup"))
            .and(header("content-type", "application/x-www-form-urlencoded"))
            .and(body_string_contains("client=test-key"))
            .and(body_string_contains("duration=246"))
            .and(body_string_contains("fingerprint=AQADtEl"))
            .and(body_string_contains("meta=recordings+releasegroups+compress"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_raw(SAMPLE_LOOKUP_JSON, "application/json"),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let response = client.lookup("AQADtEl", 246).await.unwrap();

        assert_eq!(response.status, "ok");
        assert_eq!(response.results.unwrap()[0].id, "r1");
    }

    #[tokio::test]
    async fn test_lookup_non_success_is_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let result = client.lookup("AQAB", 10).await;

        match result {
            Err(IdentifyError::Api { status, status_text }) => {
                assert_eq!(status, 503);
                assert_eq!(status_text, "Service Unavailable");
            }
            other => panic!("expected API error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_lookup_invalid_json_is_parse_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let result = client.lookup("AQAB", 10).await;

        assert!(matches!(result, Err(IdentifyError::Parse(_))));
    }

    #[tokio::test]
    async fn test_lookup_keeps_absent_fields_absent() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(
                r#"{"status":"ok","results":[{"id":"x","score":0.4}]}"#,
                "application/json",
            ))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let response = client.lookup("AQAB", 10).await.unwrap();

        assert!(response.results.unwrap()[0].recordings.is_none());
    }
}
