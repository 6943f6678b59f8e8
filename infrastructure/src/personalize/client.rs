//! HTTP client for the Sitecore Personalize REST API.

use crate::config::FilePersonalizeConfig;
use assistant_application::RemoteResult;
use assistant_domain::ClientConfiguration;
use assistant_domain::util::{abbreviate, redact_all};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// Longest response body quoted in a failure detail
const BODY_EXCERPT_LIMIT: usize = 300;

/// Errors from a single Personalize exchange
#[derive(Error, Debug)]
pub enum PersonalizeError {
    #[error("Failed to build HTTP client: {0}")]
    Client(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Request timed out")]
    Timeout,

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Unexpected response: {0}")]
    Decode(String),
}

impl PersonalizeError {
    fn from_reqwest(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            PersonalizeError::Timeout
        } else {
            PersonalizeError::Transport(error.to_string())
        }
    }

    /// Normalize into a [`RemoteResult`], scrubbing `secrets` from the detail.
    pub fn into_remote(self, operation: &str, secrets: &[&str]) -> RemoteResult {
        match self {
            PersonalizeError::Timeout => RemoteResult::TimedOut(operation.to_string()),
            other => RemoteResult::Failure(redact_all(
                &format!("{} failed: {}", operation, other),
                secrets.iter().copied(),
            )),
        }
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Thin Personalize client. Holds endpoints only; every call is
/// authenticated by the [`ClientConfiguration`] passed to it.
#[derive(Debug, Clone)]
pub struct PersonalizeClient {
    http: reqwest::Client,
    auth_url: String,
    audience: String,
    api_base_url: String,
}

impl PersonalizeClient {
    pub fn from_config(config: &FilePersonalizeConfig) -> Result<Self, PersonalizeError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .build()
            .map_err(|e| PersonalizeError::Client(e.to_string()))?;

        Ok(Self {
            http,
            auth_url: config.auth_url.clone(),
            audience: config.audience.clone(),
            api_base_url: config.api_base_url.trim_end_matches('/').to_string(),
        })
    }

    /// OAuth2 client-credentials exchange. Tokens are not cached.
    pub async fn fetch_token(
        &self,
        configuration: &ClientConfiguration,
    ) -> Result<String, PersonalizeError> {
        debug!(client_id = %configuration.client_id, "Requesting platform access token");
        let response = self
            .http
            .post(&self.auth_url)
            .form(&[
                ("client_id", configuration.client_id.as_str()),
                ("client_secret", configuration.client_secret.as_str()),
                ("audience", self.audience.as_str()),
                ("grant_type", "client_credentials"),
            ])
            .send()
            .await
            .map_err(PersonalizeError::from_reqwest)?;

        let token: TokenResponse = Self::read_json(response).await?;
        Ok(token.access_token)
    }

    /// `POST /v3/flows`
    pub async fn create_flow(&self, token: &str, body: &Value) -> Result<Value, PersonalizeError> {
        let response = self
            .http
            .post(format!("{}/v3/flows", self.api_base_url))
            .bearer_auth(token)
            .json(body)
            .send()
            .await
            .map_err(PersonalizeError::from_reqwest)?;
        Self::read_json(response).await
    }

    /// `GET /v3/flows?limit=N`
    pub async fn list_flows(&self, token: &str, limit: i64) -> Result<Value, PersonalizeError> {
        let response = self
            .http
            .get(format!("{}/v3/flows", self.api_base_url))
            .query(&[("limit", limit)])
            .bearer_auth(token)
            .send()
            .await
            .map_err(PersonalizeError::from_reqwest)?;
        Self::read_json(response).await
    }

    async fn read_json<T: for<'de> Deserialize<'de>>(
        response: reqwest::Response,
    ) -> Result<T, PersonalizeError> {
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(PersonalizeError::from_reqwest)?;

        if !status.is_success() {
            return Err(PersonalizeError::Status {
                status: status.as_u16(),
                body: abbreviate(&text, BODY_EXCERPT_LIMIT),
            });
        }
        serde_json::from_str(&text)
            .map_err(|e| PersonalizeError::Decode(format!("{}: {}", e, abbreviate(&text, 80))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assistant_domain::PlatformProduct;
    use mockito::Matcher;
    use serde_json::json;

    fn configuration() -> ClientConfiguration {
        ClientConfiguration::new(PlatformProduct::PersonalizeCdp, "org-1", "client-1", "s3cr3t")
    }

    fn client_for(server: &mockito::Server) -> PersonalizeClient {
        PersonalizeClient::from_config(&FilePersonalizeConfig {
            auth_url: format!("{}/oauth/token", server.url()),
            audience: "https://api.example".to_string(),
            api_base_url: server.url(),
            request_timeout_seconds: 5,
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_fetch_token_sends_client_credentials() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/oauth/token")
            .match_body(Matcher::AllOf(vec![
                Matcher::UrlEncoded("grant_type".into(), "client_credentials".into()),
                Matcher::UrlEncoded("client_id".into(), "client-1".into()),
                Matcher::UrlEncoded("client_secret".into(), "s3cr3t".into()),
                Matcher::UrlEncoded("audience".into(), "https://api.example".into()),
            ]))
            .with_status(200)
            .with_body(r#"{"access_token":"tok-1","token_type":"bearer","expires_in":86400}"#)
            .create_async()
            .await;

        let token = client_for(&server).fetch_token(&configuration()).await.unwrap();
        assert_eq!(token, "tok-1");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_rejected_credentials() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/oauth/token")
            .with_status(401)
            .with_body(r#"{"error":"access_denied"}"#)
            .create_async()
            .await;

        let err = client_for(&server).fetch_token(&configuration()).await.unwrap_err();
        assert!(matches!(err, PersonalizeError::Status { status: 401, .. }));
    }

    #[tokio::test]
    async fn test_list_flows_passes_limit_and_token() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/v3/flows")
            .match_query(Matcher::UrlEncoded("limit".into(), "5".into()))
            .match_header("authorization", "Bearer tok-1")
            .with_status(200)
            .with_body(r#"{"items":[]}"#)
            .create_async()
            .await;

        let body = client_for(&server).list_flows("tok-1", 5).await.unwrap();
        assert_eq!(body, json!({"items": []}));
        mock.assert_async().await;
    }

    #[test]
    fn test_failure_detail_is_redacted() {
        let err = PersonalizeError::Status {
            status: 400,
            body: "bad client_secret s3cr3t".to_string(),
        };
        match err.into_remote("create_flow", &["s3cr3t"]) {
            RemoteResult::Failure(detail) => {
                assert!(detail.contains("HTTP 400"));
                assert!(!detail.contains("s3cr3t"));
            }
            other => panic!("unexpected result: {:?}", other),
        }
        assert_eq!(
            PersonalizeError::Timeout.into_remote("create_flow", &[]),
            RemoteResult::TimedOut("create_flow".to_string())
        );
    }
}
