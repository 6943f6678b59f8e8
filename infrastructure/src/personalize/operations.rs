//! Personalize remote operations: the executors behind the built-in tools.

use super::client::{PersonalizeClient, PersonalizeError};
use assistant_application::{RemoteResult, ToolExecutor};
use assistant_domain::{ClientConfiguration, ValidatedArguments};
use async_trait::async_trait;
use serde_json::{Map, Value, json};
use tracing::info;

/// Listing size when the model does not ask for one
pub const DEFAULT_LIST_LIMIT: i64 = 20;

/// Convert a display label ("Mobile App") to the API enum form ("MOBILE_APP").
fn api_enum(label: &str) -> String {
    label.trim().to_uppercase().replace(' ', "_")
}

/// Keep the descriptor fields the model needs from a flow document.
fn describe_flow(flow: &Value) -> Value {
    let mut descriptor = Map::new();
    for key in ["ref", "name", "type", "status", "channels"] {
        if let Some(value) = flow.get(key) {
            descriptor.insert(key.to_string(), value.clone());
        }
    }
    Value::Object(descriptor)
}

/// Request body for a new draft flow
fn draft_flow_body(arguments: &ValidatedArguments) -> Value {
    let channels: Vec<String> = arguments
        .get_str_list("channels")
        .into_iter()
        .map(api_enum)
        .collect();

    let mut body = json!({
        "name": arguments.get_str("name").unwrap_or_default(),
        "type": api_enum(arguments.get_str("type").unwrap_or_default()),
        "channels": channels,
        "status": "DRAFT",
    });

    if let Some(Value::Object(assets)) = arguments.get("assets") {
        let assets: Map<String, Value> = assets
            .iter()
            .filter(|(_, v)| v.as_str().is_some_and(|s| !s.is_empty()))
            .map(|(k, v)| {
                let key = if k == "javascript" { "js" } else { k.as_str() };
                (key.to_string(), v.clone())
            })
            .collect();
        if !assets.is_empty() {
            body["variants"] = json!([{ "name": "Default Variant", "assets": assets }]);
        }
    }
    body
}

/// `create_personalization_experience`: creates a draft experience.
///
/// Mutating and not idempotent. One token request and one create request
/// per invocation, never retried.
#[derive(Debug, Clone)]
pub struct CreateExperienceOperation {
    client: PersonalizeClient,
}

impl CreateExperienceOperation {
    pub fn new(client: PersonalizeClient) -> Self {
        Self { client }
    }

    async fn run(
        &self,
        arguments: &ValidatedArguments,
        configuration: &ClientConfiguration,
    ) -> Result<Value, PersonalizeError> {
        let token = self.client.fetch_token(configuration).await?;
        let body = draft_flow_body(arguments);
        info!(
            organization = %configuration.organization_id,
            name = %body["name"],
            "Creating personalization experience"
        );
        let created = self.client.create_flow(&token, &body).await?;
        Ok(describe_flow(&created))
    }
}

#[async_trait]
impl ToolExecutor for CreateExperienceOperation {
    async fn invoke(
        &self,
        arguments: &ValidatedArguments,
        configuration: &ClientConfiguration,
    ) -> RemoteResult {
        match self.run(arguments, configuration).await {
            Ok(descriptor) => RemoteResult::Success(descriptor),
            Err(e) => e.into_remote(
                "create experience",
                &[configuration.client_secret.as_str()],
            ),
        }
    }
}

/// `list_personalization_experiences`: read-only listing.
#[derive(Debug, Clone)]
pub struct ListExperiencesOperation {
    client: PersonalizeClient,
}

impl ListExperiencesOperation {
    pub fn new(client: PersonalizeClient) -> Self {
        Self { client }
    }

    async fn run(
        &self,
        arguments: &ValidatedArguments,
        configuration: &ClientConfiguration,
    ) -> Result<Value, PersonalizeError> {
        let limit = arguments.get_i64("limit").unwrap_or(DEFAULT_LIST_LIMIT);
        let token = self.client.fetch_token(configuration).await?;
        let listing = self.client.list_flows(&token, limit).await?;

        let items = listing
            .get("items")
            .and_then(Value::as_array)
            .ok_or_else(|| PersonalizeError::Decode("listing without items".to_string()))?;
        let experiences: Vec<Value> = items.iter().map(describe_flow).collect();
        Ok(json!({ "count": experiences.len(), "experiences": experiences }))
    }
}

#[async_trait]
impl ToolExecutor for ListExperiencesOperation {
    async fn invoke(
        &self,
        arguments: &ValidatedArguments,
        configuration: &ClientConfiguration,
    ) -> RemoteResult {
        match self.run(arguments, configuration).await {
            Ok(listing) => RemoteResult::Success(listing),
            Err(e) => e.into_remote(
                "list experiences",
                &[configuration.client_secret.as_str()],
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FilePersonalizeConfig;
    use crate::personalize::catalogue::{create_experience_schema, list_experiences_schema};
    use assistant_domain::{PlatformProduct, validate};
    use mockito::Matcher;

    fn configuration() -> ClientConfiguration {
        ClientConfiguration::new(PlatformProduct::PersonalizeCdp, "org-1", "client-1", "s3cr3t")
    }

    fn client_for(server: &mockito::Server) -> PersonalizeClient {
        PersonalizeClient::from_config(&FilePersonalizeConfig {
            auth_url: format!("{}/oauth/token", server.url()),
            audience: "aud".to_string(),
            api_base_url: server.url(),
            request_timeout_seconds: 5,
        })
        .unwrap()
    }

    async fn mock_token(server: &mut mockito::Server) -> mockito::Mock {
        server
            .mock("POST", "/oauth/token")
            .with_status(200)
            .with_body(r#"{"access_token":"tok-1"}"#)
            .create_async()
            .await
    }

    #[test]
    fn test_draft_flow_body() {
        let args = validate(
            &create_experience_schema(),
            &json!({
                "name": "Launch",
                "type": "Web",
                "channels": ["Web", "Mobile App"],
                "assets": {"html": "<div></div>", "javascript": "var a = 1;", "css": ""}
            }),
        )
        .unwrap();

        let body = draft_flow_body(&args);
        assert_eq!(body["name"], "Launch");
        assert_eq!(body["type"], "WEB");
        assert_eq!(body["channels"], json!(["WEB", "MOBILE_APP"]));
        assert_eq!(body["status"], "DRAFT");
        assert_eq!(
            body["variants"][0]["assets"],
            json!({"html": "<div></div>", "js": "var a = 1;"})
        );
    }

    #[tokio::test]
    async fn test_create_experience_success() {
        let mut server = mockito::Server::new_async().await;
        mock_token(&mut server).await;
        let create = server
            .mock("POST", "/v3/flows")
            .match_header("authorization", "Bearer tok-1")
            .match_body(Matcher::PartialJson(json!({"name": "Launch", "type": "WEB", "status": "DRAFT"})))
            .with_status(201)
            .with_body(r#"{"ref":"f-1","name":"Launch","type":"WEB","status":"DRAFT","channels":["WEB"],"revision":1}"#)
            .expect(1)
            .create_async()
            .await;

        let args = validate(
            &create_experience_schema(),
            &json!({"name": "Launch", "type": "Web", "channels": ["Web"]}),
        )
        .unwrap();
        let result = CreateExperienceOperation::new(client_for(&server))
            .invoke(&args, &configuration())
            .await;

        assert_eq!(
            result,
            RemoteResult::Success(json!({
                "ref": "f-1", "name": "Launch", "type": "WEB", "status": "DRAFT", "channels": ["WEB"]
            }))
        );
        create.assert_async().await;
    }

    #[tokio::test]
    async fn test_create_experience_failure_is_redacted() {
        let mut server = mockito::Server::new_async().await;
        mock_token(&mut server).await;
        server
            .mock("POST", "/v3/flows")
            .with_status(409)
            .with_body("duplicate name; debug: secret=s3cr3t")
            .create_async()
            .await;

        let args = validate(
            &create_experience_schema(),
            &json!({"name": "Launch", "type": "Web", "channels": ["Web"]}),
        )
        .unwrap();
        let result = CreateExperienceOperation::new(client_for(&server))
            .invoke(&args, &configuration())
            .await;

        match result {
            RemoteResult::Failure(detail) => {
                assert!(detail.contains("409"));
                assert!(detail.contains("duplicate name"));
                assert!(!detail.contains("s3cr3t"));
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_list_experiences_default_limit() {
        let mut server = mockito::Server::new_async().await;
        mock_token(&mut server).await;
        server
            .mock("GET", "/v3/flows")
            .match_query(Matcher::UrlEncoded("limit".into(), "20".into()))
            .with_status(200)
            .with_body(r#"{"items":[{"ref":"f-1","name":"Launch","type":"WEB","status":"DRAFT","schedule":{}}]}"#)
            .create_async()
            .await;

        let args = validate(&list_experiences_schema(), &json!({})).unwrap();
        let result = ListExperiencesOperation::new(client_for(&server))
            .invoke(&args, &configuration())
            .await;

        assert_eq!(
            result,
            RemoteResult::Success(json!({
                "count": 1,
                "experiences": [{"ref": "f-1", "name": "Launch", "type": "WEB", "status": "DRAFT"}]
            }))
        );
    }

    #[tokio::test]
    async fn test_unreachable_platform_is_a_failure_value() {
        let client = PersonalizeClient::from_config(&FilePersonalizeConfig {
            auth_url: "http://127.0.0.1:1/oauth/token".to_string(),
            audience: "aud".to_string(),
            api_base_url: "http://127.0.0.1:1".to_string(),
            request_timeout_seconds: 2,
        })
        .unwrap();

        let args = validate(&list_experiences_schema(), &json!({"limit": 3})).unwrap();
        let result = ListExperiencesOperation::new(client)
            .invoke(&args, &configuration())
            .await;
        assert!(!result.is_success());
    }
}
