//! Inbound chat request body.

use super::routes::ApiError;
use assistant_application::RunTurnInput;
use assistant_domain::{ClientConfiguration, ClientConfigurations, Message};
use serde::Deserialize;

/// `POST /api/chat` body.
///
/// Accepts the current shape (`messages`, `clientConfigurations`) as well as
/// the older one (`history`, `clients`, a trailing `message`, and `sender`
/// in place of `role`).
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatBody {
    #[serde(default, alias = "history")]
    pub messages: Vec<InboundMessage>,
    /// Appended as a final user message
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default, alias = "clients")]
    pub client_configurations: Vec<ClientConfiguration>,
}

#[derive(Debug, Deserialize)]
pub struct InboundMessage {
    #[serde(alias = "sender")]
    pub role: InboundRole,
    pub content: String,
}

/// Clients may only speak as the user or replay earlier assistant text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InboundRole {
    User,
    Assistant,
}

impl ChatBody {
    pub fn into_input(self) -> Result<RunTurnInput, ApiError> {
        let mut messages: Vec<Message> = self
            .messages
            .into_iter()
            .map(|m| match m.role {
                InboundRole::User => Message::user(m.content),
                InboundRole::Assistant => Message::assistant(m.content),
            })
            .collect();

        if let Some(text) = self.message.filter(|t| !t.trim().is_empty()) {
            messages.push(Message::user(text));
        }
        if messages.is_empty() {
            return Err(ApiError::BadRequest("messages must not be empty".to_string()));
        }

        let configurations: ClientConfigurations =
            self.client_configurations.into_iter().collect();
        Ok(RunTurnInput::new(messages, configurations))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assistant_domain::{PlatformProduct, Role};
    use serde_json::json;

    #[test]
    fn test_current_shape() {
        let body: ChatBody = serde_json::from_value(json!({
            "messages": [{"role": "user", "content": "create a web experience named Launch"}],
            "clientConfigurations": [{
                "platformProduct": "PersonalizeCDP",
                "organizationId": "org",
                "clientId": "id",
                "clientSecret": "secret"
            }]
        }))
        .unwrap();

        let input = body.into_input().unwrap();
        assert_eq!(input.messages.len(), 1);
        assert!(input.configurations.get(PlatformProduct::PersonalizeCdp).is_some());
    }

    #[test]
    fn test_legacy_shape() {
        let body: ChatBody = serde_json::from_value(json!({
            "history": [
                {"sender": "user", "content": "hi"},
                {"sender": "assistant", "content": "hello"}
            ],
            "message": "list my experiences",
            "clients": [{
                "product": "PersonalizeCDP",
                "organizationId": "org",
                "clientId": "id",
                "clientSecret": "secret"
            }]
        }))
        .unwrap();

        let input = body.into_input().unwrap();
        let roles: Vec<Role> = input.messages.iter().map(|m| m.role).collect();
        assert_eq!(roles, vec![Role::User, Role::Assistant, Role::User]);
        assert_eq!(input.messages[2].content, "list my experiences");
        assert_eq!(input.configurations.len(), 1);
    }

    #[test]
    fn test_tool_role_is_rejected() {
        let parsed: Result<ChatBody, _> = serde_json::from_value(json!({
            "messages": [{"role": "tool", "content": "{}"}]
        }));
        assert!(parsed.is_err());
    }

    #[test]
    fn test_empty_request() {
        let body: ChatBody = serde_json::from_value(json!({"message": "  "})).unwrap();
        assert!(matches!(body.into_input(), Err(ApiError::BadRequest(_))));
    }
}
