//! Built-in tool declarations for Sitecore Personalize.

use super::client::PersonalizeClient;
use super::operations::{CreateExperienceOperation, ListExperiencesOperation};
use assistant_application::ToolRegistry;
use assistant_domain::{ArgumentSchema, PlatformProduct, ToolCapability, ToolDeclaration};
use std::sync::Arc;

pub const CREATE_EXPERIENCE: &str = "create_personalization_experience";
pub const LIST_EXPERIENCES: &str = "list_personalization_experiences";

pub const EXPERIENCE_TYPES: [&str; 3] = ["Web", "API", "Triggered"];
pub const EXPERIENCE_CHANNELS: [&str; 6] =
    ["Call Center", "Email", "Mobile App", "Mobile Web", "Web", "SMS"];

pub fn create_experience_schema() -> ArgumentSchema {
    let assets = ArgumentSchema::object()
        .optional(
            "html",
            ArgumentSchema::string()
                .describe("The HTML content for the experience, use pure HTML only."),
        )
        .optional(
            "css",
            ArgumentSchema::string().describe(
                "The CSS content for the experience, do not use precompiled CSS, only pure CSS.",
            ),
        )
        .optional(
            "javascript",
            ArgumentSchema::string().describe(
                "The JS content for the experience which needs to use Nashorn Engine compatible ES5 Javascript.",
            ),
        )
        .optional(
            "freemarker",
            ArgumentSchema::string().describe(
                "This is used to define the API response information using free marker syntax for the experience.",
            ),
        );

    ArgumentSchema::object()
        .required(
            "name",
            ArgumentSchema::string()
                .min_length(1)
                .describe("The name of the personalization experience. Name is required."),
        )
        .required(
            "type",
            ArgumentSchema::one_of(EXPERIENCE_TYPES).describe("The type of the experience."),
        )
        .required(
            "channels",
            ArgumentSchema::array(ArgumentSchema::one_of(EXPERIENCE_CHANNELS))
                .min_items(1)
                .describe("The channels for the experience."),
        )
        .optional("assets", assets)
}

pub fn list_experiences_schema() -> ArgumentSchema {
    ArgumentSchema::object().optional(
        "limit",
        ArgumentSchema::integer()
            .range(1, 100)
            .describe("Maximum number of experiences to return (default 20)."),
    )
}

pub fn create_experience_declaration() -> ToolDeclaration {
    ToolDeclaration::new(
        CREATE_EXPERIENCE,
        "Creates a new personalization experience in Sitecore Personalize.",
        PlatformProduct::PersonalizeCdp,
        ToolCapability::Mutating,
    )
    .with_schema(create_experience_schema())
}

pub fn list_experiences_declaration() -> ToolDeclaration {
    ToolDeclaration::new(
        LIST_EXPERIENCES,
        "Lists existing personalization experiences in Sitecore Personalize.",
        PlatformProduct::PersonalizeCdp,
        ToolCapability::ReadOnly,
    )
    .with_schema(list_experiences_schema())
}

/// The process-wide registry of built-in tools. Built once at startup and
/// shared read-only afterwards.
pub fn builtin_registry(client: PersonalizeClient) -> ToolRegistry {
    ToolRegistry::new()
        .register(
            create_experience_declaration(),
            Arc::new(CreateExperienceOperation::new(client.clone())),
        )
        .register(
            list_experiences_declaration(),
            Arc::new(ListExperiencesOperation::new(client)),
        )
}
