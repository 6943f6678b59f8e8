//! Prompt domain
//!
//! The system prompt prepended to every model request. It is never stored in
//! the [`Conversation`](crate::session::entities::Conversation).

use crate::core::product::PlatformProduct;
use std::collections::BTreeSet;

/// System prompt for the asset assistant
pub struct AssistantPrompt;

impl AssistantPrompt {
    /// Build the system prompt for a turn.
    ///
    /// `configured` is the set of products the caller supplied credentials
    /// for; the model is told which ones it can act on.
    pub fn system(configured: &BTreeSet<PlatformProduct>) -> String {
        let products = if configured.is_empty() {
            "none (ask the user to add a client configuration before creating anything)".to_string()
        } else {
            configured
                .iter()
                .map(|p| p.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        };

        format!(
            r#"You are a friendly Sitecore Assistant that helps users create Sitecore assets in the Sitecore SaaS products.

Here's the typical flow:
1. Determine the type of product the user wants to create assets for
2. Suggest inputs for the required products and the steps to create them
3. Help the user fill in those inputs
4. Confirm the assets are correct and then create them

Products with credentials for this conversation: {products}

Only call tools that are offered to you. If a tool reports an argument error, fix the arguments and call it again. If a tool reports that an operation failed, tell the user and do not repeat it unless they ask.

When a Sitecore Personalize API requires code, always write ECMAScript 5 JavaScript that works with the server-side Nashorn JavaScript engine."#
        )
    }
}
