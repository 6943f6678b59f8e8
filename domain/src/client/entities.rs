//! Client configuration entities

use crate::core::product::PlatformProduct;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};

/// Placeholder substituted for secret values
pub const REDACTED: &str = "[REDACTED]";

/// Credentials for one platform product, scoped to one tenant.
///
/// Immutable for the duration of a turn. The secret is never serialized.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientConfiguration {
    #[serde(rename = "platformProduct", alias = "product")]
    pub product: PlatformProduct,
    pub organization_id: String,
    pub client_id: String,
    #[serde(skip_serializing, default)]
    pub client_secret: String,
}

impl ClientConfiguration {
    pub fn new(
        product: PlatformProduct,
        organization_id: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        Self {
            product,
            organization_id: organization_id.into(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }

    /// Replace every occurrence of this configuration's secret in `text`.
    pub fn redact(&self, text: &str) -> String {
        crate::util::redact_all(text, [self.client_secret.as_str()])
    }
}

impl std::fmt::Debug for ClientConfiguration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfiguration")
            .field("product", &self.product)
            .field("organization_id", &self.organization_id)
            .field("client_id", &self.client_id)
            .field("client_secret", &REDACTED)
            .finish()
    }
}

/// The set of configurations supplied with one request, keyed by product.
///
/// When two configurations name the same product the later one wins.
#[derive(Debug, Clone, Default)]
pub struct ClientConfigurations {
    by_product: BTreeMap<PlatformProduct, ClientConfiguration>,
}

impl ClientConfigurations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, product: PlatformProduct) -> Option<&ClientConfiguration> {
        self.by_product.get(&product)
    }

    pub fn products(&self) -> BTreeSet<PlatformProduct> {
        self.by_product.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.by_product.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_product.is_empty()
    }

    /// Scrub the secrets of every configuration from `text`.
    pub fn redact(&self, text: &str) -> String {
        self.by_product
            .values()
            .fold(text.to_string(), |acc, config| config.redact(&acc))
    }

    /// Scrub secrets from every string inside a JSON value.
    pub fn redact_value(&self, value: Value) -> Value {
        match value {
            Value::String(s) => Value::String(self.redact(&s)),
            Value::Array(items) => {
                Value::Array(items.into_iter().map(|v| self.redact_value(v)).collect())
            }
            Value::Object(map) => Value::Object(
                map.into_iter()
                    .map(|(k, v)| (k, self.redact_value(v)))
                    .collect(),
            ),
            other => other,
        }
    }
}

impl FromIterator<ClientConfiguration> for ClientConfigurations {
    fn from_iter<I: IntoIterator<Item = ClientConfiguration>>(iter: I) -> Self {
        let by_product = iter.into_iter().map(|c| (c.product, c)).collect();
        Self { by_product }
    }
}
