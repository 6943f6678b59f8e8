//! Products of the asset-management platform.
//!
//! Every tool is bound to exactly one product, and every client
//! configuration carries credentials for exactly one product. The pairing of
//! the two decides which tools the model is allowed to see for a request.

use super::error::DomainError;
use serde::{Deserialize, Serialize};

/// A product of the asset-management platform (Value Object)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PlatformProduct {
    #[serde(rename = "PersonalizeCDP")]
    PersonalizeCdp,
    #[serde(rename = "XMCloud")]
    XmCloud,
    ContentHub,
    Search,
    Send,
}

impl PlatformProduct {
    pub const ALL: [PlatformProduct; 5] = [
        PlatformProduct::PersonalizeCdp,
        PlatformProduct::XmCloud,
        PlatformProduct::ContentHub,
        PlatformProduct::Search,
        PlatformProduct::Send,
    ];

    /// Wire name, identical to the serde representation
    pub fn as_str(&self) -> &'static str {
        match self {
            PlatformProduct::PersonalizeCdp => "PersonalizeCDP",
            PlatformProduct::XmCloud => "XMCloud",
            PlatformProduct::ContentHub => "ContentHub",
            PlatformProduct::Search => "Search",
            PlatformProduct::Send => "Send",
        }
    }
}

impl std::fmt::Display for PlatformProduct {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for PlatformProduct {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PlatformProduct::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| DomainError::UnknownProduct(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_names_match_serde() {
        for product in PlatformProduct::ALL {
            let json = serde_json::to_string(&product).unwrap();
            assert_eq!(json, format!("\"{}\"", product.as_str()));
        }
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(
            "personalizecdp".parse::<PlatformProduct>().unwrap(),
            PlatformProduct::PersonalizeCdp
        );
        assert!(matches!(
            "Marketplace".parse::<PlatformProduct>(),
            Err(DomainError::UnknownProduct(_))
        ));
    }
}
