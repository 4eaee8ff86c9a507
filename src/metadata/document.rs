//! Product metadata documents.
//!
//! The document pinned for each minted token follows the common ERC-721
//! metadata layout: a name, a description, an image, and a list of
//! `{trait_type, value}` attributes.

use super::uri::Gateway;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Attribute recording the product hash.
pub const PRODUCT_HASH_TRAIT: &str = "Product Hash";
/// Attribute recording the authentication status at mint time.
pub const AUTH_STATUS_TRAIT: &str = "Authentication Status";
/// Attribute recording the mint timestamp.
pub const MINTED_ON_TRAIT: &str = "Minted On";

/// One `{trait_type, value}` entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attribute {
    /// Attribute name.
    pub trait_type: String,
    /// Attribute value; strings in documents built here, anything in the wild.
    pub value: Value,
}

/// Typed view of a product metadata document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductMetadata {
    /// Product name.
    #[serde(default)]
    pub name: Option<String>,
    /// Human-readable description.
    #[serde(default)]
    pub description: Option<String>,
    /// Image reference, `ipfs://` or HTTP(S).
    #[serde(default)]
    pub image: Option<String>,
    /// Product attributes.
    #[serde(default)]
    pub attributes: Vec<Attribute>,
}

impl ProductMetadata {
    /// Build the document for a product about to be minted.
    ///
    /// An `ipfs://` image is rewritten to a gateway URL so that wallets
    /// without IPFS support can display it.
    #[must_use]
    pub fn for_product(
        name: &str,
        product_hash: &str,
        image: &str,
        gateway: &Gateway,
        minted_on: DateTime<Utc>,
    ) -> Self {
        Self {
            name: Some(name.to_string()),
            description: Some(format!("Luxury Authentication NFT for {name}")),
            image: Some(gateway.translate(image)),
            attributes: vec![
                Attribute {
                    trait_type: PRODUCT_HASH_TRAIT.to_string(),
                    value: Value::String(product_hash.to_string()),
                },
                Attribute {
                    trait_type: AUTH_STATUS_TRAIT.to_string(),
                    value: Value::String("Verified".to_string()),
                },
                Attribute {
                    trait_type: MINTED_ON_TRAIT.to_string(),
                    value: Value::String(minted_on.to_rfc3339_opts(SecondsFormat::Millis, true)),
                },
            ],
        }
    }

    /// Interpret an arbitrary JSON document, if it is an object.
    #[must_use]
    pub fn from_document(document: &Value) -> Option<Self> {
        if !document.is_object() {
            return None;
        }
        serde_json::from_value(document.clone()).ok()
    }

    /// Value of the named attribute.
    #[must_use]
    pub fn attribute(&self, trait_type: &str) -> Option<&Value> {
        self.attributes
            .iter()
            .find(|a| a.trait_type == trait_type)
            .map(|a| &a.value)
    }

    /// Product hash recorded in the document, if present.
    #[must_use]
    pub fn product_hash(&self) -> Option<&str> {
        self.attribute(PRODUCT_HASH_TRAIT).and_then(Value::as_str)
    }

    /// Fetchable image URL.
    #[must_use]
    pub fn image_url(&self, gateway: &Gateway) -> Option<String> {
        self.image.as_deref().map(|image| gateway.translate(image))
    }
}
