use serde::{Deserialize, Serialize};

use crate::domain::platform::PlatformLinks;
use crate::domain::types::ProductId;

/// Product image reference as delivered by the catalog source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRef {
    pub src: String,
}

/// A purchasable option of a product (color, size, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variant {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub title: String,
    /// Price as a decimal string, the way the store reports it.
    #[serde(default)]
    pub price: String,
    #[serde(default)]
    pub sku: Option<String>,
}

/// Store collection a product is listed in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collection {
    pub id: u64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub handle: String,
}

/// A catalog product joined with its marketplace links.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub images: Vec<ImageRef>,
    #[serde(default)]
    pub variants: Vec<Variant>,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub collections: Vec<Collection>,
    /// Filled in by catalog assembly; anything the catalog source sends here
    /// is ignored.
    #[serde(default, skip_deserializing, rename = "platformLinks")]
    pub platform_links: PlatformLinks,
}

impl Product {
    /// SKU of the first variant, the one shown next to the title.
    pub fn primary_sku(&self) -> Option<&str> {
        self.variants.first().and_then(|v| v.sku.as_deref())
    }

    pub fn primary_image(&self) -> Option<&str> {
        self.images.first().map(|image| image.src.as_str())
    }

    /// Whether any variant carries exactly `sku`.
    pub fn has_variant_sku(&self, sku: &str) -> bool {
        self.variants.iter().any(|v| v.sku.as_deref() == Some(sku))
    }
}
