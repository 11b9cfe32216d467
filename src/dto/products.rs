use serde::Serialize;

use crate::domain::platform::{PlatformLinks, PlatformSet};
use crate::domain::product::Product;

/// A filled marketplace slot, rendered as a "buy on" link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkBadge {
    pub key: String,
    pub label: String,
    pub url: String,
}

/// One product as shown in the storefront grid and the admin list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductRow {
    pub id: u64,
    pub title: String,
    pub sku: String,
    pub image: Option<String>,
    pub category: String,
    pub price: String,
    pub links: Vec<LinkBadge>,
    pub slots: usize,
}

impl ProductRow {
    pub fn new(product: &Product, platforms: &PlatformSet) -> Self {
        let links = platforms
            .iter()
            .filter_map(|platform| {
                product
                    .platform_links
                    .get(platform.key.as_str())
                    .filter(|url| !url.is_empty())
                    .map(|url| LinkBadge {
                        key: platform.key.to_string(),
                        label: platform.label.to_string(),
                        url: url.to_string(),
                    })
            })
            .collect();

        Self {
            id: product.id.get(),
            title: product.title.clone(),
            sku: product.primary_sku().unwrap_or("N/A").to_string(),
            image: product.primary_image().map(str::to_string),
            category: product.category.clone(),
            price: product
                .variants
                .first()
                .map(|variant| variant.price.clone())
                .unwrap_or_default(),
            links,
            slots: platforms.len(),
        }
    }
}

/// One input of the edit form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkField {
    pub key: String,
    pub label: String,
    pub url: String,
    pub placeholder: String,
}

/// Edit form fields in configuration order, prefilled from `links`.
pub fn link_fields(links: &PlatformLinks, platforms: &PlatformSet) -> Vec<LinkField> {
    platforms
        .iter()
        .map(|platform| LinkField {
            key: platform.key.to_string(),
            label: platform.label.to_string(),
            url: links
                .get(platform.key.as_str())
                .unwrap_or_default()
                .to_string(),
            placeholder: platform.sample_url(),
        })
        .collect()
}
