//! Catalog assembly and filtering.

use std::collections::{BTreeSet, HashMap};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::platform::{PlatformLinks, PlatformSet};
use crate::domain::product::Product;
use crate::domain::types::ProductId;

/// Category selector value that disables category filtering.
pub const ALL_CATEGORIES: &str = "All";

/// Link record as stored by the link store, before normalization.
pub type RawLinkRecord = HashMap<String, Option<String>>;

/// Joins products with the link store by identifier.
///
/// Every product keeps its position. A product without a stored record gets
/// an all-empty one, and stored records are normalized to the configured
/// slots.
pub fn assemble_products(
    products: Vec<Product>,
    links: &HashMap<String, RawLinkRecord>,
    platforms: &PlatformSet,
) -> Vec<Product> {
    products
        .into_iter()
        .map(|mut product| {
            product.platform_links = match links.get(&product.id.to_string()) {
                Some(record) => platforms.normalize(
                    record
                        .iter()
                        .map(|(key, url)| (key, url.clone().unwrap_or_default())),
                ),
                None => platforms.empty_links(),
            };
            product
        })
        .collect()
}

/// Narrowing criteria for a product list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProductFilter {
    pub query: String,
    pub category: Option<String>,
    /// Whether the query is also matched against the category label.
    pub match_category: bool,
}

impl ProductFilter {
    /// Storefront filter: query over title, SKU and category plus a category
    /// selector.
    pub fn storefront(query: impl Into<String>, category: Option<String>) -> Self {
        Self {
            query: query.into(),
            category,
            match_category: true,
        }
    }

    /// Admin filter: query over title and SKU only.
    pub fn admin(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            category: None,
            match_category: false,
        }
    }

    pub fn matches(&self, product: &Product) -> bool {
        match self.category.as_deref() {
            Some(category) if category != ALL_CATEGORIES && product.category != category => {
                return false;
            }
            _ => {}
        }

        if self.query.trim().is_empty() {
            return true;
        }

        let term = self.query.to_lowercase();
        product.title.to_lowercase().contains(&term)
            || product.variants.iter().any(|variant| {
                variant
                    .sku
                    .as_deref()
                    .is_some_and(|sku| sku.to_lowercase().contains(&term))
            })
            || (self.match_category && product.category.to_lowercase().contains(&term))
    }
}

/// Products accepted by `filter`, in source order.
pub fn filter_products(products: &[Product], filter: &ProductFilter) -> Vec<Product> {
    products
        .iter()
        .filter(|product| filter.matches(product))
        .cloned()
        .collect()
}

/// Assembled product list plus the moment it was fetched.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: Vec<Product>,
    loaded_at: Option<DateTime<Utc>>,
}

impl Catalog {
    pub fn assemble(
        products: Vec<Product>,
        links: &HashMap<String, RawLinkRecord>,
        platforms: &PlatformSet,
        loaded_at: DateTime<Utc>,
    ) -> Self {
        Self {
            products: assemble_products(products, links, platforms),
            loaded_at: Some(loaded_at),
        }
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn loaded_at(&self) -> Option<DateTime<Utc>> {
        self.loaded_at
    }

    /// Whether a load ever succeeded.
    pub fn is_loaded(&self) -> bool {
        self.loaded_at.is_some()
    }

    pub fn find(&self, id: ProductId) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }


    /// Replaces one product's record. Returns `false` if the product is not
    /// in the catalog.
    pub fn replace_links(&mut self, id: ProductId, links: PlatformLinks) -> bool {
        match self.products.iter_mut().find(|p| p.id == id) {
            Some(product) => {
                product.platform_links = links;
                true
            }
            None => false,
        }
    }

    /// `All` followed by the distinct categories in sorted order.
    pub fn categories(&self) -> Vec<String> {
        let unique = self
            .products
            .iter()
            .map(|p| p.category.clone())
            .collect::<BTreeSet<_>>();
        std::iter::once(ALL_CATEGORIES.to_string())
            .chain(unique)
            .collect()
    }

    pub fn filter(&self, filter: &ProductFilter) -> Vec<Product> {
        filter_products(&self.products, filter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::product::Variant;

    fn product(id: u64, title: &str, category: &str, skus: &[&str]) -> Product {
        Product {
            id: ProductId::new(id).unwrap(),
            title: title.to_string(),
            description: None,
            images: vec![],
            variants: skus
                .iter()
                .map(|sku| Variant {
                    id: None,
                    title: "Default".into(),
                    price: "10.00".into(),
                    sku: Some(sku.to_string()),
                })
                .collect(),
            category: category.to_string(),
            collections: vec![],
            platform_links: PlatformLinks::default(),
        }
    }

    fn sample_products() -> Vec<Product> {
        vec![
            product(1, "Modern Pendant Light", "Pendant Lights", &["PEND-001-CHR"]),
            product(2, "Crystal Chandelier", "Chandeliers", &["CHAN-002"]),
            product(3, "Brass Wall Sconce", "Wall Lights", &["SCON-003"]),
        ]
    }

    #[test]
    fn assembly_fills_every_configured_key() {
        let platforms = PlatformSet::extended();
        let mut links = HashMap::new();
        links.insert(
            "2".to_string(),
            RawLinkRecord::from([
                ("amazon1".to_string(), Some("https://amazon.com/dp/2".to_string())),
                ("legacy".to_string(), Some("https://old.example".to_string())),
                ("wf1".to_string(), None),
            ]),
        );

        let assembled = assemble_products(sample_products(), &links, &platforms);

        assert_eq!(assembled.len(), 3);
        for product in &assembled {
            let keys = product
                .platform_links
                .keys()
                .map(|k| k.as_str())
                .collect::<Vec<_>>();
            let expected = platforms.empty_links();
            let expected = expected.keys().map(|k| k.as_str()).collect::<Vec<_>>();
            assert_eq!(keys, expected);
        }
        assert_eq!(
            assembled[1].platform_links.get("amazon1"),
            Some("https://amazon.com/dp/2")
        );
        assert_eq!(assembled[1].platform_links.get("wf1"), Some(""));
        assert_eq!(assembled[0].platform_links.filled_count(), 0);
    }

    #[test]
    fn empty_query_returns_list_unchanged() {
        let products = sample_products();
        let filtered = filter_products(&products, &ProductFilter::admin("   "));
        assert_eq!(filtered, products);
    }

    #[test]
    fn query_matches_title_sku_and_category() {
        let products = sample_products();

        let by_title = filter_products(&products, &ProductFilter::admin("crystal"));
        assert_eq!(by_title.len(), 1);
        assert_eq!(by_title[0].id.get(), 2);

        let by_sku = filter_products(&products, &ProductFilter::admin("pend-001"));
        assert_eq!(by_sku[0].id.get(), 1);

        let admin_by_category = filter_products(&products, &ProductFilter::admin("wall lights"));
        assert!(admin_by_category.is_empty());

        let storefront_by_category =
            filter_products(&products, &ProductFilter::storefront("wall lights", None));
        assert_eq!(storefront_by_category.len(), 1);
    }

    #[test]
    fn category_selector_requires_exact_match() {
        let products = sample_products();
        let filter = ProductFilter::storefront("", Some("Chandeliers".into()));
        let filtered = filter_products(&products, &filter);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].id.get(), 2);

        let all = ProductFilter::storefront("", Some(ALL_CATEGORIES.into()));
        assert_eq!(filter_products(&products, &all).len(), 3);
    }

    #[test]
    fn filtering_is_idempotent() {
        let products = sample_products();
        let filter = ProductFilter::storefront("l", Some("Pendant Lights".into()));
        let once = filter_products(&products, &filter);
        let twice = filter_products(&once, &filter);
        assert_eq!(once, twice);
    }

    #[test]
    fn categories_are_sorted_after_all() {
        let catalog = Catalog::assemble(
            sample_products(),
            &HashMap::new(),
            &PlatformSet::standard(),
            Utc::now(),
        );
        assert_eq!(
            catalog.categories(),
            vec!["All", "Chandeliers", "Pendant Lights", "Wall Lights"]
        );
    }

    #[test]
    fn replace_links_targets_one_product() {
        let platforms = PlatformSet::standard();
        let mut catalog =
            Catalog::assemble(sample_products(), &HashMap::new(), &platforms, Utc::now());
        let links = platforms.normalize([("target", "https://target.com/p/3")]);

        assert!(catalog.replace_links(ProductId::new(3).unwrap(), links.clone()));
        assert!(!catalog.replace_links(ProductId::new(99).unwrap(), links.clone()));
        assert_eq!(
            catalog.find(ProductId::new(3).unwrap()).unwrap().platform_links,
            links
        );
    }
}
