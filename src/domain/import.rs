//! Bulk link import: turns a header row plus data rows into one link record
//! per matched product.
//!
//! Policies:
//! - the SKU column is the first header containing `sku` or `id`, else column 0;
//! - for every marketplace the first matching header in scan order wins;
//! - rows with fewer than [`MIN_ROW_FIELDS`] fields are skipped;
//! - rows whose SKU matches no product variant are skipped without error;
//! - a matched row always yields a full record, even if every slot is empty;
//! - a later row for the same product replaces the earlier record.

use std::collections::BTreeMap;

use crate::domain::platform::{PlatformLinks, PlatformSet};
use crate::domain::product::Product;
use crate::domain::types::{PlatformKey, ProductId};

/// Rows shorter than this are ignored.
pub const MIN_ROW_FIELDS: usize = 2;

/// Meaning of each header column, resolved once per upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderLayout {
    sku_column: usize,
    columns: Vec<(PlatformKey, usize)>,
}

impl HeaderLayout {
    pub fn resolve<S: AsRef<str>>(headers: &[S], platforms: &PlatformSet) -> Self {
        let headers = headers
            .iter()
            .map(|header| header.as_ref().trim().to_lowercase())
            .collect::<Vec<_>>();

        let sku_column = headers
            .iter()
            .position(|header| header.contains("sku") || header.contains("id"))
            .unwrap_or(0);

        let columns = platforms
            .iter()
            .filter_map(|platform| {
                headers
                    .iter()
                    .position(|header| platform.matches_header(header))
                    .map(|column| (platform.key.clone(), column))
            })
            .collect();

        Self {
            sku_column,
            columns,
        }
    }

    pub fn sku_column(&self) -> usize {
        self.sku_column
    }

    /// Column feeding the marketplace `key`, if any header matched it.
    pub fn column_for(&self, key: &str) -> Option<usize> {
        self.columns
            .iter()
            .find(|(platform, _)| platform.as_str() == key)
            .map(|(_, column)| *column)
    }

    /// Number of marketplaces that found a column.
    pub fn matched_platforms(&self) -> usize {
        self.columns.len()
    }
}

/// Outcome of reconciling an upload against the catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportPlan {
    /// Records to submit, keyed by product identifier.
    pub links: BTreeMap<ProductId, PlatformLinks>,
    /// Data rows read, header excluded.
    pub rows_total: usize,
    /// Marketplaces that found a header column.
    pub platforms_matched: usize,
    /// Rows dropped for having fewer than [`MIN_ROW_FIELDS`] fields.
    pub rows_short: usize,
    /// Rows whose SKU matched no product.
    pub rows_unmatched: usize,
}

/// Reconciles `records` (header row first) against `products`.
pub fn reconcile<S: AsRef<str>>(
    records: &[Vec<S>],
    products: &[Product],
    platforms: &PlatformSet,
) -> ImportPlan {
    let Some((headers, rows)) = records.split_first() else {
        return ImportPlan::default();
    };

    let layout = HeaderLayout::resolve(headers, platforms);
    let mut plan = ImportPlan {
        rows_total: rows.len(),
        platforms_matched: layout.matched_platforms(),
        ..ImportPlan::default()
    };

    for row in rows {
        let values = row
            .iter()
            .map(|value| value.as_ref().trim())
            .collect::<Vec<_>>();
        if values.len() < MIN_ROW_FIELDS {
            plan.rows_short += 1;
            continue;
        }

        let product = values
            .get(layout.sku_column())
            .and_then(|sku| products.iter().find(|p| p.has_variant_sku(sku)));
        let Some(product) = product else {
            plan.rows_unmatched += 1;
            continue;
        };

        let mut links = platforms.empty_links();
        for platform in platforms.iter() {
            let key = platform.key.as_str();
            let value = layout
                .column_for(key)
                .and_then(|column| values.get(column))
                .filter(|value| !value.is_empty());
            if let Some(value) = value {
                links.set(key, *value);
            }
        }

        plan.links.insert(product.id, links);
    }

    plan
}
