//! Catalog loading and the process-wide catalog snapshot.

use std::sync::{Arc, RwLock};

use chrono::Utc;
use futures_util::future::join;
use serde::Serialize;

use crate::domain::catalog::{ALL_CATEGORIES, Catalog, ProductFilter};
use crate::domain::platform::{PlatformLinks, PlatformSet};
use crate::domain::types::ProductId;
use crate::dto::products::ProductRow;
use crate::repository::{LinkReader, ProductReader};
use crate::services::{ServiceError, ServiceResult};

/// Last successfully assembled catalog, shared by all workers.
///
/// The lock only guards swapping the `Arc`; readers clone the `Arc` and
/// release the lock before doing any work.
#[derive(Debug, Default)]
pub struct CatalogState {
    inner: RwLock<Arc<Catalog>>,
}

impl CatalogState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> ServiceResult<Arc<Catalog>> {
        match self.inner.read() {
            Ok(catalog) => Ok(Arc::clone(&catalog)),
            Err(e) => {
                log::error!("Failed to read catalog snapshot: {e}");
                Err(ServiceError::Internal)
            }
        }
    }

    pub fn replace(&self, catalog: Catalog) -> ServiceResult<Arc<Catalog>> {
        let catalog = Arc::new(catalog);
        match self.inner.write() {
            Ok(mut current) => {
                *current = Arc::clone(&catalog);
                Ok(catalog)
            }
            Err(e) => {
                log::error!("Failed to replace catalog snapshot: {e}");
                Err(ServiceError::Internal)
            }
        }
    }

    /// Replaces one product's record in the snapshot. Returns `false` if the
    /// product is not part of it.
    pub fn replace_links(&self, product_id: ProductId, links: PlatformLinks) -> ServiceResult<bool> {
        match self.inner.write() {
            Ok(mut current) => Ok(Arc::make_mut(&mut current).replace_links(product_id, links)),
            Err(e) => {
                log::error!("Failed to update catalog snapshot: {e}");
                Err(ServiceError::Internal)
            }
        }
    }
}

/// Result of a catalog load.
#[derive(Debug, Clone)]
pub struct CatalogLoad {
    pub catalog: Arc<Catalog>,
    /// The backend could not be reached and `catalog` is the previous
    /// snapshot, empty if no load ever succeeded.
    pub stale: bool,
}

/// Fetches products and link records concurrently, assembles them and
/// stores the result as the new snapshot.
///
/// A failed fetch is not an error: the previous snapshot is returned with
/// `stale` set so the page can still render.
pub async fn load_catalog<R>(
    repo: &R,
    state: &CatalogState,
    platforms: &PlatformSet,
) -> ServiceResult<CatalogLoad>
where
    R: ProductReader + LinkReader,
{
    let (products, links) = join(repo.list_products(), repo.list_links()).await;

    match (products, links) {
        (Ok(products), Ok(links)) => {
            let catalog = Catalog::assemble(products, &links, platforms, Utc::now());
            log::info!(
                "Loaded catalog with {} products and {} link records",
                catalog.products().len(),
                links.len()
            );
            Ok(CatalogLoad {
                catalog: state.replace(catalog)?,
                stale: false,
            })
        }
        (Err(e), _) | (_, Err(e)) => {
            log::error!("Failed to load catalog: {e}");
            Ok(CatalogLoad {
                catalog: state.snapshot()?,
                stale: true,
            })
        }
    }
}

/// Current snapshot, loading it first if no load succeeded yet.
pub async fn ensure_catalog<R>(
    repo: &R,
    state: &CatalogState,
    platforms: &PlatformSet,
) -> ServiceResult<Arc<Catalog>>
where
    R: ProductReader + LinkReader,
{
    let catalog = state.snapshot()?;
    if catalog.is_loaded() {
        return Ok(catalog);
    }

    let load = load_catalog(repo, state, platforms).await?;
    if load.catalog.is_loaded() {
        Ok(load.catalog)
    } else {
        Err(ServiceError::Backend)
    }
}

#[derive(Debug, Serialize)]
pub struct StorefrontPage {
    pub products: Vec<ProductRow>,
    pub categories: Vec<String>,
    pub query: String,
    pub category: String,
    pub stale: bool,
}

/// Reloads the catalog and filters it for the public grid.
pub async fn show_storefront<R>(
    query: Option<String>,
    category: Option<String>,
    repo: &R,
    state: &CatalogState,
    platforms: &PlatformSet,
) -> ServiceResult<StorefrontPage>
where
    R: ProductReader + LinkReader,
{
    let load = load_catalog(repo, state, platforms).await?;
    let query = query.unwrap_or_default();
    let category = category
        .filter(|c| !c.trim().is_empty())
        .unwrap_or_else(|| ALL_CATEGORIES.to_string());

    let filter = ProductFilter::storefront(query.clone(), Some(category.clone()));
    let products = load
        .catalog
        .filter(&filter)
        .iter()
        .map(|product| ProductRow::new(product, platforms))
        .collect();

    Ok(StorefrontPage {
        products,
        categories: load.catalog.categories(),
        query,
        category,
        stale: load.stale,
    })
}

#[derive(Debug, Serialize)]
pub struct AdminProductsPage {
    pub products: Vec<ProductRow>,
    pub query: String,
    pub total: usize,
    pub loaded_at: Option<String>,
    pub stale: bool,
}

/// Reloads the catalog and filters it by title and SKU for the admin list.
pub async fn show_admin_products<R>(
    query: Option<String>,
    repo: &R,
    state: &CatalogState,
    platforms: &PlatformSet,
) -> ServiceResult<AdminProductsPage>
where
    R: ProductReader + LinkReader,
{
    let load = load_catalog(repo, state, platforms).await?;
    let query = query.unwrap_or_default();

    let products = load
        .catalog
        .filter(&ProductFilter::admin(query.clone()))
        .iter()
        .map(|product| ProductRow::new(product, platforms))
        .collect();

    Ok(AdminProductsPage {
        products,
        query,
        total: load.catalog.products().len(),
        loaded_at: load
            .catalog
            .loaded_at()
            .map(|at| at.format("%Y-%m-%d %H:%M:%S UTC").to_string()),
        stale: load.stale,
    })
}
