use crate::domain::catalog::ProductFilter;
use crate::domain::platform::PlatformSet;
use crate::domain::product::Product;
use crate::repository::{LinkReader, ProductReader};
use crate::services::catalog::{CatalogState, load_catalog};
use crate::services::{ServiceError, ServiceResult};

/// Assembled products for JSON consumers, filtered like the storefront.
///
/// Unlike the HTML pages a failed reload is reported instead of serving the
/// previous snapshot.
pub async fn list_products<R>(
    query: Option<String>,
    category: Option<String>,
    repo: &R,
    state: &CatalogState,
    platforms: &PlatformSet,
) -> ServiceResult<Vec<Product>>
where
    R: ProductReader + LinkReader,
{
    let load = load_catalog(repo, state, platforms).await?;
    if load.stale {
        return Err(ServiceError::Backend);
    }

    let filter = ProductFilter::storefront(query.unwrap_or_default(), category);
    Ok(load.catalog.filter(&filter))
}
