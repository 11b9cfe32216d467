use chrono::Utc;
use serde::Serialize;

use crate::domain::platform::{PlatformLinks, PlatformSet};
use crate::domain::types::ProductId;
use crate::dto::products::{LinkField, ProductRow, link_fields};
use crate::forms::links::EditLinksForm;
use crate::repository::{LinkReader, LinkWriter, ProductReader};
use crate::services::catalog::{CatalogState, ensure_catalog};
use crate::services::{ServiceError, ServiceResult};

fn parse_product_id(product_id: u64) -> ServiceResult<ProductId> {
    ProductId::new(product_id).map_err(|e| {
        log::warn!("Rejected product id {product_id}: {e}");
        ServiceError::NotFound
    })
}

#[derive(Debug, Serialize)]
pub struct EditLinksPage {
    pub product: ProductRow,
    pub fields: Vec<LinkField>,
}

/// Edit form of one product, prefilled from the catalog snapshot.
pub async fn show_edit_links<R>(
    product_id: u64,
    repo: &R,
    state: &CatalogState,
    platforms: &PlatformSet,
) -> ServiceResult<EditLinksPage>
where
    R: ProductReader + LinkReader,
{
    let product_id = parse_product_id(product_id)?;
    let catalog = ensure_catalog(repo, state, platforms).await?;

    let Some(product) = catalog.find(product_id) else {
        return Err(ServiceError::NotFound);
    };

    Ok(EditLinksPage {
        product: ProductRow::new(product, platforms),
        fields: link_fields(&product.platform_links, platforms),
    })
}

/// What happened to a submitted record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveOutcome {
    /// The backend accepted the record.
    pub saved: bool,
    /// Number of slots holding a URL in the submitted record.
    pub filled: usize,
    pub saved_at: String,
}

/// Sends the full record of one product to the backend.
///
/// On success the snapshot entry is replaced with exactly the submitted
/// record; when the backend refuses it the snapshot stays untouched.
pub async fn save_product_links<R>(
    product_id: u64,
    form: EditLinksForm,
    repo: &R,
    state: &CatalogState,
    platforms: &PlatformSet,
) -> ServiceResult<SaveOutcome>
where
    R: LinkWriter,
{
    let product_id = parse_product_id(product_id)?;
    if state.snapshot()?.find(product_id).is_none() {
        return Err(ServiceError::NotFound);
    }

    let links = form.into_links(platforms)?;
    let filled = links.filled_count();

    let saved = match repo.update_links(product_id, &links).await {
        Ok(saved) => saved,
        Err(e) => {
            log::error!("Failed to save links for product {product_id}: {e}");
            return Err(ServiceError::Backend);
        }
    };

    if !saved {
        log::warn!("Backend refused links for product {product_id}");
    } else if !state.replace_links(product_id, links)? {
        log::warn!("Product {product_id} left the catalog snapshot while saving");
    }

    Ok(SaveOutcome {
        saved,
        filled,
        saved_at: Utc::now().format("%H:%M:%S").to_string(),
    })
}

/// Stored record of one product, normalized to the configured slots.
pub async fn get_product_links<R>(
    product_id: u64,
    repo: &R,
    platforms: &PlatformSet,
) -> ServiceResult<PlatformLinks>
where
    R: LinkReader,
{
    let product_id = parse_product_id(product_id)?;

    match repo.get_links(product_id).await {
        Ok(record) => Ok(platforms.normalize(
            record
                .into_iter()
                .map(|(key, url)| (key, url.unwrap_or_default())),
        )),
        Err(e) => {
            log::error!("Failed to fetch links for product {product_id}: {e}");
            Err(e.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::domain::catalog::RawLinkRecord;
    use crate::repository::test::sample_repository;
    use crate::services::catalog::load_catalog;

    fn form(fields: &[(&str, &str)]) -> EditLinksForm {
        EditLinksForm {
            links: fields
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect::<HashMap<_, _>>(),
        }
    }

    #[actix_web::test]
    async fn edit_form_loads_catalog_on_first_visit() {
        let state = CatalogState::new();
        let platforms = PlatformSet::standard();

        let page = show_edit_links(2, &sample_repository(), &state, &platforms)
            .await
            .unwrap();

        assert_eq!(page.product.title, "Crystal Chandelier");
        assert_eq!(page.fields.len(), platforms.len());
        assert!(page.fields.iter().all(|field| field.url.is_empty()));
        assert!(state.snapshot().unwrap().is_loaded());
    }

    #[actix_web::test]
    async fn edit_form_for_unknown_product_is_not_found() {
        let state = CatalogState::new();
        let platforms = PlatformSet::standard();
        let repo = sample_repository();

        assert_eq!(
            show_edit_links(99, &repo, &state, &platforms).await.unwrap_err(),
            ServiceError::NotFound
        );
        assert_eq!(
            show_edit_links(0, &repo, &state, &platforms).await.unwrap_err(),
            ServiceError::NotFound
        );
    }

    #[actix_web::test]
    async fn saved_record_is_shown_on_reopen() {
        let state = CatalogState::new();
        let platforms = PlatformSet::standard();
        let repo = sample_repository();
        load_catalog(&repo, &state, &platforms).await.unwrap();

        let outcome = save_product_links(
            3,
            form(&[
                ("amazon", "https://amazon.com/dp/3"),
                ("lowes", " https://lowes.com/pd/3 "),
            ]),
            &repo,
            &state,
            &platforms,
        )
        .await
        .unwrap();

        assert!(outcome.saved);
        assert_eq!(outcome.filled, 2);

        let updates = repo.single_updates();
        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0].1.len(), platforms.len());

        let page = show_edit_links(3, &repo, &state, &platforms)
            .await
            .unwrap();
        let lowes = page.fields.iter().find(|f| f.key == "lowes").unwrap();
        assert_eq!(lowes.url, "https://lowes.com/pd/3");
        assert_eq!(
            state
                .snapshot()
                .unwrap()
                .find(ProductId::new(3).unwrap())
                .unwrap()
                .platform_links,
            updates[0].1
        );
    }

    #[actix_web::test]
    async fn refused_save_leaves_snapshot_unchanged() {
        let state = CatalogState::new();
        let platforms = PlatformSet::standard();
        let repo = sample_repository().rejecting();
        load_catalog(&repo, &state, &platforms).await.unwrap();

        let outcome = save_product_links(
            1,
            form(&[("amazon", "https://amazon.com/dp/1")]),
            &repo,
            &state,
            &platforms,
        )
        .await
        .unwrap();

        assert!(!outcome.saved);
        let snapshot = state.snapshot().unwrap();
        let product = snapshot.find(ProductId::new(1).unwrap()).unwrap();
        assert_eq!(product.platform_links.filled_count(), 0);
    }

    #[actix_web::test]
    async fn transport_failure_is_a_backend_error() {
        let state = CatalogState::new();
        let platforms = PlatformSet::standard();
        load_catalog(&sample_repository(), &state, &platforms)
            .await
            .unwrap();

        let result = save_product_links(
            1,
            form(&[]),
            &sample_repository().unavailable(),
            &state,
            &platforms,
        )
        .await;

        assert_eq!(result.unwrap_err(), ServiceError::Backend);
    }

    #[actix_web::test]
    async fn saving_outside_the_snapshot_is_not_found() {
        let result = save_product_links(
            1,
            form(&[]),
            &sample_repository(),
            &CatalogState::new(),
            &PlatformSet::standard(),
        )
        .await;
        assert_eq!(result.unwrap_err(), ServiceError::NotFound);
    }

    #[actix_web::test]
    async fn stored_record_is_normalized() {
        let repo = crate::repository::test::TestRepository::new(
            vec![],
            HashMap::from([(
                "4".to_string(),
                RawLinkRecord::from([
                    ("target".to_string(), Some("https://target.com/p/4".to_string())),
                    ("unknown".to_string(), Some("https://example.com".to_string())),
                    ("walmart".to_string(), None),
                ]),
            )]),
        );
        let platforms = PlatformSet::standard();

        let links = get_product_links(4, &repo, &platforms).await.unwrap();
        assert_eq!(links.len(), platforms.len());
        assert_eq!(links.get("target"), Some("https://target.com/p/4"));
        assert_eq!(links.get("unknown"), None);

        assert_eq!(
            get_product_links(5, &repo, &platforms).await.unwrap_err(),
            ServiceError::NotFound
        );
    }
}
