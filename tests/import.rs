use actix_multipart::form::text::Text;
use serde_json::json;
use storefront_links::domain::import::{HeaderLayout, reconcile};
use storefront_links::domain::platform::PlatformSet;
use storefront_links::domain::product::Product;
use storefront_links::forms::import_export::{UploadLinksForm, parse_delimited_text};
use storefront_links::repository::{HttpRepository, ProductReader};
use storefront_links::services::ServiceError;
use storefront_links::services::catalog::CatalogState;
use storefront_links::services::import_export::{download_template, upload_platform_links};

mod common;

use common::{BackendState, FakeBackend, sample_links, sample_products};

fn catalog_products() -> Vec<Product> {
    serde_json::from_value(sample_products()).expect("sample products should decode")
}

fn text_form(text: &str) -> UploadLinksForm {
    UploadLinksForm {
        file: None,
        text: Some(Text(text.to_string())),
    }
}

#[test]
fn maps_wayfair_and_amazon_columns() {
    let platforms = PlatformSet::standard();
    let records = parse_delimited_text(
        "SKU,Wayfair,Amazon\nPEND-001-CHR,WAYFAIR_URL,AMAZON_URL\n",
    )
    .expect("text should parse");

    let plan = reconcile(&records, &catalog_products(), &platforms);

    assert_eq!(plan.links.len(), 1);
    let links = plan.links.values().next().expect("one record");
    assert_eq!(links.get("wayfair"), Some("WAYFAIR_URL"));
    assert_eq!(links.get("amazon"), Some("AMAZON_URL"));
    for key in ["overstock", "homedepot", "lowes", "target", "walmart"] {
        assert_eq!(links.get(key), Some(""));
    }
}

#[test]
fn written_and_compacted_headers_resolve_alike() {
    let platforms = PlatformSet::extended();
    let written = HeaderLayout::resolve(&["SKU", "Amazon 1", "HD 2", "Lowe's"], &platforms);
    let compacted = HeaderLayout::resolve(&["sku", "amazon1", "hd2", "lowes"], &platforms);

    for layout in [&written, &compacted] {
        assert_eq!(layout.column_for("amazon1"), Some(1));
        assert_eq!(layout.column_for("hd2"), Some(2));
        assert_eq!(layout.column_for("lowes"), Some(3));
        assert_eq!(layout.column_for("amazon2"), None);
    }
}

#[test]
fn variant_sku_must_match_exactly() {
    let platforms = PlatformSet::standard();
    let records = parse_delimited_text(
        "Variant SKU,Target\nchan-002-l,https://target.com/a\nCHAN-002,https://target.com/b\nCHAN-002-L,https://target.com/c",
    )
    .expect("text should parse");

    let plan = reconcile(&records, &catalog_products(), &platforms);

    assert_eq!(plan.links.len(), 1);
    assert_eq!(plan.rows_unmatched, 2);
    let links = plan.links.values().next().expect("one record");
    assert_eq!(links.get("target"), Some("https://target.com/c"));
}

#[actix_web::test]
async fn filled_template_round_trips_through_backend() {
    let backend = FakeBackend::start(BackendState::new(sample_products(), sample_links()));
    let repo = HttpRepository::new(&backend.base_url).expect("valid backend url");
    let state = CatalogState::new();
    let platforms = PlatformSet::extended();

    let template = download_template("csv", &platforms).expect("template should render");
    let template = String::from_utf8(template.bytes).expect("template should be utf-8");
    let header = template.lines().next().expect("header row");
    let row = std::iter::once("CHAN-002-S".to_string())
        .chain(platforms.iter().map(|p| format!("https://{}/p/102", p.site)))
        .collect::<Vec<_>>()
        .join(",");
    let mut form = text_form(&format!("{header}\n{row}\nUNKNOWN-SKU,https://amazon.com/x\n"));

    let summary = upload_platform_links(&mut form, &repo, &state, &platforms)
        .await
        .expect("upload should succeed");

    assert_eq!(summary.updated, 1);
    let requests = backend.state.bulk_requests.lock().unwrap().clone();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0]["links"].as_object().map(|o| o.len()), Some(1));

    let stored = backend.stored_links("102").expect("record should be stored");
    assert_eq!(stored["kohls"], json!("https://kohls.com/p/102"));
    assert_eq!(stored["wf2"], json!("https://wayfair.com/p/102"));

    let snapshot = state.snapshot().expect("snapshot should be readable");
    let product = snapshot
        .products()
        .iter()
        .find(|p| p.has_variant_sku("CHAN-002-L"))
        .expect("product should be in catalog");
    assert_eq!(product.platform_links.filled_count(), platforms.len());

    backend.stop().await;
}

#[actix_web::test]
async fn upload_against_unreachable_backend_fails() {
    let backend = FakeBackend::start(BackendState::new(sample_products(), sample_links()));
    let repo = HttpRepository::new(&backend.base_url).expect("valid backend url");
    assert_eq!(repo.list_products().await.expect("reachable").len(), 3);
    backend.stop().await;

    let mut form = text_form("SKU,Amazon\nPEND-001-CHR,https://amazon.com/dp/101");
    let result = upload_platform_links(
        &mut form,
        &repo,
        &CatalogState::new(),
        &PlatformSet::standard(),
    )
    .await;

    assert_eq!(result.unwrap_err(), ServiceError::Backend);
}
