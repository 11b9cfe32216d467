use actix_web::{HttpResponse, Responder, get, web};
use serde::Deserialize;

use crate::domain::platform::PlatformSet;
use crate::repository::HttpRepository;
use crate::services::ServiceError;
use crate::services::api::list_products as list_products_service;
use crate::services::catalog::CatalogState;
use crate::services::links::get_product_links as get_product_links_service;

#[derive(Deserialize, Debug)]
struct ApiV1ProductsQueryParams {
    query: Option<String>,
    category: Option<String>,
}

#[get("/v1/products")]
pub async fn api_v1_products(
    params: web::Query<ApiV1ProductsQueryParams>,
    repo: web::Data<HttpRepository>,
    state: web::Data<CatalogState>,
    platforms: web::Data<PlatformSet>,
) -> impl Responder {
    let params = params.into_inner();
    match list_products_service(
        params.query,
        params.category,
        repo.get_ref(),
        state.get_ref(),
        platforms.get_ref(),
    )
    .await
    {
        Ok(products) => HttpResponse::Ok().json(products),
        Err(ServiceError::Backend) => HttpResponse::BadGateway().finish(),
        Err(err) => {
            log::error!("Failed to list products: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/v1/products/{product_id}/links")]
pub async fn api_v1_product_links(
    product_id: web::Path<u64>,
    repo: web::Data<HttpRepository>,
    platforms: web::Data<PlatformSet>,
) -> impl Responder {
    match get_product_links_service(product_id.into_inner(), repo.get_ref(), platforms.get_ref())
        .await
    {
        Ok(links) => HttpResponse::Ok().json(links),
        Err(ServiceError::NotFound) => HttpResponse::NotFound().finish(),
        Err(ServiceError::Backend) => HttpResponse::BadGateway().finish(),
        Err(err) => {
            log::error!("Failed to fetch product links: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}
