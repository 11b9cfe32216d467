use actix_identity::Identity;
use actix_web::{HttpResponse, Responder, get, web};
use actix_web_flash_messages::IncomingFlashMessages;
use serde::Deserialize;
use tera::Tera;

use crate::domain::platform::PlatformSet;
use crate::repository::HttpRepository;
use crate::routes::{base_context, current_operator, render_template};
use crate::services::catalog::{CatalogState, show_storefront as show_storefront_service};

#[derive(Deserialize)]
struct StorefrontQueryParams {
    query: Option<String>,
    category: Option<String>,
}

#[get("/")]
pub async fn index(
    params: web::Query<StorefrontQueryParams>,
    identity: Option<Identity>,
    flash_messages: IncomingFlashMessages,
    repo: web::Data<HttpRepository>,
    state: web::Data<CatalogState>,
    platforms: web::Data<PlatformSet>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let params = params.into_inner();
    match show_storefront_service(
        params.query,
        params.category,
        repo.get_ref(),
        state.get_ref(),
        platforms.get_ref(),
    )
    .await
    {
        Ok(page) => {
            let operator = current_operator(identity.as_ref());
            let mut context = base_context(&flash_messages, operator.as_deref(), "index");
            context.insert("page", &page);
            render_template(&tera, "main/index.html", &context)
        }
        Err(err) => {
            log::error!("Failed to render storefront: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}
