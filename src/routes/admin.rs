use actix_identity::Identity;
use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use serde::Deserialize;
use tera::Tera;

use crate::domain::platform::PlatformSet;
use crate::forms::links::EditLinksForm;
use crate::repository::HttpRepository;
use crate::routes::{base_context, redirect, render_template, require_operator};
use crate::services::ServiceError;
use crate::services::catalog::{CatalogState, show_admin_products as show_admin_products_service};
use crate::services::links::{
    save_product_links as save_product_links_service, show_edit_links as show_edit_links_service,
};

#[derive(Deserialize)]
struct AdminQueryParams {
    query: Option<String>,
}

#[get("/admin")]
pub async fn show_products(
    params: web::Query<AdminQueryParams>,
    identity: Option<Identity>,
    flash_messages: IncomingFlashMessages,
    repo: web::Data<HttpRepository>,
    state: web::Data<CatalogState>,
    platforms: web::Data<PlatformSet>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let operator = match require_operator(identity.as_ref()) {
        Ok(operator) => operator,
        Err(response) => return response,
    };

    match show_admin_products_service(
        params.into_inner().query,
        repo.get_ref(),
        state.get_ref(),
        platforms.get_ref(),
    )
    .await
    {
        Ok(page) => {
            let mut context = base_context(&flash_messages, Some(&operator), "admin");
            context.insert("page", &page);
            render_template(&tera, "admin/index.html", &context)
        }
        Err(err) => {
            log::error!("Failed to render admin products: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/admin/products/{product_id}/links")]
pub async fn edit_links(
    product_id: web::Path<u64>,
    identity: Option<Identity>,
    flash_messages: IncomingFlashMessages,
    repo: web::Data<HttpRepository>,
    state: web::Data<CatalogState>,
    platforms: web::Data<PlatformSet>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let operator = match require_operator(identity.as_ref()) {
        Ok(operator) => operator,
        Err(response) => return response,
    };

    match show_edit_links_service(
        product_id.into_inner(),
        repo.get_ref(),
        state.get_ref(),
        platforms.get_ref(),
    )
    .await
    {
        Ok(page) => {
            let mut context = base_context(&flash_messages, Some(&operator), "admin");
            context.insert("page", &page);
            render_template(&tera, "admin/edit.html", &context)
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Product not found.").send();
            redirect("/admin")
        }
        Err(ServiceError::Backend) => {
            FlashMessage::error("Could not load products from the backend.").send();
            redirect("/admin")
        }
        Err(err) => {
            log::error!("Failed to render link editor: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/admin/products/{product_id}/links")]
pub async fn save_links(
    product_id: web::Path<u64>,
    identity: Option<Identity>,
    form: web::Form<EditLinksForm>,
    repo: web::Data<HttpRepository>,
    state: web::Data<CatalogState>,
    platforms: web::Data<PlatformSet>,
) -> impl Responder {
    if let Err(response) = require_operator(identity.as_ref()) {
        return response;
    }

    let product_id = product_id.into_inner();
    let edit_url = format!("/admin/products/{product_id}/links");

    match save_product_links_service(
        product_id,
        form.into_inner(),
        repo.get_ref(),
        state.get_ref(),
        platforms.get_ref(),
    )
    .await
    {
        Ok(outcome) if outcome.saved => {
            FlashMessage::success(format!(
                "Platform links saved: {} of {} filled ({} UTC).",
                outcome.filled,
                platforms.len(),
                outcome.saved_at
            ))
            .send();
            redirect(&edit_url)
        }
        Ok(_) | Err(ServiceError::Backend) => {
            FlashMessage::error("Failed to save platform links. Please try again.").send();
            redirect(&edit_url)
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Product not found.").send();
            redirect("/admin")
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect(&edit_url)
        }
        Err(err) => {
            log::error!("Failed to save platform links: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}
