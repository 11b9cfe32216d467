use actix_identity::Identity;
use actix_multipart::form::MultipartForm;
use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use serde::Deserialize;
use tera::Tera;

use crate::domain::platform::PlatformSet;
use crate::forms::import_export::UploadLinksForm;
use crate::repository::HttpRepository;
use crate::routes::{base_context, redirect, render_template, require_operator};
use crate::services::ServiceError;
use crate::services::catalog::CatalogState;
use crate::services::import_export::{
    download_template as download_template_service,
    upload_platform_links as upload_platform_links_service,
};

#[derive(Deserialize)]
struct DownloadQueryParams {
    format: Option<String>,
}

#[get("/admin/import")]
pub async fn show_import(
    identity: Option<Identity>,
    flash_messages: IncomingFlashMessages,
    platforms: web::Data<PlatformSet>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let operator = match require_operator(identity.as_ref()) {
        Ok(operator) => operator,
        Err(response) => return response,
    };

    let mut context = base_context(&flash_messages, Some(&operator), "import");
    context.insert("headers", &platforms.template_headers());
    render_template(&tera, "admin/import.html", &context)
}

#[post("/admin/import")]
pub async fn upload_links(
    identity: Option<Identity>,
    repo: web::Data<HttpRepository>,
    state: web::Data<CatalogState>,
    platforms: web::Data<PlatformSet>,
    MultipartForm(mut form): MultipartForm<UploadLinksForm>,
) -> impl Responder {
    if let Err(response) = require_operator(identity.as_ref()) {
        return response;
    }

    match upload_platform_links_service(
        &mut form,
        repo.get_ref(),
        state.get_ref(),
        platforms.get_ref(),
    )
    .await
    {
        Ok(summary) => {
            FlashMessage::success(format!(
                "Successfully updated platform links for {} products.",
                summary.updated
            ))
            .send();
            redirect("/admin")
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect("/admin/import")
        }
        Err(ServiceError::Backend) => {
            FlashMessage::error("Failed to import platform links. Please try again.").send();
            redirect("/admin/import")
        }
        Err(err) => {
            log::error!("Failed to import platform links: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/admin/import/template")]
pub async fn download_template(
    params: web::Query<DownloadQueryParams>,
    identity: Option<Identity>,
    platforms: web::Data<PlatformSet>,
) -> impl Responder {
    if let Err(response) = require_operator(identity.as_ref()) {
        return response;
    }

    let format = params.format.as_deref().unwrap_or("csv");
    match download_template_service(format, platforms.get_ref()) {
        Ok(file) => HttpResponse::Ok()
            .append_header(("Content-Type", file.content_type))
            .append_header((
                "Content-Disposition",
                format!("attachment; filename=\"{}\"", file.file_name),
            ))
            .body(file.bytes),
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect("/admin/import")
        }
        Err(err) => {
            log::error!("Failed to download link template: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}
