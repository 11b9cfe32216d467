use actix_identity::Identity;
use actix_web::HttpResponse;
use actix_web::http::header;
use actix_web_flash_messages::{IncomingFlashMessages, Level};
use tera::{Context, Tera};

pub mod admin;
pub mod api;
pub mod auth;
pub mod import_export;
pub mod main;

pub fn render_template(tera: &Tera, template: &str, context: &Context) -> HttpResponse {
    HttpResponse::Ok().body(tera.render(template, context).unwrap_or_else(|e| {
        log::error!("Failed to render template '{template}': {e}");
        String::new()
    }))
}

pub fn redirect(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .finish()
}

pub fn alert_level_to_str(level: &Level) -> &'static str {
    match level {
        Level::Error => "danger",
        Level::Warning => "warning",
        Level::Success => "success",
        Level::Info => "info",
        Level::Debug => "secondary",
    }
}

/// Name of the logged-in operator, if any.
pub fn current_operator(identity: Option<&Identity>) -> Option<String> {
    identity.and_then(|identity| match identity.id() {
        Ok(id) => Some(id),
        Err(e) => {
            log::warn!("Ignoring unreadable operator identity: {e}");
            None
        }
    })
}

/// Operator name, or a redirect to the login page.
pub fn require_operator(identity: Option<&Identity>) -> Result<String, HttpResponse> {
    current_operator(identity).ok_or_else(|| redirect("/login"))
}

pub fn base_context(
    flash_messages: &IncomingFlashMessages,
    operator: Option<&str>,
    current_page: &str,
) -> Context {
    let alerts = flash_messages
        .iter()
        .map(|f| (f.content(), alert_level_to_str(&f.level())))
        .collect::<Vec<_>>();

    let mut context = Context::new();
    context.insert("alerts", &alerts);
    context.insert("current_operator", &operator);
    context.insert("current_page", current_page);
    context
}
