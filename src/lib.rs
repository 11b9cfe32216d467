//! Core library exports for the storefront links service.
//!
//! With only the `data` feature the crate exposes the domain layer: the
//! marketplace table, link records, catalog assembly, filtering and bulk
//! import reconciliation. The `server` feature adds the backend client,
//! forms, services and the Actix-web application around them.

#[cfg(feature = "data")]
pub mod domain;

#[cfg(feature = "server")]
pub mod dto;
#[cfg(feature = "server")]
pub mod error_conversions;
#[cfg(feature = "server")]
pub mod forms;
#[cfg(feature = "server")]
pub mod models;
#[cfg(feature = "server")]
pub mod repository;
#[cfg(feature = "server")]
pub mod routes;
#[cfg(feature = "server")]
pub mod services;

#[cfg(feature = "server")]
pub use server::{configure, run};

#[cfg(feature = "server")]
mod server {
    use std::io;

    use actix_files::Files;
    use actix_identity::IdentityMiddleware;
    use actix_session::SessionMiddleware;
    use actix_session::storage::CookieSessionStore;
    use actix_web::cookie::Key;
    use actix_web::middleware::Logger;
    use actix_web::{App, HttpServer, web};
    use actix_web_flash_messages::FlashMessagesFramework;
    use actix_web_flash_messages::storage::CookieMessageStore;
    use tera::Tera;

    use crate::models::config::ServerConfig;
    use crate::repository::HttpRepository;
    use crate::routes::admin::{edit_links, save_links, show_products};
    use crate::routes::api::{api_v1_product_links, api_v1_products};
    use crate::routes::auth::{login, logout, show_login};
    use crate::routes::import_export::{download_template, show_import, upload_links};
    use crate::routes::main::index;
    use crate::services::auth::ConfiguredOperator;
    use crate::services::catalog::CatalogState;

    /// Registers every application route.
    pub fn configure(cfg: &mut web::ServiceConfig) {
        cfg.service(index)
            .service(show_login)
            .service(login)
            .service(logout)
            .service(show_products)
            .service(edit_links)
            .service(save_links)
            .service(show_import)
            .service(upload_links)
            .service(download_template)
            .service(
                web::scope("/api")
                    .service(api_v1_products)
                    .service(api_v1_product_links),
            );
    }

    /// Builds shared state from `server_config` and serves until shutdown.
    pub async fn run(server_config: ServerConfig) -> io::Result<()> {
        let platforms = server_config
            .platform_set()
            .map_err(|e| io::Error::other(format!("invalid marketplace configuration: {e}")))?;
        let repo = HttpRepository::new(&server_config.backend_url).map_err(io::Error::other)?;
        let secret_key = Key::try_from(server_config.secret_key.as_bytes())
            .map_err(|e| io::Error::other(format!("invalid secret_key: {e}")))?;
        let tera = Tera::new(&server_config.templates_dir)
            .map_err(|e| io::Error::other(format!("failed to load templates: {e}")))?;

        let message_framework = FlashMessagesFramework::builder(
            CookieMessageStore::builder(secret_key.clone()).build(),
        )
        .build();

        log::info!(
            "Serving {} marketplaces from backend {} on {}:{}",
            platforms.len(),
            repo.base_url(),
            server_config.address,
            server_config.port
        );

        let operator = web::Data::new(ConfiguredOperator::new(
            server_config.operator.username.as_str(),
            server_config.operator.password.as_str(),
        ));
        let platforms = web::Data::new(platforms);
        let repo = web::Data::new(repo);
        let state = web::Data::new(CatalogState::new());
        let tera = web::Data::new(tera);
        let assets_dir = server_config.assets_dir.clone();
        let bind_address = (server_config.address.clone(), server_config.port);

        HttpServer::new(move || {
            App::new()
                .wrap(IdentityMiddleware::default())
                .wrap(
                    SessionMiddleware::builder(CookieSessionStore::default(), secret_key.clone())
                        .cookie_secure(false)
                        .build(),
                )
                .wrap(message_framework.clone())
                .wrap(Logger::default())
                .service(Files::new("/assets", &assets_dir))
                .app_data(operator.clone())
                .app_data(platforms.clone())
                .app_data(repo.clone())
                .app_data(state.clone())
                .app_data(tera.clone())
                .configure(configure)
        })
        .bind(bind_address)?
        .run()
        .await
    }
}
