pub mod auth;
pub mod import_export;
pub mod links;
