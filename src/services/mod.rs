pub use errors::{ServiceError, ServiceResult};

pub mod api;
pub mod auth;
pub mod catalog;
pub mod errors;
pub mod import_export;
pub mod links;
