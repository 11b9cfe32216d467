//! Domain model: marketplace table, products, link records, catalog assembly
//! and bulk import reconciliation.

pub mod catalog;
pub mod import;
pub mod platform;
pub mod product;
pub mod types;
