//! Remote catalog module
//!
//! Read-only access to the product catalog and store settings held in a remote
//! document store. Every fetch either yields data or absence; transport and
//! decoding failures are logged here and never reach the caller.

mod client;
#[cfg(test)]
pub mod memory;
pub mod model;

use async_trait::async_trait;

pub use client::HttpCatalog;
pub use model::{Catalog, ProductRecord, SettingsRecord};

/// Source of catalog data
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Fetch one product by id, `None` when unknown or unavailable
    async fn fetch_product(&self, id: &str) -> Option<ProductRecord>;

    /// Fetch the settings singleton, `None` when unavailable
    async fn fetch_settings(&self) -> Option<SettingsRecord>;

    /// Fetch every product; empty when unavailable
    async fn fetch_all_products(&self) -> Catalog;
}
