//! In-memory catalog used by dispatcher tests

use async_trait::async_trait;

use super::model::{Catalog, ProductRecord, SettingsRecord};
use super::CatalogSource;

#[derive(Debug, Clone, Default)]
pub struct MemoryCatalog {
    pub products: Catalog,
    pub settings: Option<SettingsRecord>,
}

impl MemoryCatalog {
    pub fn with_product(mut self, id: &str, mut record: ProductRecord) -> Self {
        record.id = id.to_string();
        self.products.insert(id.to_string(), record);
        self
    }

    pub fn with_apk_url(mut self, apk_url: &str) -> Self {
        self.settings = Some(SettingsRecord {
            apk_url: Some(apk_url.to_string()),
        });
        self
    }
}

#[async_trait]
impl CatalogSource for MemoryCatalog {
    async fn fetch_product(&self, id: &str) -> Option<ProductRecord> {
        self.products.get(id).cloned()
    }

    async fn fetch_settings(&self) -> Option<SettingsRecord> {
        self.settings.clone()
    }

    async fn fetch_all_products(&self) -> Catalog {
        self.products.clone()
    }
}
