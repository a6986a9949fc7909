// Application state module
// Holds the validated configuration and the request pipeline built from it

use serde_json::Value;
use std::sync::Arc;

use super::catalog::{CatalogEndpoint, ConfigError};
use super::types::Config;
use crate::catalog::{CatalogSource, HttpCatalog};
use crate::logger;
use crate::render::{PageRenderer, Theme};

/// Everything a request needs once configuration is valid
pub struct Storefront {
    pub catalog: Arc<dyn CatalogSource>,
    pub renderer: PageRenderer,
    /// Public client configuration served at `/api/config`
    pub client_config: Value,
}

impl Storefront {
    pub fn new(config: &Config, endpoint: &CatalogEndpoint, catalog: Arc<dyn CatalogSource>) -> Self {
        Self {
            catalog,
            renderer: PageRenderer::new(
                config.site.clone(),
                Theme::from_config(&config.theme),
                endpoint.base_url(),
            ),
            client_config: endpoint.client_config().clone(),
        }
    }
}

/// Application state
pub struct AppState {
    pub config: Config,
    /// `Err` when the catalog endpoint is misconfigured; every request then answers 500
    pub storefront: Result<Storefront, ConfigError>,
}

impl AppState {
    /// Validate the catalog endpoint once and build the HTTP catalog client
    ///
    /// Only a failure to build the HTTP client aborts start-up; configuration
    /// errors are kept and reported per request.
    pub fn new(config: Config) -> Result<Self, reqwest::Error> {
        let storefront = match config.catalog.resolve() {
            Ok(endpoint) => {
                let catalog = HttpCatalog::new(&endpoint, &config.http.server_name)?;
                logger::log_catalog_ready(endpoint.base_url());
                Ok(Storefront::new(&config, &endpoint, Arc::new(catalog)))
            }
            Err(e) => {
                logger::log_config_error(&e);
                Err(e)
            }
        };

        Ok(Self { config, storefront })
    }

    /// State backed by an arbitrary catalog source
    #[cfg(test)]
    pub fn with_catalog(config: Config, catalog: Arc<dyn CatalogSource>) -> Result<Self, ConfigError> {
        let endpoint = config.catalog.resolve()?;
        let storefront = Storefront::new(&config, &endpoint, catalog);
        Ok(Self {
            config,
            storefront: Ok(storefront),
        })
    }
}
