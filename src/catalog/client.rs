//! HTTP catalog client
//!
//! Queries `<base>/apps/<id>.json`, `<base>/apps.json` and `<base>/settings.json`.
//! One request per call: no retries, no caching.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

use super::model::{Catalog, ProductRecord, SettingsRecord};
use super::CatalogSource;
use crate::config::CatalogEndpoint;
use crate::logger;

/// Why a fetch produced no data
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} answered {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },
    #[error("{url} returned a malformed payload: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Catalog backed by the remote document store's REST API
#[derive(Debug, Clone)]
pub struct HttpCatalog {
    client: reqwest::Client,
    base_url: String,
}

impl HttpCatalog {
    pub fn new(endpoint: &CatalogEndpoint, user_agent: &str) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().user_agent(user_agent).build()?;
        Ok(Self {
            client,
            base_url: endpoint.base_url().to_string(),
        })
    }

    fn product_url(&self, id: &str) -> String {
        format!("{}/apps/{}.json", self.base_url, urlencoding::encode(id))
    }

    /// GET a JSON document; a JSON `null` body decodes to `None`
    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<Option<T>, CatalogError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| CatalogError::Transport {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::Status {
                url: url.to_string(),
                status,
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|source| CatalogError::Transport {
                url: url.to_string(),
                source,
            })?;

        serde_json::from_slice(&body).map_err(|source| CatalogError::Decode {
            url: url.to_string(),
            source,
        })
    }
}

#[async_trait]
impl CatalogSource for HttpCatalog {
    async fn fetch_product(&self, id: &str) -> Option<ProductRecord> {
        match self.get_json::<ProductRecord>(&self.product_url(id)).await {
            Ok(Some(mut record)) => {
                record.id = id.to_string();
                Some(record)
            }
            Ok(None) => {
                logger::log_debug(&format!("[Catalog] Product '{id}' not found"));
                None
            }
            Err(e) => {
                logger::log_upstream_failure("product", &e);
                None
            }
        }
    }

    async fn fetch_settings(&self) -> Option<SettingsRecord> {
        let url = format!("{}/settings.json", self.base_url);
        match self.get_json::<SettingsRecord>(&url).await {
            Ok(settings) => settings,
            Err(e) => {
                logger::log_upstream_failure("settings", &e);
                None
            }
        }
    }

    async fn fetch_all_products(&self) -> Catalog {
        let url = format!("{}/apps.json", self.base_url);
        match self.get_json::<Value>(&url).await {
            Ok(Some(entries)) => collect_catalog(entries),
            Ok(None) => Catalog::new(),
            Err(e) => {
                logger::log_upstream_failure("catalog", &e);
                Catalog::new()
            }
        }
    }
}

/// Decode entries one by one so a single bad record does not hide the rest
///
/// The store answers with an array instead of an object when every key is a
/// small integer; array positions become the keys then.
fn collect_catalog(entries: Value) -> Catalog {
    let keyed: Vec<(String, Value)> = match entries {
        Value::Object(map) => map.into_iter().collect(),
        Value::Array(items) => items
            .into_iter()
            .enumerate()
            .map(|(index, value)| (index.to_string(), value))
            .collect(),
        other => {
            logger::log_warning(&format!("[Catalog] Unexpected catalog payload: {other}"));
            return Catalog::new();
        }
    };

    keyed
        .into_iter()
        .filter(|(_, value)| !value.is_null())
        .filter_map(|(id, value)| match serde_json::from_value::<ProductRecord>(value) {
            Ok(mut record) => {
                record.id.clone_from(&id);
                Some((id, record))
            }
            Err(e) => {
                logger::log_warning(&format!("[Catalog] Skipping malformed product '{id}': {e}"));
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CatalogConfig;

    fn catalog(base: &str) -> HttpCatalog {
        let endpoint = CatalogConfig {
            base_url: Some(base.to_string()),
            client_config: None,
        }
        .resolve()
        .unwrap();
        HttpCatalog::new(&endpoint, "storefront-test").unwrap()
    }

    #[test]
    fn test_product_url_encodes_id() {
        let c = catalog("https://db.example.com/");
        assert_eq!(
            c.product_url("app-1"),
            "https://db.example.com/apps/app-1.json"
        );
        assert_eq!(
            c.product_url("a/b?c&d"),
            "https://db.example.com/apps/a%2Fb%3Fc%26d.json"
        );
    }

    #[test]
    fn test_collect_catalog_skips_null_and_malformed() {
        let json = serde_json::json!({
            "alpha": { "name": "Alpha" },
            "beta": null,
            "gamma": "not an object",
            "delta": { "name": "Delta", "rating": 4 }
        });
        let catalog = collect_catalog(json);
        assert_eq!(catalog.keys().collect::<Vec<_>>(), vec!["alpha", "delta"]);
        assert_eq!(catalog["delta"].id, "delta");
        assert_eq!(catalog["delta"].rating(), "4");
    }

    #[test]
    fn test_collect_catalog_accepts_array_payload() {
        let json = serde_json::json!([{ "name": "Zero" }, null, { "name": "Two" }]);
        let catalog = collect_catalog(json);
        assert_eq!(catalog.keys().collect::<Vec<_>>(), vec!["0", "2"]);
        assert_eq!(catalog["2"].id, "2");
        assert_eq!(catalog["0"].name(), Some("Zero"));
    }

    #[test]
    fn test_collect_catalog_rejects_scalar_payload() {
        assert!(collect_catalog(serde_json::json!("oops")).is_empty());
    }

    #[tokio::test]
    async fn test_array_catalog_over_http() {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 1024];
            let _ = stream.read(&mut buf).await.unwrap();
            let body = r#"[{"name":"Zero"},{"name":"One"}]"#;
            let response = format!(
                "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            stream.write_all(response.as_bytes()).await.unwrap();
        });

        let catalog = catalog(&format!("http://{addr}")).fetch_all_products().await;
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog["1"].name(), Some("One"));
    }

    #[tokio::test]
    async fn test_unreachable_store_degrades_to_absence() {
        // Port 9 on localhost is closed in test environments
        let c = catalog("http://127.0.0.1:9");
        assert!(c.fetch_product("alpha").await.is_none());
        assert!(c.fetch_settings().await.is_none());
        assert!(c.fetch_all_products().await.is_empty());
    }
}
