// Catalog endpoint validation
// Turns the raw catalog settings into a validated base URL once, at start-up

use serde_json::Value;
use thiserror::Error;
use url::Url;

use super::types::CatalogConfig;

/// Configuration failures that make every request answer 500
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("catalog base URL is not configured")]
    MissingBaseUrl,
    #[error("catalog base URL '{url}' is invalid: {reason}")]
    InvalidBaseUrl { url: String, reason: String },
    #[error("catalog client config is not valid JSON: {0}")]
    MalformedClientConfig(String),
}

/// Validated catalog endpoint
#[derive(Debug, Clone)]
pub struct CatalogEndpoint {
    /// Base URL without a trailing slash
    base_url: String,
    /// Public client configuration served at `/api/config`
    client_config: Value,
}

impl CatalogEndpoint {
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub const fn client_config(&self) -> &Value {
        &self.client_config
    }
}

impl CatalogConfig {
    /// Resolve the catalog base URL from `base_url` or the client config JSON
    pub fn resolve(&self) -> Result<CatalogEndpoint, ConfigError> {
        let client_config = match self.client_config.as_deref().map(str::trim) {
            Some(raw) if !raw.is_empty() => Some(
                serde_json::from_str::<Value>(raw)
                    .map_err(|e| ConfigError::MalformedClientConfig(e.to_string()))?,
            ),
            _ => None,
        };

        let from_client = client_config
            .as_ref()
            .and_then(|c| c.get("databaseURL"))
            .and_then(Value::as_str)
            .map(ToString::to_string);

        let raw = self
            .base_url
            .clone()
            .filter(|u| !u.trim().is_empty())
            .or(from_client)
            .ok_or(ConfigError::MissingBaseUrl)?;

        let base_url = validate_base_url(raw.trim())?;
        let client_config = client_config
            .unwrap_or_else(|| serde_json::json!({ "databaseURL": base_url }));

        Ok(CatalogEndpoint {
            base_url,
            client_config,
        })
    }
}

fn validate_base_url(raw: &str) -> Result<String, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidBaseUrl {
        url: raw.to_string(),
        reason,
    };

    let url = Url::parse(raw).map_err(|e| invalid(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
    }
    if url.host_str().is_none() {
        return Err(invalid("missing host".to_string()));
    }
    if url.query().is_some() || url.fragment().is_some() {
        return Err(invalid("query and fragment are not allowed".to_string()));
    }

    Ok(url.as_str().trim_end_matches('/').to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog(base_url: Option<&str>, client_config: Option<&str>) -> CatalogConfig {
        CatalogConfig {
            base_url: base_url.map(ToString::to_string),
            client_config: client_config.map(ToString::to_string),
        }
    }

    #[test]
    fn test_base_url_is_normalized() {
        let endpoint = catalog(Some("https://db.example.com/"), None)
            .resolve()
            .unwrap();
        assert_eq!(endpoint.base_url(), "https://db.example.com");
        assert_eq!(
            endpoint.client_config()["databaseURL"],
            "https://db.example.com"
        );
    }

    #[test]
    fn test_base_url_from_client_config() {
        let json = r#"{"apiKey":"k","databaseURL":"https://store-db.example.com"}"#;
        let endpoint = catalog(None, Some(json)).resolve().unwrap();
        assert_eq!(endpoint.base_url(), "https://store-db.example.com");
        assert_eq!(endpoint.client_config()["apiKey"], "k");
    }

    #[test]
    fn test_missing_base_url() {
        assert_eq!(
            catalog(None, None).resolve().unwrap_err(),
            ConfigError::MissingBaseUrl
        );
        assert_eq!(
            catalog(Some("  "), Some("{}")).resolve().unwrap_err(),
            ConfigError::MissingBaseUrl
        );
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(matches!(
            catalog(Some("not a url"), None).resolve(),
            Err(ConfigError::InvalidBaseUrl { .. })
        ));
        assert!(matches!(
            catalog(Some("ftp://db.example.com"), None).resolve(),
            Err(ConfigError::InvalidBaseUrl { .. })
        ));
    }

    #[test]
    fn test_malformed_client_config() {
        assert!(matches!(
            catalog(None, Some("{databaseURL:")).resolve(),
            Err(ConfigError::MalformedClientConfig(_))
        ));
    }
}
