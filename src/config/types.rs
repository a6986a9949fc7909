// Configuration types module
// Defines all configuration-related data structures

use serde::Deserialize;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub performance: PerformanceConfig,
    pub http: HttpConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
    pub site: SiteConfig,
    pub theme: ThemeConfig,
}

/// Server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub access_log: bool,
    /// Access log format (combined, common, json, or custom pattern)
    #[serde(default = "default_access_log_format")]
    pub access_log_format: String,
    /// Access log file path (optional, stdout if not set)
    #[serde(default)]
    pub access_log_file: Option<String>,
    /// Error log file path (optional, stderr if not set)
    #[serde(default)]
    pub error_log_file: Option<String>,
}

#[allow(clippy::missing_const_for_fn)]
fn default_access_log_format() -> String {
    "combined".to_string()
}

/// Performance configuration
#[derive(Debug, Deserialize, Clone)]
pub struct PerformanceConfig {
    pub keep_alive_timeout: u64,
    pub read_timeout: u64,
    pub write_timeout: u64,
    pub max_connections: Option<u64>,
}

/// HTTP configuration
#[derive(Debug, Deserialize, Clone)]
pub struct HttpConfig {
    pub server_name: String,
    pub enable_cors: bool,
}

/// Remote catalog (document store) configuration
///
/// Either `base_url` names the store directly, or `client_config` carries the
/// public client configuration JSON whose `databaseURL` field names it.
/// `base_url` wins when both are set.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct CatalogConfig {
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub client_config: Option<String>,
}

pub const DEFAULT_SITE_NAME: &str = "MistaHub Store";
pub const DEFAULT_ROOT_URL: &str = "https://mistahub.vercel.app";
pub const DEFAULT_TITLE: &str = "MistaHub Store - Best Developer Tools";
pub const DEFAULT_DESCRIPTION: &str =
    "Download premium Android developer tools, Sketchware projects, and utility apps for free.";
pub const DEFAULT_IMAGE: &str = "https://i.ibb.co/5WqqrrqB/b491fe4e44b7.png";

/// Site identity and the global metadata defaults
#[derive(Debug, Deserialize, Clone)]
pub struct SiteConfig {
    pub name: String,
    /// Public root URL, e.g. `https://store.example.com`
    pub root_url: String,
    pub default_title: String,
    pub default_description: String,
    pub default_image: String,
}

/// Page theme
#[derive(Debug, Deserialize, Clone)]
pub struct ThemeConfig {
    pub primary_color: String,
    pub accent_color: String,
    pub mode: ThemeMode,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ThemeMode {
    Light,
    Dark,
}
