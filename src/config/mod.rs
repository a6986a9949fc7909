// Configuration module entry point
// Manages application configuration, catalog endpoint validation, and runtime state

mod catalog;
mod state;
mod types;

use std::net::SocketAddr;

// Re-export public types
pub use catalog::{CatalogEndpoint, ConfigError};
pub use state::{AppState, Storefront};
pub use types::{CatalogConfig, Config, SiteConfig, ThemeConfig, ThemeMode};
use types::{
    DEFAULT_DESCRIPTION, DEFAULT_IMAGE, DEFAULT_ROOT_URL, DEFAULT_SITE_NAME, DEFAULT_TITLE,
};

impl Config {
    /// Load configuration from the given file path (extension optional)
    ///
    /// The file is optional; `STOREFRONT__SECTION__KEY` environment variables
    /// override it, and built-in defaults fill the rest.
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(config::Environment::with_prefix("STOREFRONT").separator("__"))
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("performance.keep_alive_timeout", 75)?
            .set_default("performance.read_timeout", 30)?
            .set_default("performance.write_timeout", 30)?
            .set_default("http.server_name", "Storefront/0.1")?
            .set_default("http.enable_cors", false)?
            .set_default("site.name", DEFAULT_SITE_NAME)?
            .set_default("site.root_url", DEFAULT_ROOT_URL)?
            .set_default("site.default_title", DEFAULT_TITLE)?
            .set_default("site.default_description", DEFAULT_DESCRIPTION)?
            .set_default("site.default_image", DEFAULT_IMAGE)?
            .set_default("theme.primary_color", "#6366f1")?
            .set_default("theme.accent_color", "#a855f7")?
            .set_default("theme.mode", "light")?
            .build()?;

        settings.try_deserialize()
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }

    /// Whether debug-level lines should be written
    pub fn is_debug(&self) -> bool {
        self.logging.level.eq_ignore_ascii_case("debug")
    }
}

fn or_builtin<'a>(value: &'a str, builtin: &'a str) -> &'a str {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        builtin
    } else {
        trimmed
    }
}

/// Accessors never return blank values; an operator blanking a field in the
/// config file gets the built-in default instead.
impl SiteConfig {
    pub fn name(&self) -> &str {
        or_builtin(&self.name, DEFAULT_SITE_NAME)
    }

    /// Root URL without a trailing slash
    pub fn root(&self) -> &str {
        or_builtin(&self.root_url, DEFAULT_ROOT_URL).trim_end_matches('/')
    }

    pub fn home_url(&self) -> String {
        format!("{}/", self.root())
    }

    /// Canonical product URL: `<root>/app/<percent-encoded id>`
    pub fn product_url(&self, id: &str) -> String {
        format!("{}/app/{}", self.root(), urlencoding::encode(id))
    }

    pub fn default_title(&self) -> &str {
        or_builtin(&self.default_title, DEFAULT_TITLE)
    }

    pub fn default_description(&self) -> &str {
        or_builtin(&self.default_description, DEFAULT_DESCRIPTION)
    }

    pub fn default_image(&self) -> &str {
        or_builtin(&self.default_image, DEFAULT_IMAGE)
    }
}
