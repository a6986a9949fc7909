//! Catalog record types
//!
//! Records are owned by the remote store and read-only here. Empty strings are
//! treated the same as missing fields by the accessors.

use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::collections::BTreeMap;

/// Rating shown when a record carries none
pub const DEFAULT_RATING: &str = "4.5";

/// Full catalog snapshot keyed by product id
pub type Catalog = BTreeMap<String, ProductRecord>;

/// One listed application
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ProductRecord {
    /// Catalog key; not part of the stored document
    #[serde(skip)]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub short_desc: Option<String>,
    #[serde(default)]
    pub full_desc: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default, deserialize_with = "deserialize_screenshots")]
    pub screenshots: Option<Vec<String>>,
    #[serde(default, deserialize_with = "deserialize_rating")]
    pub rating: Option<String>,
    #[serde(default)]
    pub demo_url: Option<String>,
    #[serde(default)]
    pub meta_title: Option<String>,
    #[serde(default)]
    pub meta_desc: Option<String>,
    #[serde(default)]
    pub seo_image: Option<String>,
}

/// Store-wide settings singleton
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SettingsRecord {
    #[serde(default)]
    pub apk_url: Option<String>,
}

/// Borrow a field only when it holds a non-blank value
pub fn present(field: Option<&String>) -> Option<&str> {
    field.map(String::as_str).filter(|s| !s.trim().is_empty())
}

impl ProductRecord {
    pub fn name(&self) -> Option<&str> {
        present(self.name.as_ref())
    }

    pub fn rating(&self) -> &str {
        present(self.rating.as_ref()).unwrap_or(DEFAULT_RATING)
    }

    pub fn demo_url(&self) -> Option<&str> {
        present(self.demo_url.as_ref())
    }

    /// Screenshots in store order, blanks removed
    pub fn screenshots(&self) -> impl Iterator<Item = &str> {
        self.screenshots
            .iter()
            .flatten()
            .map(String::as_str)
            .filter(|s| !s.trim().is_empty())
    }
}

impl SettingsRecord {
    pub fn apk_url(&self) -> Option<&str> {
        present(self.apk_url.as_ref())
    }
}

/// Ratings are stored either as JSON strings or numbers
fn deserialize_rating<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

/// Screenshot lists may contain nulls where entries were removed in the store
fn deserialize_screenshots<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => Some(
            items
                .into_iter()
                .filter_map(|v| match v {
                    Value::String(s) => Some(s),
                    _ => None,
                })
                .collect(),
        ),
        _ => None,
    })
}
