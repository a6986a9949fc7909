//! Metadata resolution
//!
//! Decides the title, description, image, canonical URL and structured data
//! for a request. Every field falls back through
//! SEO override → value derived from the record → site default, so no
//! blank value reaches the renderer. A product id that the catalog does not
//! know yields the default bundle, never an error.

mod structured;

use serde_json::Value;

use crate::catalog::model::present;
use crate::catalog::{ProductRecord, SettingsRecord};
use crate::config::SiteConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageType {
    Website,
    Software,
}

impl PageType {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Website => "website",
            Self::Software => "software",
        }
    }
}

/// Head metadata for one response
#[derive(Debug, Clone, PartialEq)]
pub struct MetadataBundle {
    pub title: String,
    pub description: String,
    pub image: String,
    pub canonical_url: String,
    pub page_type: PageType,
    pub structured_data: Option<Value>,
}

impl MetadataBundle {
    /// Site-wide defaults used for the catalog page and unknown products
    pub fn defaults(site: &SiteConfig) -> Self {
        Self {
            title: site.default_title().to_string(),
            description: site.default_description().to_string(),
            image: site.default_image().to_string(),
            canonical_url: site.home_url(),
            page_type: PageType::Website,
            structured_data: None,
        }
    }
}

/// Resolve the metadata bundle for a request
pub fn resolve(
    site: &SiteConfig,
    product_id: Option<&str>,
    product: Option<&ProductRecord>,
    settings: Option<&SettingsRecord>,
) -> MetadataBundle {
    let defaults = MetadataBundle::defaults(site);

    let (Some(id), Some(record)) = (product_id, product) else {
        return defaults;
    };

    let name = record.name();

    let title = present(record.meta_title.as_ref())
        .map(ToString::to_string)
        .or_else(|| name.map(|n| format!("{n} - Download")))
        .unwrap_or(defaults.title);

    let description = present(record.meta_desc.as_ref())
        .or_else(|| present(record.short_desc.as_ref()))
        .map(ToString::to_string)
        .or_else(|| name.map(|n| format!("Download {n} for Android.")))
        .unwrap_or(defaults.description);

    let image = present(record.seo_image.as_ref())
        .or_else(|| record.screenshots().next())
        .or_else(|| present(record.icon.as_ref()))
        .map_or(defaults.image, ToString::to_string);

    let canonical_url = site.product_url(id);

    let structured_data = structured::software_application(
        structured::ResolvedFields {
            name: name.unwrap_or(title.as_str()),
            description: &description,
            image: &image,
            url: &canonical_url,
        },
        record,
        settings,
    );

    MetadataBundle {
        title,
        description,
        image,
        canonical_url,
        page_type: PageType::Software,
        structured_data: Some(structured_data),
    }
}
