//! schema.org `SoftwareApplication` payload for product pages

use serde::Serialize;

use crate::catalog::{ProductRecord, SettingsRecord};
use crate::render::escape::safe_url;

#[derive(Debug, Clone, Serialize)]
struct SoftwareApplication<'a> {
    #[serde(rename = "@context")]
    context: &'static str,
    #[serde(rename = "@type")]
    kind: &'static str,
    name: &'a str,
    description: &'a str,
    image: &'a str,
    url: &'a str,
    #[serde(rename = "operatingSystem")]
    operating_system: &'static str,
    #[serde(rename = "applicationCategory")]
    application_category: &'static str,
    #[serde(rename = "downloadUrl", skip_serializing_if = "Option::is_none")]
    download_url: Option<&'a str>,
    offers: Offer,
    #[serde(rename = "aggregateRating")]
    aggregate_rating: AggregateRating<'a>,
}

#[derive(Debug, Clone, Serialize)]
struct Offer {
    #[serde(rename = "@type")]
    kind: &'static str,
    price: &'static str,
    #[serde(rename = "priceCurrency")]
    price_currency: &'static str,
}

#[derive(Debug, Clone, Serialize)]
struct AggregateRating<'a> {
    #[serde(rename = "@type")]
    kind: &'static str,
    #[serde(rename = "ratingValue")]
    rating_value: &'a str,
}

/// Resolved fields the payload repeats from the metadata bundle
pub struct ResolvedFields<'a> {
    pub name: &'a str,
    pub description: &'a str,
    pub image: &'a str,
    pub url: &'a str,
}

pub fn software_application(
    fields: ResolvedFields<'_>,
    product: &ProductRecord,
    settings: Option<&SettingsRecord>,
) -> serde_json::Value {
    let payload = SoftwareApplication {
        context: "https://schema.org",
        kind: "SoftwareApplication",
        name: fields.name,
        description: fields.description,
        image: fields.image,
        url: fields.url,
        operating_system: "ANDROID",
        application_category: "DeveloperApplication",
        download_url: settings.and_then(SettingsRecord::apk_url).and_then(safe_url),
        offers: Offer {
            kind: "Offer",
            price: "0",
            price_currency: "USD",
        },
        aggregate_rating: AggregateRating {
            kind: "AggregateRating",
            rating_value: product.rating(),
        },
    };
    serde_json::to_value(payload).unwrap_or(serde_json::Value::Null)
}
