//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: method validation, the
//! configuration gate, route matching and access logging.
//!
//! Routes:
//! - `/` catalog page; `/?product=<id>` redirects to the canonical `/app/<id>`
//! - `/app/<id>` product page
//! - `/robots.txt`, `/sitemap.xml`
//! - `/api/config` public client configuration

use hyper::body::{Body as _, Bytes};
use hyper::header::{HeaderValue, SERVER};
use hyper::{Method, Request, Response};
use http_body_util::Full;
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use crate::config::{AppState, Storefront};
use crate::http;
use crate::logger::{self, AccessLogEntry};
use crate::{seo, sitemap};

const PRODUCT_PREFIX: &str = "/app/";

/// Request context encapsulating information needed for request processing
pub struct RequestContext<'a> {
    pub path: &'a str,
    pub query: Option<&'a str>,
    pub is_head: bool,
}

/// Main entry point for HTTP request handling
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let started = Instant::now();
    let ctx = RequestContext {
        path: req.uri().path(),
        query: req.uri().query(),
        is_head: req.method() == Method::HEAD,
    };

    let mut response = match check_http_method(req.method(), state.config.http.enable_cors) {
        Some(resp) => resp,
        None => match &state.storefront {
            Ok(storefront) => route_request(&ctx, storefront).await,
            Err(e) => http::build_500_response(&e.to_string()),
        },
    };

    if let Ok(value) = HeaderValue::from_str(&state.config.http.server_name) {
        response.headers_mut().insert(SERVER, value);
    }

    if state.config.logging.access_log {
        log_access(&req, &ctx, &response, peer_addr, started, &state.config.logging.access_log_format);
    }

    Ok(response)
}

/// Check HTTP method and return appropriate response for non-GET/HEAD methods
fn check_http_method(method: &Method, enable_cors: bool) -> Option<Response<Full<Bytes>>> {
    match *method {
        Method::GET | Method::HEAD => None,
        Method::OPTIONS => Some(http::build_options_response(enable_cors)),
        _ => {
            logger::log_warning(&format!("Method not allowed: {method}"));
            Some(http::build_405_response())
        }
    }
}

/// Route request based on path
async fn route_request(ctx: &RequestContext<'_>, storefront: &Storefront) -> Response<Full<Bytes>> {
    match ctx.path {
        "/" => match query_product_id(ctx.query) {
            Some(id) => {
                let target = format!("{PRODUCT_PREFIX}{}", urlencoding::encode(&id));
                http::build_redirect_response_with_code(&target, 301)
            }
            None => serve_catalog_page(ctx, storefront),
        },
        "/robots.txt" => {
            http::build_text_response(sitemap::robots(storefront.renderer.site()), ctx.is_head)
        }
        "/sitemap.xml" => serve_sitemap(ctx, storefront).await,
        "/api/config" => http::build_json_response(&storefront.client_config, ctx.is_head),
        path => match path.strip_prefix(PRODUCT_PREFIX).map(product_id_from_segment) {
            Some(Some(id)) => serve_product_page(ctx, storefront, &id).await,
            Some(None) => http::build_redirect_response_with_code("/", 301),
            None => http::build_404_response(),
        },
    }
}

/// `product` query parameter of the legacy URL scheme
fn query_product_id(query: Option<&str>) -> Option<String> {
    url::form_urlencoded::parse(query?.as_bytes())
        .find(|(key, _)| key == "product")
        .map(|(_, value)| value.trim().to_string())
        .filter(|id| !id.is_empty())
}

/// Decode the id segment of `/app/<id>`, tolerating one trailing slash
///
/// Invalid UTF-8 in the escapes is decoded lossily, so such an id simply
/// matches no product.
fn product_id_from_segment(segment: &str) -> Option<String> {
    let segment = segment.strip_suffix('/').unwrap_or(segment);
    let bytes = urlencoding::decode_binary(segment.as_bytes());
    let id = String::from_utf8_lossy(&bytes);
    let id = id.trim();
    if id.is_empty() {
        None
    } else {
        Some(id.to_string())
    }
}

fn serve_catalog_page(ctx: &RequestContext<'_>, storefront: &Storefront) -> Response<Full<Bytes>> {
    let renderer = &storefront.renderer;
    let meta = seo::resolve(renderer.site(), None, None, None);
    html_page(renderer.render(&meta, None, None), ctx.is_head)
}

/// Product page; an unknown id degrades to the default metadata with the catalog view
async fn serve_product_page(
    ctx: &RequestContext<'_>,
    storefront: &Storefront,
    id: &str,
) -> Response<Full<Bytes>> {
    let (product, settings) = tokio::join!(
        storefront.catalog.fetch_product(id),
        storefront.catalog.fetch_settings()
    );

    if product.is_none() {
        logger::log_debug(&format!("[Product] '{id}' unavailable, rendering defaults"));
    }

    let renderer = &storefront.renderer;
    let meta = seo::resolve(renderer.site(), Some(id), product.as_ref(), settings.as_ref());
    html_page(renderer.render(&meta, product.as_ref(), settings.as_ref()), ctx.is_head)
}

fn html_page(rendered: Result<String, askama::Error>, is_head: bool) -> Response<Full<Bytes>> {
    match rendered {
        Ok(html) => http::build_html_response(html, is_head),
        Err(e) => {
            logger::log_error(&format!("Failed to render page: {e}"));
            http::build_500_response("page rendering failed")
        }
    }
}

async fn serve_sitemap(ctx: &RequestContext<'_>, storefront: &Storefront) -> Response<Full<Bytes>> {
    let products = storefront.catalog.fetch_all_products().await;
    match sitemap::generate(storefront.renderer.site(), products.keys().map(String::as_str)) {
        Ok(xml) => http::build_xml_response(xml, ctx.is_head),
        Err(e) => {
            logger::log_error(&format!("Failed to write sitemap: {e}"));
            http::build_500_response("sitemap generation failed")
        }
    }
}

fn log_access<B>(
    req: &Request<B>,
    ctx: &RequestContext<'_>,
    response: &Response<Full<Bytes>>,
    peer_addr: SocketAddr,
    started: Instant,
    format: &str,
) {
    let header = |name: &str| {
        req.headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(ToString::to_string)
    };

    let mut entry = AccessLogEntry::new(
        peer_addr.ip().to_string(),
        req.method().to_string(),
        ctx.path.to_string(),
    );
    entry.query = ctx.query.map(ToString::to_string);
    entry.http_version = match req.version() {
        hyper::Version::HTTP_10 => "1.0",
        hyper::Version::HTTP_2 => "2",
        _ => "1.1",
    }
    .to_string();
    entry.status = response.status().as_u16();
    entry.body_bytes = usize::try_from(response.body().size_hint().exact().unwrap_or(0))
        .unwrap_or(usize::MAX);
    entry.referer = header("referer");
    entry.user_agent = header("user-agent");
    entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
    entry.product_id = ctx
        .path
        .strip_prefix(PRODUCT_PREFIX)
        .and_then(product_id_from_segment);

    logger::log_access(&entry, format);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::memory::MemoryCatalog;
    use crate::catalog::ProductRecord;
    use crate::config::{Config, ConfigError};
    use http_body_util::BodyExt;
    use hyper::StatusCode;

    fn config(base_url: Option<&str>) -> Config {
        let mut cfg = Config::load_from("does-not-exist/storefront").unwrap();
        cfg.catalog.base_url = base_url.map(ToString::to_string);
        cfg.catalog.client_config = None;
        cfg.site.root_url = "https://store.example.com".to_string();
        cfg.logging.access_log = false;
        cfg
    }

    fn catalog() -> MemoryCatalog {
        MemoryCatalog::default()
            .with_product(
                "sketch-pro",
                ProductRecord {
                    name: Some("Sketch Pro".to_string()),
                    short_desc: Some("Build apps on your phone".to_string()),
                    icon: Some("https://img.example.com/icon.png".to_string()),
                    ..ProductRecord::default()
                },
            )
            .with_product(
                "a&b",
                ProductRecord {
                    name: Some("Amp".to_string()),
                    ..ProductRecord::default()
                },
            )
            .with_apk_url("https://dl.example.com/store.apk")
    }

    fn state() -> Arc<AppState> {
        Arc::new(
            AppState::with_catalog(config(Some("https://db.example.com")), Arc::new(catalog()))
                .unwrap(),
        )
    }

    async fn call(state: Arc<AppState>, method: Method, uri: &str) -> (StatusCode, String) {
        let req = Request::builder().method(method).uri(uri).body(()).unwrap();
        let peer: SocketAddr = "127.0.0.1:40000".parse().unwrap();
        let resp = handle_request(req, state, peer).await.unwrap();
        let status = resp.status();
        let body = resp.into_body().collect().await.unwrap().to_bytes();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_catalog_page() {
        let (status, body) = call(state(), Method::GET, "/").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("id=\"product-grid\""));
        assert!(body.contains("<link rel=\"canonical\" href=\"https://store.example.com/\">"));
    }

    #[tokio::test]
    async fn test_product_page() {
        let (status, body) = call(state(), Method::GET, "/app/sketch-pro").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("<title>Sketch Pro - Download</title>"));
        assert!(body.contains("content=\"Build apps on your phone\""));
        assert!(body.contains("href=\"https://dl.example.com/store.apk\""));
        assert!(body.contains("application/ld+json"));
    }

    #[tokio::test]
    async fn test_encoded_product_id() {
        let (status, body) = call(state(), Method::GET, "/app/a%26b/").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("<title>Amp - Download</title>"));
        assert!(body.contains("https://store.example.com/app/a%26b"));
    }

    #[tokio::test]
    async fn test_unknown_product_degrades_to_defaults() {
        let state = state();
        let site = state.config.site.clone();
        let (status, body) = call(state, Method::GET, "/app/nope").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains(&format!("<title>{}</title>", site.default_title())));
        assert!(body.contains(&format!("content=\"{}\"", site.default_image())));
        assert!(!body.contains("application/ld+json"));
    }

    #[tokio::test]
    async fn test_undecodable_product_id_degrades_to_defaults() {
        let state = state();
        let site = state.config.site.clone();
        let (status, body) = call(state, Method::GET, "/app/%FF").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains(&format!("<title>{}</title>", site.default_title())));
        assert!(body.contains("id=\"product-grid\""));
    }

    #[tokio::test]
    async fn test_legacy_query_redirects() {
        let req = Request::builder().uri("/?product=a%26b").body(()).unwrap();
        let peer: SocketAddr = "127.0.0.1:40000".parse().unwrap();
        let resp = handle_request(req, state(), peer).await.unwrap();
        assert_eq!(resp.status(), StatusCode::MOVED_PERMANENTLY);
        assert_eq!(resp.headers()["Location"], "/app/a%26b");

        let (status, _) = call(state(), Method::GET, "/?product=").await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_empty_product_segment_redirects_home() {
        let (status, _) = call(state(), Method::GET, "/app/").await;
        assert_eq!(status, StatusCode::MOVED_PERMANENTLY);
    }

    #[tokio::test]
    async fn test_sitemap_and_robots() {
        let (status, xml) = call(state(), Method::GET, "/sitemap.xml").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(xml.matches("<url>").count(), 3);
        assert!(xml.contains("<loc>https://store.example.com/app/a%26b</loc>"));
        assert!(xml.contains("<loc>https://store.example.com/app/sketch-pro</loc>"));

        let (again_status, again) = call(state(), Method::GET, "/sitemap.xml").await;
        assert_eq!(again_status, StatusCode::OK);
        assert_eq!(xml, again);

        let (status, robots) = call(state(), Method::GET, "/robots.txt").await;
        assert_eq!(status, StatusCode::OK);
        assert!(robots.contains("Sitemap: https://store.example.com/sitemap.xml"));
    }

    #[tokio::test]
    async fn test_client_config() {
        let (status, body) = call(state(), Method::GET, "/api/config").await;
        assert_eq!(status, StatusCode::OK);
        let value: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(value["databaseURL"], "https://db.example.com");
    }

    #[tokio::test]
    async fn test_missing_base_url_is_500_everywhere() {
        let state = Arc::new(AppState {
            storefront: Err(ConfigError::MissingBaseUrl),
            config: config(None),
        });
        for path in ["/", "/app/sketch-pro", "/robots.txt", "/sitemap.xml", "/unknown"] {
            let (status, body) = call(Arc::clone(&state), Method::GET, path).await;
            assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR, "path {path}");
            assert!(body.contains("not configured"));
        }
    }

    #[tokio::test]
    async fn test_methods() {
        let (status, _) = call(state(), Method::POST, "/").await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        let (status, _) = call(state(), Method::OPTIONS, "/").await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, body) = call(state(), Method::HEAD, "/app/sketch-pro").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_path_is_404() {
        let (status, _) = call(state(), Method::GET, "/nope").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_server_header() {
        let req = Request::builder().uri("/robots.txt").body(()).unwrap();
        let peer: SocketAddr = "127.0.0.1:40000".parse().unwrap();
        let state = state();
        let name = state.config.http.server_name.clone();
        let resp = handle_request(req, state, peer).await.unwrap();
        assert_eq!(resp.headers()[SERVER], name.as_str());
    }
}
