//! HTTP response building module
//!
//! Builders for every response the storefront sends, decoupled from routing.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};

/// Build 200 response with the given content type; HEAD keeps the length but drops the body
pub fn build_body_response(
    content: impl Into<Bytes>,
    content_type: &str,
    is_head: bool,
) -> Response<Full<Bytes>> {
    let content = content.into();
    let content_length = content.len();
    let body = if is_head { Bytes::new() } else { content };

    Response::builder()
        .status(StatusCode::OK)
        .header("Content-Type", content_type)
        .header("Content-Length", content_length)
        .body(Full::new(body))
        .unwrap_or_else(|e| {
            log_build_error("200", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build generic HTML response
pub fn build_html_response(content: String, is_head: bool) -> Response<Full<Bytes>> {
    build_body_response(content, "text/html; charset=utf-8", is_head)
}

/// Build plain text response
pub fn build_text_response(content: String, is_head: bool) -> Response<Full<Bytes>> {
    build_body_response(content, "text/plain; charset=utf-8", is_head)
}

/// Build XML response
pub fn build_xml_response(content: String, is_head: bool) -> Response<Full<Bytes>> {
    build_body_response(content, "application/xml; charset=utf-8", is_head)
}

/// Build JSON response
pub fn build_json_response(value: &serde_json::Value, is_head: bool) -> Response<Full<Bytes>> {
    build_body_response(value.to_string(), "application/json", is_head)
}

/// Build 404 Not Found response
pub fn build_404_response() -> Response<Full<Bytes>> {
    build_plain_status(StatusCode::NOT_FOUND, "404 Not Found")
}

/// Build 405 Method Not Allowed response
pub fn build_405_response() -> Response<Full<Bytes>> {
    Response::builder()
        .status(StatusCode::METHOD_NOT_ALLOWED)
        .header("Content-Type", "text/plain")
        .header("Allow", "GET, HEAD, OPTIONS")
        .body(Full::new(Bytes::from("405 Method Not Allowed")))
        .unwrap_or_else(|e| {
            log_build_error("405", &e);
            Response::new(Full::new(Bytes::from("405 Method Not Allowed")))
        })
}

/// Build 500 response carrying a short diagnostic
pub fn build_500_response(diagnostic: &str) -> Response<Full<Bytes>> {
    build_plain_status(
        StatusCode::INTERNAL_SERVER_ERROR,
        &format!("500 Internal Server Error: {diagnostic}"),
    )
}

/// Build OPTIONS response (preflight request)
pub fn build_options_response(enable_cors: bool) -> Response<Full<Bytes>> {
    let mut builder = Response::builder()
        .status(StatusCode::NO_CONTENT)
        .header("Allow", "GET, HEAD, OPTIONS");

    if enable_cors {
        builder = builder
            .header("Access-Control-Allow-Origin", "*")
            .header("Access-Control-Allow-Methods", "GET, HEAD, OPTIONS")
            .header("Access-Control-Allow-Headers", "Content-Type")
            .header("Access-Control-Max-Age", "86400");
    }

    builder.body(Full::new(Bytes::new())).unwrap_or_else(|e| {
        log_build_error("OPTIONS", &e);
        Response::new(Full::new(Bytes::new()))
    })
}

/// Build redirect response with custom status code
pub fn build_redirect_response_with_code(target: &str, code: u16) -> Response<Full<Bytes>> {
    Response::builder()
        .status(code)
        .header("Location", target)
        .header("Content-Type", "text/plain")
        .body(Full::new(Bytes::from("Redirecting...")))
        .unwrap_or_else(|e| {
            log_build_error(&code.to_string(), &e);
            Response::new(Full::new(Bytes::from("Redirecting...")))
        })
}

fn build_plain_status(status: StatusCode, body: &str) -> Response<Full<Bytes>> {
    Response::builder()
        .status(status)
        .header("Content-Type", "text/plain; charset=utf-8")
        .body(Full::new(Bytes::from(body.to_string())))
        .unwrap_or_else(|e| {
            log_build_error(status.as_str(), &e);
            Response::new(Full::new(Bytes::from(body.to_string())))
        })
}

/// Log response build error
fn log_build_error(status: &str, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}
