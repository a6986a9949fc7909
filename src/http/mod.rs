//! HTTP protocol layer module
//!
//! Provides HTTP response builders, decoupled from specific business logic.

pub mod response;

// Re-export commonly used builders
pub use response::{
    build_404_response, build_405_response, build_500_response, build_html_response,
    build_json_response, build_options_response, build_redirect_response_with_code,
    build_text_response, build_xml_response,
};
