//! Request handler module
//!
//! Maps incoming paths and query parameters onto the catalog, metadata,
//! rendering and sitemap components.

pub mod router;

// Re-export main entry point
pub use router::handle_request;
