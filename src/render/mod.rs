//! HTML rendering
//!
//! The page template, the description markup formatter, the theme and the
//! script/link safety helpers.

pub mod description;
pub mod escape;
pub mod page;
pub mod theme;

pub use page::PageRenderer;
pub use theme::Theme;
