//! Page theme
//!
//! One template serves every page; the theme only feeds its CSS variables.

use crate::config::{ThemeConfig, ThemeMode};

const FALLBACK_PRIMARY: &str = "#6366f1";
const FALLBACK_ACCENT: &str = "#a855f7";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    pub primary: String,
    pub accent: String,
    pub mode: ThemeMode,
}

impl Theme {
    pub fn from_config(cfg: &ThemeConfig) -> Self {
        Self {
            primary: css_color(&cfg.primary_color, FALLBACK_PRIMARY),
            accent: css_color(&cfg.accent_color, FALLBACK_ACCENT),
            mode: cfg.mode,
        }
    }

    /// `:root` block with the palette for this theme
    pub fn css_variables(&self) -> String {
        let (bg_body, bg_card, text_main, text_sub, border, surface) = match self.mode {
            ThemeMode::Light => ("#f8fafc", "#ffffff", "#0f172a", "#64748b", "#e2e8f0", "#f1f5f9"),
            ThemeMode::Dark => ("#0b1120", "#111827", "#f1f5f9", "#94a3b8", "#1f2937", "#1e293b"),
        };
        format!(
            ":root {{ --primary: {}; --accent: {}; --bg-body: {bg_body}; --bg-card: {bg_card}; \
             --text-main: {text_main}; --text-sub: {text_sub}; --border: {border}; \
             --surface: {surface}; }}\n",
            self.primary, self.accent
        )
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            primary: FALLBACK_PRIMARY.to_string(),
            accent: FALLBACK_ACCENT.to_string(),
            mode: ThemeMode::Light,
        }
    }
}

/// Accept hex, named and functional colors; anything that could break out of
/// the declaration falls back
fn css_color(value: &str, fallback: &str) -> String {
    let value = value.trim();
    let allowed = |c: char| c.is_ascii_alphanumeric() || matches!(c, '#' | '(' | ')' | ',' | '.' | '%' | ' ');
    if value.is_empty() || !value.chars().all(allowed) {
        fallback.to_string()
    } else {
        value.to_string()
    }
}
