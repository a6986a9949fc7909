//! Page renderer
//!
//! Composes head metadata, the product or catalog body, and the static
//! stylesheet into one HTML document through the `page.html` template.
//! Template values are HTML-escaped by askama; link targets from the catalog
//! additionally pass `safe_url`, and missing data degrades to placeholders.

use askama::Template;

use super::description::format_description;
use super::escape::{json_for_script, safe_url};
use super::theme::Theme;
use crate::catalog::{ProductRecord, SettingsRecord};
use crate::config::SiteConfig;
use crate::seo::MetadataBundle;

/// Renders every HTML page of the storefront
#[derive(Debug, Clone)]
pub struct PageRenderer {
    site: SiteConfig,
    theme: Theme,
    /// Document store base the catalog page's script reads from
    catalog_base_url: String,
}

#[derive(Template)]
#[template(path = "page.html")]
struct PageTemplate<'a> {
    meta: &'a MetadataBundle,
    site_name: &'a str,
    theme_color: &'a str,
    css_variables: String,
    styles: &'static str,
    /// JSON-LD, already safe for a script element
    structured_data: Option<String>,
    product: Option<ProductView<'a>>,
    catalog_url_json: String,
    catalog_script: &'static str,
}

/// Product fields resolved for display
struct ProductView<'a> {
    name: &'a str,
    icon: &'a str,
    rating: &'a str,
    screenshots: Vec<&'a str>,
    /// Output of the description formatter, which escapes its own text
    description_html: String,
    demo_url: Option<&'a str>,
    install_url: &'a str,
}

impl PageRenderer {
    pub fn new(site: SiteConfig, theme: Theme, catalog_base_url: impl Into<String>) -> Self {
        Self {
            site,
            theme,
            catalog_base_url: catalog_base_url.into(),
        }
    }

    pub const fn site(&self) -> &SiteConfig {
        &self.site
    }

    /// Render a full document; the product branch is chosen when a record is present
    pub fn render(
        &self,
        metadata: &MetadataBundle,
        product: Option<&ProductRecord>,
        settings: Option<&SettingsRecord>,
    ) -> Result<String, askama::Error> {
        let product = product.map(|record| self.product_view(record, settings));
        let structured_data = product
            .as_ref()
            .and(metadata.structured_data.as_ref())
            .map(json_for_script);

        PageTemplate {
            meta: metadata,
            site_name: self.site.name(),
            theme_color: &self.theme.primary,
            css_variables: self.theme.css_variables(),
            styles: STYLES,
            structured_data,
            product,
            catalog_url_json: json_for_script(&serde_json::Value::String(
                self.catalog_base_url.clone(),
            )),
            catalog_script: CATALOG_SCRIPT,
        }
        .render()
    }

    fn product_view<'a>(
        &'a self,
        record: &'a ProductRecord,
        settings: Option<&'a SettingsRecord>,
    ) -> ProductView<'a> {
        ProductView {
            name: record.name().unwrap_or_else(|| self.site.name()),
            icon: record
                .icon
                .as_deref()
                .and_then(safe_url)
                .unwrap_or_else(|| self.site.default_image()),
            rating: record.rating(),
            screenshots: record.screenshots().filter_map(safe_url).collect(),
            description_html: format_description(record.full_desc.as_deref()),
            demo_url: record.demo_url().and_then(safe_url),
            install_url: settings
                .and_then(SettingsRecord::apk_url)
                .and_then(safe_url)
                .unwrap_or("#"),
        }
    }
}

const STYLES: &str = r"* { box-sizing: border-box; -webkit-tap-highlight-color: transparent; }
body { margin: 0; font-family: 'Plus Jakarta Sans', sans-serif; background: var(--bg-body); color: var(--text-main); padding-bottom: 90px; }
a { text-decoration: none; color: inherit; }
header { position: sticky; top: 0; z-index: 100; background: var(--bg-card); border-bottom: 1px solid var(--border); padding: 12px 20px; }
.nav-container { max-width: 800px; margin: 0 auto; display: flex; align-items: center; justify-content: space-between; gap: 12px; }
.logo { font-weight: 800; font-size: 20px; background: linear-gradient(135deg, var(--primary), var(--accent)); -webkit-background-clip: text; -webkit-text-fill-color: transparent; }
.search-wrapper { position: relative; width: 60%; max-width: 400px; }
.search-wrapper input { width: 100%; padding: 10px 15px 10px 40px; border-radius: 20px; border: 1px solid var(--border); background: var(--surface); color: var(--text-main); outline: none; }
.search-wrapper i { position: absolute; left: 14px; top: 50%; transform: translateY(-50%); color: var(--text-sub); }
.container { max-width: 800px; margin: 0 auto; padding: 20px; }
.grid { display: grid; grid-template-columns: repeat(auto-fill, minmax(160px, 1fr)); gap: 15px; }
.card { background: var(--bg-card); border-radius: 20px; padding: 16px; display: flex; flex-direction: column; align-items: center; text-align: center; border: 1px solid var(--border); transition: transform 0.3s; }
.card:hover { transform: translateY(-5px); border-color: var(--primary); }
.card-skeleton { height: 180px; }
.card-icon { width: 72px; height: 72px; border-radius: 18px; margin-bottom: 12px; object-fit: cover; }
.card-title { font-weight: 700; font-size: 15px; margin-bottom: 5px; }
.rating { font-size: 12px; color: var(--text-sub); background: var(--surface); padding: 2px 8px; border-radius: 8px; }
.rating i { color: #fbbf24; }
.no-results { display: none; text-align: center; padding: 50px; color: var(--text-sub); }
.p-header { background: var(--bg-card); padding: 30px 20px; border-bottom: 1px solid var(--border); display: flex; gap: 20px; align-items: center; }
.p-icon { width: 90px; height: 90px; border-radius: 22px; object-fit: cover; }
.p-meta h1 { margin: 0 0 5px; font-size: 22px; font-weight: 800; line-height: 1.2; }
.verified { color: var(--primary); font-weight: 600; margin-left: 8px; }
.scroller { display: flex; gap: 12px; overflow-x: auto; padding: 10px 0; scrollbar-width: none; }
.screen { height: 280px; border-radius: 12px; border: 1px solid var(--border); }
.screen-placeholder { height: 120px; flex: 1; display: flex; align-items: center; justify-content: center; border-radius: 12px; border: 1px dashed var(--border); color: var(--text-sub); }
.desc-box { background: var(--bg-card); padding: 20px; border-radius: 16px; border: 1px solid var(--border); line-height: 1.7; margin-top: 15px; }
.desc-box a { color: var(--primary); text-decoration: underline; }
.desc-box img { max-width: 100%; border-radius: 8px; margin: 10px 0; }
.bottom-bar { position: fixed; bottom: 0; left: 0; right: 0; background: var(--bg-card); padding: 15px 20px; border-top: 1px solid var(--border); display: flex; gap: 10px; justify-content: center; }
.btn { flex: 1; max-width: 380px; padding: 14px; border-radius: 14px; font-weight: 700; font-size: 15px; display: flex; align-items: center; justify-content: center; gap: 8px; }
.btn-demo { background: var(--surface); color: var(--text-main); }
.btn-install { background: var(--primary); color: #ffffff; }
.skeleton { background: linear-gradient(90deg, var(--surface) 25%, var(--border) 50%, var(--surface) 75%); background-size: 200% 100%; animation: loading 1.5s infinite; border-radius: 12px; }
.skeleton-icon { width: 60px; height: 60px; margin-bottom: 10px; }
.skeleton-line { width: 80%; height: 15px; }
@keyframes loading { 0% { background-position: 200% 0; } 100% { background-position: -200% 0; } }
";

const CATALOG_SCRIPT: &str = r"(function () {
  var grid = document.getElementById('product-grid');
  var empty = document.getElementById('no-results');
  var search = document.getElementById('searchInput');
  var apps = {};

  function card(id, app) {
    var link = document.createElement('a');
    link.className = 'card';
    link.href = '/app/' + encodeURIComponent(id);
    var icon = document.createElement('img');
    icon.className = 'card-icon';
    icon.loading = 'lazy';
    icon.alt = '';
    icon.src = app.icon || '';
    var title = document.createElement('div');
    title.className = 'card-title';
    title.textContent = app.name || id;
    var rating = document.createElement('div');
    rating.className = 'rating';
    rating.textContent = '★ ' + (app.rating || '4.5');
    link.appendChild(icon);
    link.appendChild(title);
    link.appendChild(rating);
    return link;
  }

  function render(query) {
    grid.textContent = '';
    var shown = 0;
    Object.keys(apps).forEach(function (id) {
      var app = apps[id];
      if (!app) return;
      if (query && String(app.name || '').toLowerCase().indexOf(query) === -1) return;
      grid.appendChild(card(id, app));
      shown++;
    });
    empty.style.display = shown ? 'none' : 'block';
  }

  search.addEventListener('input', function () {
    render(search.value.trim().toLowerCase());
  });

  fetch(CATALOG_URL + '/apps.json')
    .then(function (res) { return res.json(); })
    .then(function (data) { apps = data || {}; render(''); })
    .catch(function (err) { console.error(err); render(''); });
})();
";
