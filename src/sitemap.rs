//! Sitemap and robots documents
//!
//! The sitemap lists the site root followed by one canonical URL per catalog
//! key. Entry order follows the iterator passed in.

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::writer::Writer;

use crate::config::SiteConfig;

const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

/// Build the `urlset` document for the given catalog keys
pub fn generate<'a, I>(site: &SiteConfig, product_ids: I) -> Result<String, quick_xml::Error>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    writer.write_event(Event::Start(
        BytesStart::new("urlset").with_attributes([("xmlns", SITEMAP_NS)]),
    ))?;

    write_url(&mut writer, &site.home_url(), "daily", "1.0")?;
    for id in product_ids {
        write_url(&mut writer, &site.product_url(id), "weekly", "0.8")?;
    }

    writer.write_event(Event::End(BytesEnd::new("urlset")))?;

    let mut xml = String::from_utf8_lossy(&writer.into_inner()).into_owned();
    xml.push('\n');
    Ok(xml)
}

fn write_url<W: std::io::Write>(
    writer: &mut Writer<W>,
    loc: &str,
    changefreq: &str,
    priority: &str,
) -> Result<(), quick_xml::Error> {
    writer.write_event(Event::Start(BytesStart::new("url")))?;
    for (name, value) in [("loc", loc), ("changefreq", changefreq), ("priority", priority)] {
        writer.write_event(Event::Start(BytesStart::new(name)))?;
        // BytesText::new escapes markup characters on write
        writer.write_event(Event::Text(BytesText::new(value)))?;
        writer.write_event(Event::End(BytesEnd::new(name)))?;
    }
    writer.write_event(Event::End(BytesEnd::new("url")))?;
    Ok(())
}

/// robots.txt pointing crawlers at the sitemap
pub fn robots(site: &SiteConfig) -> String {
    format!(
        "User-agent: *\nAllow: /\n\nSitemap: {}/sitemap.xml\n",
        site.root()
    )
}
