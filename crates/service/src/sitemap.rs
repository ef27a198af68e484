//! `sitemap.xml` assembly from the site base URL and the current cat ids.

pub const STATIC_PATHS: &[&str] = &["/", "/adopt", "/report-stray", "/vets", "/donate", "/volunteer"];

/// Absolute URLs for the static pages followed by one detail page per cat.
/// Cat ids are percent-encoded as a single path segment.
pub fn sitemap_urls<S: AsRef<str>>(base_url: &str, cat_ids: &[S]) -> Vec<String> {
    let base = base_url.trim().trim_end_matches('/');
    STATIC_PATHS
        .iter()
        .map(|p| if *p == "/" { format!("{base}/") } else { format!("{base}{p}") })
        .chain(cat_ids.iter().map(|id| format!("{base}/adopt/{}", urlencoding::encode(id.as_ref()))))
        .collect()
}

pub fn build_sitemap<S: AsRef<str>>(base_url: &str, cat_ids: &[S]) -> String {
    let mut xml = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    xml.push_str("<urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n");
    for url in sitemap_urls(base_url, cat_ids) {
        xml.push_str("  <url><loc>");
        xml.push_str(&escape_xml(&url));
        xml.push_str("</loc></url>\n");
    }
    xml.push_str("</urlset>\n");
    xml
}

fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}
