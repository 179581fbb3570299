use chrono::NaiveDate;

use crate::models::user::PublishedHandle;

// Handles are restricted to [A-Za-z0-9-], so nothing here needs XML
// escaping.
fn push_url(out: &mut String, loc: &str, lastmod: NaiveDate, priority: &str) {
    out.push_str("  <url>\n");
    out.push_str(&format!("    <loc>{loc}</loc>\n"));
    out.push_str(&format!("    <lastmod>{}</lastmod>\n", lastmod.format("%Y-%m-%d")));
    out.push_str("    <changefreq>weekly</changefreq>\n");
    out.push_str(&format!("    <priority>{priority}</priority>\n"));
    out.push_str("  </url>\n");
}

/// Renders the sitemap: the landing page plus one entry per published
/// handle. Entries missing a freshness stamp fall back to today.
pub fn render_sitemap(base_url: &str, today: NaiveDate, entries: &[PublishedHandle]) -> String {
    let base = base_url.trim_end_matches('/');

    let mut out = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
        <urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n",
    );

    push_url(&mut out, base, today, "1.0");
    for entry in entries {
        let lastmod = entry.updated_at.map(|ts| ts.date()).unwrap_or(today);
        push_url(&mut out, &format!("{base}/u/{}", entry.handle), lastmod, "0.6");
    }

    out.push_str("</urlset>\n");
    out
}

pub fn render_robots(base_url: &str) -> String {
    let base = base_url.trim_end_matches('/');
    format!("User-agent: *\nAllow: /\nSitemap: {base}/sitemap.xml\n")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    #[test]
    fn sitemap_lists_root_and_published_handles() {
        let today = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let entries = vec![
            PublishedHandle {
                handle: "ada-dev".into(),
                updated_at: NaiveDate::from_ymd_opt(2025, 5, 20)
                    .unwrap()
                    .and_hms_opt(12, 30, 0),
            },
            PublishedHandle {
                handle: "grace".into(),
                updated_at: None,
            },
        ];

        let xml = render_sitemap("http://localhost:3000/", today, &entries);

        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(xml.contains("<loc>http://localhost:3000</loc>"));
        assert!(xml.contains("<loc>http://localhost:3000/u/ada-dev</loc>"));
        assert!(xml.contains("<lastmod>2025-05-20</lastmod>"));
        assert!(xml.contains("<loc>http://localhost:3000/u/grace</loc>"));
        assert!(xml.contains("<lastmod>2025-06-01</lastmod>"));
        assert!(xml.contains("<priority>1.0</priority>"));
        assert!(xml.contains("<priority>0.6</priority>"));
        assert!(xml.ends_with("</urlset>\n"));
    }

    #[test]
    fn robots_points_at_the_sitemap() {
        let robots = render_robots("https://devfolio.example");
        assert_eq!(
            robots,
            "User-agent: *\nAllow: /\nSitemap: https://devfolio.example/sitemap.xml\n"
        );
    }
}
