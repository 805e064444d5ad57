//! Plain-text crawl report
//!
//! The report has two sections. "Sitemap" lists every distinct page that some
//! crawled page links to. "Assets" lists, for each crawled page, everything
//! that page references.

use crate::storage::{AssetIndex, Sitemap};
use std::collections::BTreeSet;
use std::io::Write;

/// Writes the sitemap and asset listing, everything sorted
pub fn write_report<W: Write>(
    sitemap: &Sitemap,
    assets: &AssetIndex,
    out: &mut W,
) -> std::io::Result<()> {
    let linked: BTreeSet<_> = sitemap.values().flatten().collect();

    writeln!(out, "Sitemap")?;
    for url in linked {
        writeln!(out, "{}", url)?;
    }
    writeln!(out)?;

    writeln!(out, "Assets")?;
    for (page, page_assets) in assets {
        writeln!(out, "Assets on {}", page)?;
        for asset in page_assets {
            writeln!(out, "{}", asset)?;
        }
        writeln!(out)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::url::canonicalize_str;

    fn render(sitemap: &Sitemap, assets: &AssetIndex) -> String {
        let mut buf = Vec::new();
        write_report(sitemap, assets, &mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_empty_report() {
        let out = render(&Sitemap::new(), &AssetIndex::new());
        assert_eq!(out, "Sitemap\n\nAssets\n");
    }

    #[test]
    fn test_report_sorted_and_deduplicated() {
        let root = canonicalize_str("http://test.com").unwrap();
        let b = canonicalize_str("http://test.com/b").unwrap();
        let a = canonicalize_str("http://test.com/a").unwrap();

        let mut sitemap = Sitemap::new();
        sitemap.insert(root.clone(), [b.clone(), a.clone()].into_iter().collect());
        sitemap.insert(a.clone(), [b.clone()].into_iter().collect());

        let mut assets = AssetIndex::new();
        assets.insert(
            root.clone(),
            ["http://test.com/z.css", "http://test.com/a"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        );
        assets.insert(a.clone(), ["http://test.com/b".to_string()].into_iter().collect());

        let out = render(&sitemap, &assets);
        let expected = "Sitemap\n\
                        http://test.com/a\n\
                        http://test.com/b\n\
                        \n\
                        Assets\n\
                        Assets on http://test.com\n\
                        http://test.com/a\n\
                        http://test.com/z.css\n\
                        \n\
                        Assets on http://test.com/a\n\
                        http://test.com/b\n\
                        \n";
        assert_eq!(out, expected);
    }
}
