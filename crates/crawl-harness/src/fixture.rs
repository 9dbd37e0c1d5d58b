//! A small on-disk site with known crawl results.
//!
//! ```text
//! index.html (0) ── a.html (1) ── c.html (2) ── d.html (3) ── e.html (4)
//!      │                            │
//!      └────────── b.html (1) ──────┘
//! ```
//!
//! `e.html` sits below the depth limit. The site also carries a duplicate
//! image, a missing image, a missing page, a non-HTML link, an empty image,
//! a link cycle back to the root and links the crawler must ignore.

use image_crawler::{CrawlCounts, CrawlerConfig, TransformKind};
use std::fs;
use std::io;
use std::path::Path;
use tempfile::TempDir;
use tracing::debug;

pub const MAX_DEPTH: u32 = 3;

const PNG_MAGIC: &[u8] = b"\x89PNG\r\n\x1a\n";

const PAGES: &[(&str, &str)] = &[
    (
        "index.html",
        r##"<html><head><title>Fixture</title></head><body>
<a href="#top">top</a>
<img src="img/logo.png"><img src="img/banner.png"><img src="img/missing.png">
<a href="a.html">A</a> <a href="b.html">B</a>
<a href="missing.html">missing</a>
<a href="mailto:grader@example.com">mail</a>
</body></html>"##,
    ),
    (
        "a.html",
        r#"<html><body>
<img src="img/logo.png"><img src="img/a1.png">
<a href="c.html">C</a> <a href="index.html">home</a>
</body></html>"#,
    ),
    (
        "b.html",
        r#"<html><body>
<img src="img/b1.png"><img src="img/b2.jpg">
<a href="c.html">C</a> <a href="doc.txt">doc</a>
</body></html>"#,
    ),
    (
        "c.html",
        r#"<html><body>
<img src="img/c1.png"><img src="img/empty.png">
<a href="d.html">D</a>
</body></html>"#,
    ),
    (
        "d.html",
        r#"<html><body><img src="img/d1.png"><a href="e.html">E</a></body></html>"#,
    ),
    (
        "e.html",
        r#"<html><body><img src="img/e1.png"></body></html>"#,
    ),
];

const IMAGES: &[&str] = &[
    "img/logo.png",
    "img/banner.png",
    "img/a1.png",
    "img/b1.png",
    "img/b2.jpg",
    "img/c1.png",
    "img/d1.png",
    "img/e1.png",
];

pub struct FixtureSite {
    dir: TempDir,
}

impl FixtureSite {
    pub fn create() -> io::Result<Self> {
        let dir = tempfile::Builder::new().prefix("crawl-fixture").tempdir()?;
        let root = dir.path();

        fs::create_dir_all(root.join("img"))?;
        for (name, html) in PAGES {
            fs::write(root.join(name), html)?;
        }
        for name in IMAGES {
            let mut payload = PNG_MAGIC.to_vec();
            payload.extend_from_slice(name.as_bytes());
            fs::write(root.join(name), payload)?;
        }
        fs::write(root.join("img/empty.png"), b"")?;
        fs::write(root.join("doc.txt"), "plain text")?;

        debug!("Created fixture site at {}", root.display());
        Ok(Self { dir })
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn config(&self) -> CrawlerConfig {
        CrawlerConfig::local(self.root())
            .with_max_depth(MAX_DEPTH)
            .with_transforms(vec![TransformKind::Identity, TransformKind::Invert])
    }

    /// Counts every strategy must report for [`FixtureSite::config`].
    pub fn expected() -> CrawlCounts {
        CrawlCounts {
            // Seven non-empty images through both transforms, plus the
            // empty image through identity only.
            images_transformed: 15,
            pages_crawled: 5,
            images_downloaded: 8,
        }
    }
}
