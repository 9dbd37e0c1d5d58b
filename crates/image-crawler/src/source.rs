use bytes::Bytes;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use url::Url;

use crate::{CrawlerError, Image, Page, Result};

/// Where pages and images come from.
///
/// `Ok(None)` means "not there": the crawl counts it as zero images and
/// moves on. Errors abort the crawl.
pub trait PageSource: Send + Sync {
    /// Entry point for a crawl that was not given an explicit root.
    fn root_url(&self) -> Result<Url>;

    fn get_page(&self, url: &Url) -> Result<Option<Page>>;

    fn get_image(&self, url: &Url) -> Result<Option<Image>>;
}

/// Serves `file://` URLs from a directory on the local file system.
#[derive(Debug, Clone)]
pub struct LocalPageSource {
    root: PathBuf,
    root_page: String,
    max_content_size: usize,
}

impl LocalPageSource {
    pub fn new(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().canonicalize()?;
        info!("Serving local pages from {}", root.display());

        Ok(Self {
            root,
            root_page: "index.html".to_string(),
            max_content_size: 10 * 1024 * 1024, // 10MB
        })
    }

    pub fn with_root_page(mut self, root_page: impl Into<String>) -> Self {
        self.root_page = root_page.into();
        self
    }

    pub fn with_max_content_size(mut self, max: usize) -> Self {
        self.max_content_size = max;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// URL of a file relative to the root directory.
    pub fn url_for(&self, relative: &str) -> Result<Url> {
        let path = self.root.join(relative);
        Url::from_file_path(&path)
            .map_err(|_| CrawlerError::InvalidUrl(path.display().to_string()))
    }

    fn resolve(&self, url: &Url) -> Option<PathBuf> {
        if url.scheme() != "file" {
            debug!("Skipping {} - not a local URL", url);
            return None;
        }

        let path = url.to_file_path().ok()?;
        if !path.starts_with(&self.root) {
            debug!("Skipping {} - outside {}", url, self.root.display());
            return None;
        }

        Some(path)
    }

    fn read(&self, path: &Path) -> Result<Option<Bytes>> {
        if path.is_dir() {
            return Ok(None);
        }

        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("Not found: {}", path.display());
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        if bytes.len() > self.max_content_size {
            return Err(CrawlerError::ContentTooLarge {
                size: bytes.len(),
                max: self.max_content_size,
            });
        }

        Ok(Some(Bytes::from(bytes)))
    }
}

fn is_html(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("html") || ext.eq_ignore_ascii_case("htm"))
        .unwrap_or(false)
}

impl PageSource for LocalPageSource {
    fn root_url(&self) -> Result<Url> {
        self.url_for(&self.root_page)
    }

    fn get_page(&self, url: &Url) -> Result<Option<Page>> {
        let Some(path) = self.resolve(url) else {
            return Ok(None);
        };
        if !is_html(&path) {
            debug!("Skipping {} - not an HTML page", url);
            return Ok(None);
        }

        Ok(self
            .read(&path)?
            .map(|bytes| Page::new(url.clone(), String::from_utf8_lossy(&bytes))))
    }

    fn get_image(&self, url: &Url) -> Result<Option<Image>> {
        let Some(path) = self.resolve(url) else {
            return Ok(None);
        };

        Ok(self.read(&path)?.map(|bytes| Image::new(url.clone(), bytes)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_reads_pages_and_images() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("index.html"), "<html><body>hi</body></html>").unwrap();
        fs::write(dir.path().join("logo.png"), [1u8, 2, 3]).unwrap();

        let source = LocalPageSource::new(dir.path()).unwrap();
        let root = source.root_url().unwrap();

        let page = source.get_page(&root).unwrap().unwrap();
        assert!(page.html().contains("hi"));

        let image = source
            .get_image(&source.url_for("logo.png").unwrap())
            .unwrap()
            .unwrap();
        assert_eq!(&image.bytes()[..], &[1, 2, 3]);
    }

    #[test]
    fn test_missing_and_foreign_urls_are_absent() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("notes.txt"), "plain").unwrap();
        let source = LocalPageSource::new(dir.path()).unwrap();

        let missing = source.url_for("missing.html").unwrap();
        assert!(source.get_page(&missing).unwrap().is_none());

        let text = source.url_for("notes.txt").unwrap();
        assert!(source.get_page(&text).unwrap().is_none());

        let remote = Url::parse("https://example.com/index.html").unwrap();
        assert!(source.get_page(&remote).unwrap().is_none());

        let outside = Url::from_file_path(dir.path().parent().unwrap().join("x.png")).unwrap();
        assert!(source.get_image(&outside).unwrap().is_none());
    }

    #[test]
    fn test_content_size_limit() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("big.png"), vec![0u8; 64]).unwrap();
        let source = LocalPageSource::new(dir.path())
            .unwrap()
            .with_max_content_size(16);

        let err = source
            .get_image(&source.url_for("big.png").unwrap())
            .unwrap_err();
        assert!(matches!(err, CrawlerError::ContentTooLarge { size: 64, max: 16 }));
    }
}
