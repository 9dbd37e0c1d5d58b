use scraper::{Html, Selector};
use tracing::debug;
use url::Url;

use crate::{CrawlerError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    Image,
    Page,
}

/// An image or hyperlink found on a page, resolved against the page URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebElement {
    pub kind: ElementKind,
    pub url: Url,
}

// HTML is kept as text and parsed on demand, since the parsed DOM is not Send.
#[derive(Debug, Clone)]
pub struct Page {
    url: Url,
    html: String,
}

impl Page {
    pub fn new(url: Url, html: impl Into<String>) -> Self {
        Self {
            url,
            html: html.into(),
        }
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn html(&self) -> &str {
        &self.html
    }

    /// Returns the `<img src>` and `<a href>` elements of the requested
    /// kinds in document order.
    pub fn page_elements(&self, kinds: &[ElementKind]) -> Result<Vec<WebElement>> {
        let selector = Selector::parse("img[src], a[href]")
            .map_err(|e| CrawlerError::ParseError(format!("Invalid selector: {:?}", e)))?;
        let document = Html::parse_document(&self.html);

        let elements = document
            .select(&selector)
            .filter_map(|el| {
                let (kind, attr) = match el.value().name() {
                    "img" => (ElementKind::Image, "src"),
                    _ => (ElementKind::Page, "href"),
                };
                if !kinds.contains(&kind) {
                    return None;
                }
                let url = self.resolve(el.value().attr(attr)?)?;
                Some(WebElement { kind, url })
            })
            .collect::<Vec<_>>();

        debug!("Found {} elements on {}", elements.len(), self.url);
        Ok(elements)
    }

    fn resolve(&self, href: &str) -> Option<Url> {
        let mut url = self.url.join(href.trim()).ok()?;

        match url.scheme() {
            "http" | "https" | "file" => {
                url.set_fragment(None);
                Some(url)
            }
            _ => {
                debug!("Skipping unsupported link {} on {}", href, self.url);
                None
            }
        }
    }
}
