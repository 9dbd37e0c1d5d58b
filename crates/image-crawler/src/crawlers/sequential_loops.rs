use tracing::debug;
use url::Url;

use crate::{CrawlContext, CrawlStrategy, CrawlerStrategyKind, ElementKind, Result};

/// Depth-first crawl on the calling thread using plain loops.
#[derive(Debug, Clone, Copy, Default)]
pub struct SequentialLoopsCrawler;

impl SequentialLoopsCrawler {
    fn perform_crawl(&self, ctx: &CrawlContext, url: &Url, depth: u32) -> Result<usize> {
        ctx.check_cancelled()?;
        debug!("Crawling {} (depth {})", url, depth);

        if !ctx.should_crawl(url, depth) {
            return Ok(0);
        }

        let page = match ctx.get_page(url)? {
            Some(page) => page,
            None => return Ok(0),
        };

        let mut count = 0;
        for element in page.page_elements(&[ElementKind::Image, ElementKind::Page])? {
            count += match element.kind {
                ElementKind::Image => self.process_image(ctx, &element.url)?,
                ElementKind::Page => self.perform_crawl(ctx, &element.url, depth + 1)?,
            };
        }
        Ok(count)
    }

    fn process_image(&self, ctx: &CrawlContext, url: &Url) -> Result<usize> {
        let image = match ctx.get_image(url)? {
            Some(image) => image,
            None => return Ok(0),
        };

        let mut count = 0;
        for transform in ctx.transforms() {
            if !ctx.create_new_item(&image, transform.as_ref()) {
                continue;
            }
            if ctx.apply_transform(transform.as_ref(), &image).is_some() {
                count += 1;
            }
        }
        Ok(count)
    }
}

impl CrawlStrategy for SequentialLoopsCrawler {
    fn kind(&self) -> CrawlerStrategyKind {
        CrawlerStrategyKind::SequentialLoops
    }

    fn crawl(&self, ctx: &CrawlContext, root: &Url) -> Result<usize> {
        self.perform_crawl(ctx, root, 0)
    }
}
