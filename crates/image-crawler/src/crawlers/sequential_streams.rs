use std::iter;
use tracing::debug;
use url::Url;

use crate::{
    CrawlContext, CrawlStrategy, CrawlerStrategyKind, ElementKind, Image, Page, Result,
};

/// Depth-first crawl on the calling thread, written as iterator pipelines.
#[derive(Debug, Clone, Copy, Default)]
pub struct SequentialStreamsCrawler;

impl SequentialStreamsCrawler {
    fn perform_crawl(&self, ctx: &CrawlContext, url: &Url, depth: u32) -> Result<usize> {
        ctx.check_cancelled()?;
        debug!("Crawling {} (depth {})", url, depth);

        iter::once(url)
            .filter(|url| ctx.should_crawl(url, depth))
            .map(|url| self.crawl_page(ctx, url, depth))
            .next()
            .unwrap_or(Ok(0))
    }

    fn crawl_page(&self, ctx: &CrawlContext, url: &Url, depth: u32) -> Result<usize> {
        ctx.get_page(url)?
            .map(|page| self.process_page(ctx, &page, depth))
            .unwrap_or(Ok(0))
    }

    fn process_page(&self, ctx: &CrawlContext, page: &Page, depth: u32) -> Result<usize> {
        page.page_elements(&[ElementKind::Image, ElementKind::Page])?
            .iter()
            .map(|element| match element.kind {
                ElementKind::Image => self.process_image(ctx, &element.url),
                ElementKind::Page => self.perform_crawl(ctx, &element.url, depth + 1),
            })
            .sum()
    }

    fn process_image(&self, ctx: &CrawlContext, url: &Url) -> Result<usize> {
        Ok(ctx
            .get_image(url)?
            .map(|image| self.transform_image(ctx, &image))
            .unwrap_or(0))
    }

    fn transform_image(&self, ctx: &CrawlContext, image: &Image) -> usize {
        ctx.transforms()
            .iter()
            .filter(|transform| ctx.create_new_item(image, transform.as_ref()))
            .filter_map(|transform| ctx.apply_transform(transform.as_ref(), image))
            .count()
    }
}

impl CrawlStrategy for SequentialStreamsCrawler {
    fn kind(&self) -> CrawlerStrategyKind {
        CrawlerStrategyKind::SequentialStreams
    }

    fn crawl(&self, ctx: &CrawlContext, root: &Url) -> Result<usize> {
        self.perform_crawl(ctx, root, 0)
    }
}
