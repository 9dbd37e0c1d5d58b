use std::thread;
use tracing::debug;
use url::Url;

use crate::{
    CrawlContext, CrawlStrategy, CrawlerError, CrawlerStrategyKind, ElementKind, Result,
};

/// Crawls every hyperlink of a page on its own scoped thread. A page's
/// scope does not end until all of its branches have finished.
#[derive(Debug, Clone, Copy, Default)]
pub struct StructuredConcurrencyCrawler;

impl StructuredConcurrencyCrawler {
    fn perform_crawl(&self, ctx: &CrawlContext, url: &Url, depth: u32) -> Result<usize> {
        ctx.check_cancelled()?;
        debug!("Crawling {} (depth {}) on {:?}", url, depth, thread::current().id());

        if !ctx.should_crawl(url, depth) {
            return Ok(0);
        }

        let page = match ctx.get_page(url)? {
            Some(page) => page,
            None => return Ok(0),
        };

        let (links, images): (Vec<_>, Vec<_>) = page
            .page_elements(&[ElementKind::Image, ElementKind::Page])?
            .into_iter()
            .partition(|element| element.kind == ElementKind::Page);

        thread::scope(|scope| {
            let branches: Vec<_> = links
                .iter()
                .map(|link| scope.spawn(move || self.perform_crawl(ctx, &link.url, depth + 1)))
                .collect();

            let mut total = 0;
            for image in &images {
                total += self.process_image(ctx, &image.url)?;
            }
            for branch in branches {
                total += branch
                    .join()
                    .map_err(|_| CrawlerError::TaskFailed("crawl thread panicked".to_string()))??;
            }
            Ok(total)
        })
    }

    fn process_image(&self, ctx: &CrawlContext, url: &Url) -> Result<usize> {
        let Some(image) = ctx.get_image(url)? else {
            return Ok(0);
        };

        Ok(ctx
            .transforms()
            .iter()
            .filter(|transform| ctx.create_new_item(&image, transform.as_ref()))
            .filter_map(|transform| ctx.apply_transform(transform.as_ref(), &image))
            .count())
    }
}

impl CrawlStrategy for StructuredConcurrencyCrawler {
    fn kind(&self) -> CrawlerStrategyKind {
        CrawlerStrategyKind::StructuredConcurrency
    }

    fn crawl(&self, ctx: &CrawlContext, root: &Url) -> Result<usize> {
        self.perform_crawl(ctx, root, 0)
    }
}
