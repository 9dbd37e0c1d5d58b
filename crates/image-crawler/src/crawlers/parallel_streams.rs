use rayon::prelude::*;
use tracing::debug;
use url::Url;

use crate::{
    CrawlContext, CrawlStrategy, CrawlerStrategyKind, ElementKind, Image, Milestone, Result,
};

/// Fans each page's images and links out over the rayon thread pool.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParallelStreamsCrawler;

impl ParallelStreamsCrawler {
    fn perform_crawl(&self, ctx: &CrawlContext, url: &Url, depth: u32) -> Result<usize> {
        ctx.check_cancelled()?;
        debug!(
            "Crawling {} (depth {}) on worker {:?}",
            url,
            depth,
            rayon::current_thread_index()
        );

        if !ctx.should_crawl(url, depth) {
            return Ok(0);
        }

        let page = match ctx.get_page(url)? {
            Some(page) => page,
            None => return Ok(0),
        };

        page.page_elements(&[ElementKind::Image, ElementKind::Page])?
            .into_par_iter()
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

    // Graduate solutions also spread the transforms of one image over the pool.
    fn transform_image(&self, ctx: &CrawlContext, image: &Image) -> usize {
        if ctx.gate().is_graduate_for(Milestone::Assignment2b) {
            ctx.transforms()
                .par_iter()
                .filter(|transform| ctx.create_new_item(image, transform.as_ref()))
                .filter_map(|transform| ctx.apply_transform(transform.as_ref(), image))
                .count()
        } else {
            ctx.transforms()
                .iter()
                .filter(|transform| ctx.create_new_item(image, transform.as_ref()))
                .filter_map(|transform| ctx.apply_transform(transform.as_ref(), image))
                .count()
        }
    }
}

impl CrawlStrategy for ParallelStreamsCrawler {
    fn kind(&self) -> CrawlerStrategyKind {
        CrawlerStrategyKind::ParallelStreams
    }

    fn crawl(&self, ctx: &CrawlContext, root: &Url) -> Result<usize> {
        self.perform_crawl(ctx, root, 0)
    }
}
