use futures::future::{try_join_all, BoxFuture, FutureExt};
use tokio::task::JoinHandle;
use tracing::debug;
use url::Url;

use super::{blocking, runtime};
use crate::{CrawlContext, CrawlStrategy, CrawlerError, CrawlerStrategyKind, ElementKind, Result};

/// Spawns a tokio task for every image and hyperlink on a page and joins
/// them, so sibling branches run concurrently.
#[derive(Debug, Clone, Copy, Default)]
pub struct FuturesCrawler;

fn perform_crawl(ctx: CrawlContext, url: Url, depth: u32) -> BoxFuture<'static, Result<usize>> {
    async move {
        ctx.check_cancelled()?;
        debug!("Crawling {} (depth {})", url, depth);

        if !ctx.should_crawl(&url, depth) {
            return Ok(0);
        }

        let page = {
            let ctx = ctx.clone();
            let url = url.clone();
            blocking(move || ctx.get_page(&url)).await?
        };
        let Some(page) = page else {
            return Ok(0);
        };

        let tasks: Vec<JoinHandle<Result<usize>>> = page
            .page_elements(&[ElementKind::Image, ElementKind::Page])?
            .into_iter()
            .map(|element| match element.kind {
                ElementKind::Image => tokio::spawn(process_image(ctx.clone(), element.url)),
                ElementKind::Page => {
                    tokio::spawn(perform_crawl(ctx.clone(), element.url, depth + 1))
                }
            })
            .collect();

        let mut total = 0;
        for count in try_join_all(tasks)
            .await
            .map_err(|e| CrawlerError::TaskFailed(e.to_string()))?
        {
            total += count?;
        }
        Ok(total)
    }
    .boxed()
}

async fn process_image(ctx: CrawlContext, url: Url) -> Result<usize> {
    let image = {
        let ctx = ctx.clone();
        blocking(move || ctx.get_image(&url)).await?
    };
    let Some(image) = image else {
        return Ok(0);
    };

    let tasks: Vec<JoinHandle<bool>> = ctx
        .transforms()
        .iter()
        .filter(|transform| ctx.create_new_item(&image, transform.as_ref()))
        .cloned()
        .map(|transform| {
            let ctx = ctx.clone();
            let image = image.clone();
            tokio::task::spawn_blocking(move || {
                ctx.apply_transform(transform.as_ref(), &image).is_some()
            })
        })
        .collect();

    let applied = try_join_all(tasks)
        .await
        .map_err(|e| CrawlerError::TaskFailed(e.to_string()))?;
    Ok(applied.into_iter().filter(|ok| *ok).count())
}

impl CrawlStrategy for FuturesCrawler {
    fn kind(&self) -> CrawlerStrategyKind {
        CrawlerStrategyKind::Futures
    }

    fn crawl(&self, ctx: &CrawlContext, root: &Url) -> Result<usize> {
        runtime(ctx)?.block_on(perform_crawl(ctx.clone(), root.clone(), 0))
    }
}
