use futures::future::{self, BoxFuture, FutureExt};
use futures::stream::{self, StreamExt, TryStreamExt};
use tracing::debug;
use url::Url;

use super::{blocking, runtime};
use crate::{CrawlContext, CrawlStrategy, CrawlerStrategyKind, ElementKind, Result};

/// Treats each page as a stream of elements, flattened with at most
/// `concurrency` branches in flight per page.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReactiveStreamsCrawler;

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

        let elements = page.page_elements(&[ElementKind::Image, ElementKind::Page])?;
        let concurrency = ctx.concurrency();
        stream::iter(elements)
            .map(move |element| {
                let ctx = ctx.clone();
                async move {
                    match element.kind {
                        ElementKind::Image => process_image(ctx, element.url).await,
                        ElementKind::Page => perform_crawl(ctx, element.url, depth + 1).await,
                    }
                }
            })
            .buffer_unordered(concurrency)
            .try_fold(0, |total, count| future::ready(Ok(total + count)))
            .await
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

    let count = stream::iter(ctx.transforms().to_vec())
        .filter(|transform| future::ready(ctx.create_new_item(&image, transform.as_ref())))
        .filter_map(|transform| future::ready(ctx.apply_transform(transform.as_ref(), &image)))
        .count()
        .await;
    Ok(count)
}

impl CrawlStrategy for ReactiveStreamsCrawler {
    fn kind(&self) -> CrawlerStrategyKind {
        CrawlerStrategyKind::ReactiveStreams
    }

    fn crawl(&self, ctx: &CrawlContext, root: &Url) -> Result<usize> {
        runtime(ctx)?.block_on(perform_crawl(ctx.clone(), root.clone(), 0))
    }
}
