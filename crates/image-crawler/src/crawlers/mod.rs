mod async_futures;
mod parallel_streams;
mod reactive_streams;
mod sequential_loops;
mod sequential_streams;
mod structured_concurrency;

pub use async_futures::FuturesCrawler;
pub use parallel_streams::ParallelStreamsCrawler;
pub use reactive_streams::ReactiveStreamsCrawler;
pub use sequential_loops::SequentialLoopsCrawler;
pub use sequential_streams::SequentialStreamsCrawler;
pub use structured_concurrency::StructuredConcurrencyCrawler;

use tokio::runtime::{Builder, Runtime};

use crate::{CrawlContext, CrawlStrategy, CrawlerError, CrawlerStrategyKind, Result};

pub fn strategy_for(kind: CrawlerStrategyKind) -> Box<dyn CrawlStrategy> {
    match kind {
        CrawlerStrategyKind::SequentialLoops => Box::new(SequentialLoopsCrawler),
        CrawlerStrategyKind::SequentialStreams => Box::new(SequentialStreamsCrawler),
        CrawlerStrategyKind::ParallelStreams => Box::new(ParallelStreamsCrawler),
        CrawlerStrategyKind::Futures => Box::new(FuturesCrawler),
        CrawlerStrategyKind::ReactiveStreams => Box::new(ReactiveStreamsCrawler),
        CrawlerStrategyKind::StructuredConcurrency => Box::new(StructuredConcurrencyCrawler),
    }
}

// Private runtime for the async strategies, sized to the crawl's concurrency.
fn runtime(ctx: &CrawlContext) -> Result<Runtime> {
    Builder::new_multi_thread()
        .worker_threads(ctx.concurrency())
        .thread_name("image-crawler")
        .enable_all()
        .build()
        .map_err(|e| CrawlerError::Runtime(e.to_string()))
}

// Page sources do blocking file I/O.
async fn blocking<T, F>(f: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| CrawlerError::TaskFailed(e.to_string()))?
}
