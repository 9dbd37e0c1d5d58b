pub mod assignment;
pub mod config;
pub mod context;
pub mod crawlers;
pub mod error;
pub mod image;
pub mod page;
pub mod source;
pub mod strategy;
pub mod tracker;

pub use assignment::*;
pub use config::*;
pub use context::*;
pub use crawlers::strategy_for;
pub use error::*;
pub use image::*;
pub use page::*;
pub use source::*;
pub use strategy::*;
pub use tracker::*;

use std::sync::Arc;
use std::time::Instant;
use tracing::info;
use url::Url;

#[derive(Clone)]
pub struct ImageCrawler {
    config: Arc<CrawlerConfig>,
    source: Arc<dyn PageSource>,
    transforms: Vec<Arc<dyn Transform>>,
    cancel: CancelHandle,
}

impl ImageCrawler {
    pub fn new(config: CrawlerConfig, source: Arc<dyn PageSource>) -> Self {
        let transforms = config.transforms.iter().map(|kind| kind.build()).collect();

        Self {
            config: Arc::new(config),
            source,
            transforms,
            cancel: CancelHandle::new(),
        }
    }

    /// Crawler over `config.root_dir` on the local file system.
    pub fn local(config: CrawlerConfig) -> Result<Self> {
        let source = LocalPageSource::new(&config.root_dir)?
            .with_root_page(config.root_page.clone())
            .with_max_content_size(config.max_content_size);
        Ok(Self::new(config, Arc::new(source)))
    }

    /// Replaces the transforms built from the config.
    pub fn with_transforms(mut self, transforms: Vec<Arc<dyn Transform>>) -> Self {
        self.transforms = transforms;
        self
    }

    pub fn config(&self) -> &CrawlerConfig {
        &self.config
    }

    pub fn gate(&self) -> AssignmentGate {
        self.config.gate()
    }

    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    /// Crawls from the source's root with the configured strategy.
    pub fn run(&self) -> Result<CrawlReport> {
        self.run_with(self.config.strategy)
    }

    pub fn run_with(&self, kind: CrawlerStrategyKind) -> Result<CrawlReport> {
        self.crawl(kind, &self.root_url()?)
    }

    pub fn root_url(&self) -> Result<Url> {
        self.source.root_url()
    }

    /// Blocking; use [`ImageCrawler::run_async`] from async code.
    pub fn crawl(&self, kind: CrawlerStrategyKind, root: &Url) -> Result<CrawlReport> {
        self.crawl_in(self.context(), kind, root)
    }

    /// Runs a crawl against a caller-supplied context, e.g. one sharing a
    /// ledger with an earlier crawl.
    pub fn crawl_in(
        &self,
        ctx: CrawlContext,
        kind: CrawlerStrategyKind,
        root: &Url,
    ) -> Result<CrawlReport> {
        let milestone = kind.introduced_in();
        if !self.gate().includes(milestone) {
            return Err(CrawlerError::StrategyNotEnabled {
                strategy: kind,
                milestone,
            });
        }

        info!("Starting {} crawl of {} (max depth {})", kind, root, ctx.max_depth());
        let start = Instant::now();
        let images = strategy_for(kind).crawl(&ctx, root)?;
        let report = CrawlReport {
            strategy: kind,
            root: root.clone(),
            counts: ctx.counts(images),
            elapsed: start.elapsed(),
        };

        info!(
            "Crawl completed. {} images transformed from {} pages in {:?}",
            report.counts.images_transformed, report.counts.pages_crawled, report.elapsed
        );
        Ok(report)
    }

    pub async fn run_async(&self, kind: CrawlerStrategyKind) -> Result<CrawlReport> {
        let crawler = self.clone();
        tokio::task::spawn_blocking(move || crawler.run_with(kind))
            .await
            .map_err(|e| CrawlerError::TaskFailed(e.to_string()))?
    }

    /// A fresh context for one crawl.
    pub fn context(&self) -> CrawlContext {
        CrawlContext::new(
            self.source.clone(),
            self.transforms.clone(),
            self.config.max_depth,
            self.gate(),
        )
        .with_concurrency(self.config.concurrency)
        .with_cancel_handle(self.cancel.clone())
    }
}
