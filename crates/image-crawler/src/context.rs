use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;
use url::Url;

use crate::{
    AssignmentGate, CrawlerError, CrawlerStrategyKind, Image, Page, PageDepths, PageSource,
    Result, Transform, TransformLedger, UniqueUris,
};

/// Stops a running crawl at the next page boundary.
#[derive(Debug, Clone, Default)]
pub struct CancelHandle {
    cancelled: Arc<AtomicBool>,
}

impl CancelHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn reset(&self) {
        self.cancelled.store(false, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// State shared by every branch of one crawl. Clones share the same
/// trackers and counters.
#[derive(Clone)]
pub struct CrawlContext {
    source: Arc<dyn PageSource>,
    transforms: Arc<[Arc<dyn Transform>]>,
    max_depth: u32,
    concurrency: usize,
    gate: AssignmentGate,
    depths: Arc<PageDepths>,
    pages: Arc<UniqueUris>,
    images: Arc<UniqueUris>,
    ledger: Arc<TransformLedger>,
    cancel: CancelHandle,
}

impl CrawlContext {
    pub fn new(
        source: Arc<dyn PageSource>,
        transforms: Vec<Arc<dyn Transform>>,
        max_depth: u32,
        gate: AssignmentGate,
    ) -> Self {
        Self {
            source,
            transforms: transforms.into(),
            max_depth,
            concurrency: num_cpus::get(),
            gate,
            depths: Arc::new(PageDepths::new()),
            pages: Arc::new(UniqueUris::new()),
            images: Arc::new(UniqueUris::new()),
            ledger: Arc::new(TransformLedger::new()),
            cancel: CancelHandle::new(),
        }
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn with_cancel_handle(mut self, cancel: CancelHandle) -> Self {
        self.cancel = cancel;
        self
    }

    /// Shares an existing ledger, so pairs produced by an earlier crawl are
    /// not produced again.
    pub fn with_ledger(mut self, ledger: Arc<TransformLedger>) -> Self {
        self.ledger = ledger;
        self
    }

    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    pub fn gate(&self) -> &AssignmentGate {
        &self.gate
    }

    pub fn transforms(&self) -> &[Arc<dyn Transform>] {
        &self.transforms
    }

    pub fn ledger(&self) -> &Arc<TransformLedger> {
        &self.ledger
    }

    pub fn check_cancelled(&self) -> Result<()> {
        if self.cancel.is_cancelled() {
            return Err(CrawlerError::Cancelled);
        }
        Ok(())
    }

    /// False if `url` is deeper than the limit or was already claimed at
    /// this depth or a shallower one. A page first reached down a longer
    /// path is crawled again from its shallower depth.
    pub fn should_crawl(&self, url: &Url, depth: u32) -> bool {
        if depth > self.max_depth {
            debug!("Skipping {} - exceeded max depth of {}", url, self.max_depth);
            return false;
        }
        if !self.depths.claim(url, depth) {
            debug!("Already processed {}", url);
            return false;
        }
        true
    }

    pub fn get_page(&self, url: &Url) -> Result<Option<Page>> {
        let page = self.source.get_page(url)?;
        if page.is_some() {
            self.pages.put_if_absent(url);
        }
        Ok(page)
    }

    pub fn get_image(&self, url: &Url) -> Result<Option<Image>> {
        let image = self.source.get_image(url)?;
        if image.is_some() {
            self.images.put_if_absent(url);
        }
        Ok(image)
    }

    pub fn create_new_item(&self, image: &Image, transform: &dyn Transform) -> bool {
        self.ledger.create_new_item(image.url(), transform.name())
    }

    pub fn apply_transform(&self, transform: &dyn Transform, image: &Image) -> Option<Image> {
        let result = transform.apply(image);
        match &result {
            Some(_) => debug!("Applied {} to {}", transform.name(), image.url()),
            None => debug!("{} produced nothing for {}", transform.name(), image.url()),
        }
        result
    }

    pub fn counts(&self, images_transformed: usize) -> CrawlCounts {
        CrawlCounts {
            images_transformed,
            pages_crawled: self.pages.len(),
            images_downloaded: self.images.len(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrawlCounts {
    /// Transformed images produced; the value a strategy's crawl returns.
    pub images_transformed: usize,
    /// Distinct pages fetched.
    pub pages_crawled: usize,
    /// Distinct images fetched.
    pub images_downloaded: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrawlReport {
    pub strategy: CrawlerStrategyKind,
    pub root: Url,
    pub counts: CrawlCounts,
    pub elapsed: Duration,
}
