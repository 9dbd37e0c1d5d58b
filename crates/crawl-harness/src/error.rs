use image_crawler::{CrawlCounts, CrawlerError, CrawlerStrategyKind};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum HarnessError {
    #[error("Crawler error: {0}")]
    Crawler(#[from] CrawlerError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{strategy} crawl mismatch: expected {expected:?}, got {actual:?}")]
    Mismatch {
        strategy: CrawlerStrategyKind,
        expected: CrawlCounts,
        actual: CrawlCounts,
    },
}

pub type Result<T> = std::result::Result<T, HarnessError>;
