use thiserror::Error;

use crate::{CrawlerStrategyKind, Milestone};

#[derive(Error, Debug)]
pub enum CrawlerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Content too large: {size} bytes (max: {max})")]
    ContentTooLarge { size: usize, max: usize },

    #[error("Strategy {strategy} requires milestone {milestone}, which is not enabled")]
    StrategyNotEnabled {
        strategy: CrawlerStrategyKind,
        milestone: Milestone,
    },

    #[error("Unknown crawler strategy: {0}")]
    UnknownStrategy(String),

    #[error("Unknown milestone: {0}")]
    UnknownMilestone(String),

    #[error("Unknown student level: {0}")]
    UnknownStudentLevel(String),

    #[error("Unknown transform: {0}")]
    UnknownTransform(String),

    #[error("Crawl cancelled")]
    Cancelled,

    #[error("Crawl task failed: {0}")]
    TaskFailed(String),

    #[error("Runtime error: {0}")]
    Runtime(String),
}

pub type Result<T> = std::result::Result<T, CrawlerError>;
