use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use url::Url;

use crate::{CrawlContext, CrawlerError, Milestone, Result};

/// Selects how a crawl spreads its work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CrawlerStrategyKind {
    SequentialLoops,
    SequentialStreams,
    ParallelStreams,
    Futures,
    ReactiveStreams,
    StructuredConcurrency,
}

impl CrawlerStrategyKind {
    pub const ALL: [CrawlerStrategyKind; 6] = [
        CrawlerStrategyKind::SequentialLoops,
        CrawlerStrategyKind::SequentialStreams,
        CrawlerStrategyKind::ParallelStreams,
        CrawlerStrategyKind::Futures,
        CrawlerStrategyKind::ReactiveStreams,
        CrawlerStrategyKind::StructuredConcurrency,
    ];

    /// The milestone whose code path provides this strategy.
    pub fn introduced_in(self) -> Milestone {
        match self {
            CrawlerStrategyKind::SequentialLoops => Milestone::Assignment1a,
            CrawlerStrategyKind::SequentialStreams => Milestone::Assignment2a,
            CrawlerStrategyKind::ParallelStreams => Milestone::Assignment2b,
            CrawlerStrategyKind::Futures => Milestone::Assignment3a,
            CrawlerStrategyKind::StructuredConcurrency => Milestone::Assignment4,
            CrawlerStrategyKind::ReactiveStreams => Milestone::Assignmentrx,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CrawlerStrategyKind::SequentialLoops => "sequential_loops",
            CrawlerStrategyKind::SequentialStreams => "sequential_streams",
            CrawlerStrategyKind::ParallelStreams => "parallel_streams",
            CrawlerStrategyKind::Futures => "futures",
            CrawlerStrategyKind::ReactiveStreams => "reactive_streams",
            CrawlerStrategyKind::StructuredConcurrency => "structured_concurrency",
        }
    }
}

impl fmt::Display for CrawlerStrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CrawlerStrategyKind {
    type Err = CrawlerError;

    /// Accepts `parallel_streams`, `PARALLEL_STREAMS` or `parallel-streams`.
    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");

        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == normalized)
            .ok_or_else(|| CrawlerError::UnknownStrategy(s.to_string()))
    }
}

/// One way of performing a crawl. Every strategy visits the same pages and
/// produces the same number of transformed images; only the scheduling
/// differs.
pub trait CrawlStrategy: Send + Sync {
    fn kind(&self) -> CrawlerStrategyKind;

    /// Crawls from `root` at depth 0 and returns the number of transformed
    /// images. Blocks until the crawl finishes.
    fn crawl(&self, ctx: &CrawlContext, root: &Url) -> Result<usize>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_strategy_names() {
        assert_eq!(
            "PARALLEL_STREAMS".parse::<CrawlerStrategyKind>().unwrap(),
            CrawlerStrategyKind::ParallelStreams
        );
        assert_eq!(
            "structured-concurrency".parse::<CrawlerStrategyKind>().unwrap(),
            CrawlerStrategyKind::StructuredConcurrency
        );
        assert!(matches!(
            "teleport".parse::<CrawlerStrategyKind>(),
            Err(CrawlerError::UnknownStrategy(_))
        ));
    }

    #[test]
    fn test_display_round_trips() {
        for kind in CrawlerStrategyKind::ALL {
            assert_eq!(kind.to_string().parse::<CrawlerStrategyKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_serde_names_match_display() {
        let json = serde_json::to_string(&CrawlerStrategyKind::ReactiveStreams).unwrap();
        assert_eq!(json, "\"reactive_streams\"");
    }

    #[test]
    fn test_sequential_loops_is_the_earliest_strategy() {
        let earliest = CrawlerStrategyKind::ALL
            .into_iter()
            .min_by_key(|kind| kind.introduced_in())
            .unwrap();
        assert_eq!(earliest, CrawlerStrategyKind::SequentialLoops);
        assert_eq!(
            CrawlerStrategyKind::ParallelStreams.introduced_in(),
            Milestone::Assignment2b
        );
    }
}
