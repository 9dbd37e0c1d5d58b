pub mod error;
pub mod fixture;
pub mod registry;

pub use error::*;
pub use fixture::*;
pub use registry::*;

use image_crawler::{CrawlReport, CrawlerStrategyKind, ImageCrawler};
use tracing::info;

/// Crawls a fresh fixture site with `kind` and checks the result against
/// [`FixtureSite::expected`].
pub fn local_crawl_test(kind: CrawlerStrategyKind) -> Result<CrawlReport> {
    let site = FixtureSite::create()?;
    let crawler = ImageCrawler::local(site.config())?;

    let report = crawler.run_with(kind)?;
    let expected = FixtureSite::expected();
    if report.counts != expected {
        return Err(HarnessError::Mismatch {
            strategy: kind,
            expected,
            actual: report.counts,
        });
    }

    info!("{} local crawl passed in {:?}", kind, report.elapsed);
    Ok(report)
}

/// Runs the local crawl test if the registry enables `kind`; `None` when
/// an optional kind was not requested.
pub fn run_registered(kind: CrawlerStrategyKind) -> Result<Option<CrawlReport>> {
    run_registered_by(kind, std::env::var(OPTIONAL_TESTS_VAR).ok().as_deref())
}

/// [`run_registered`] with the opt-in list given explicitly.
pub fn run_registered_by(
    kind: CrawlerStrategyKind,
    opt_in: Option<&str>,
) -> Result<Option<CrawlReport>> {
    if !is_enabled_by(kind, opt_in) {
        info!("Skipping optional {} crawl test (set {})", kind, OPTIONAL_TESTS_VAR);
        return Ok(None);
    }
    local_crawl_test(kind).map(Some)
}
