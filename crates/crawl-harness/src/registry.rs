use image_crawler::CrawlerStrategyKind;

pub const OPTIONAL_TESTS_VAR: &str = "CRAWL_OPTIONAL_TESTS";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestTier {
    /// Runs on every test invocation.
    Required,
    /// Defined but only run on request.
    Optional,
}

pub fn registry() -> Vec<(CrawlerStrategyKind, TestTier)> {
    CrawlerStrategyKind::ALL
        .into_iter()
        .map(|kind| (kind, tier_of(kind)))
        .collect()
}

pub fn tier_of(kind: CrawlerStrategyKind) -> TestTier {
    match kind {
        CrawlerStrategyKind::ParallelStreams => TestTier::Optional,
        _ => TestTier::Required,
    }
}

/// Whether `kind` should run now: required kinds always do, optional kinds
/// only when listed in `CRAWL_OPTIONAL_TESTS`.
pub fn is_enabled(kind: CrawlerStrategyKind) -> bool {
    is_enabled_by(kind, std::env::var(OPTIONAL_TESTS_VAR).ok().as_deref())
}

/// `opt_in` is a comma separated list of strategy names, or `all`.
pub fn is_enabled_by(kind: CrawlerStrategyKind, opt_in: Option<&str>) -> bool {
    if tier_of(kind) == TestTier::Required {
        return true;
    }

    opt_in
        .map(|list| {
            list.split(',').map(str::trim).any(|name| {
                name.eq_ignore_ascii_case("all")
                    || name.parse::<CrawlerStrategyKind>().ok() == Some(kind)
            })
        })
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parallel_streams_is_the_only_optional_kind() {
        let optional: Vec<_> = registry()
            .into_iter()
            .filter(|(_, tier)| *tier == TestTier::Optional)
            .map(|(kind, _)| kind)
            .collect();

        assert_eq!(optional, vec![CrawlerStrategyKind::ParallelStreams]);
        assert_eq!(registry().len(), CrawlerStrategyKind::ALL.len());
    }

    #[test]
    fn test_opt_in_list() {
        let kind = CrawlerStrategyKind::ParallelStreams;

        assert!(!is_enabled_by(kind, None));
        assert!(!is_enabled_by(kind, Some("futures")));
        assert!(is_enabled_by(kind, Some("futures, PARALLEL_STREAMS")));
        assert!(is_enabled_by(kind, Some("all")));
        assert!(is_enabled_by(CrawlerStrategyKind::Futures, None));
    }
}
