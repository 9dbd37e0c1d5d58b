use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;
use tracing::warn;

use crate::{AssignmentGate, CrawlerStrategyKind, Milestone, StudentLevel, TransformKind};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlerConfig {
    /// Directory served by the local page source.
    pub root_dir: PathBuf,
    /// Page the crawl starts from, relative to `root_dir`.
    pub root_page: String,
    pub max_depth: u32,
    pub strategy: CrawlerStrategyKind,
    pub transforms: Vec<TransformKind>,
    pub milestone: Milestone,
    pub student: StudentLevel,
    pub concurrency: usize,
    pub max_content_size: usize,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            root_dir: PathBuf::from("./web-pages"),
            root_page: "index.html".to_string(),
            max_depth: 3,
            strategy: CrawlerStrategyKind::SequentialLoops,
            transforms: vec![TransformKind::Identity, TransformKind::Invert],
            milestone: Milestone::All,
            student: StudentLevel::Graduate,
            concurrency: num_cpus::get(),
            max_content_size: 10 * 1024 * 1024, // 10MB
        }
    }
}

impl CrawlerConfig {
    pub fn local(root_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
            ..Default::default()
        }
    }

    /// Defaults overridden by `CRAWLER_*` environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(dir) = lookup("CRAWLER_ROOT_DIR") {
            config.root_dir = PathBuf::from(dir);
        }

        if let Some(page) = lookup("CRAWLER_ROOT_PAGE") {
            config.root_page = page;
        }

        if let Some(depth) = parse_var(&lookup, "CRAWLER_MAX_DEPTH") {
            config.max_depth = depth;
        }

        if let Some(strategy) = parse_var(&lookup, "CRAWLER_STRATEGY") {
            config.strategy = strategy;
        }

        if let Some(transforms) = lookup("CRAWLER_TRANSFORMS") {
            match TransformKind::parse_list(&transforms) {
                Ok(kinds) => config.transforms = kinds,
                Err(e) => warn!("Ignoring CRAWLER_TRANSFORMS: {}", e),
            }
        }

        if let Some(milestone) = parse_var(&lookup, "CRAWLER_MILESTONE") {
            config.milestone = milestone;
        }

        if let Some(student) = parse_var(&lookup, "CRAWLER_STUDENT") {
            config.student = student;
        }

        if let Some(concurrency) = parse_var::<usize>(&lookup, "CRAWLER_CONCURRENCY") {
            config.concurrency = concurrency.max(1);
        }

        if let Some(size) = parse_var(&lookup, "CRAWLER_MAX_CONTENT_SIZE") {
            config.max_content_size = size;
        }

        config
    }

    pub fn gate(&self) -> AssignmentGate {
        AssignmentGate::new(self.milestone, self.student)
    }

    pub fn with_root_dir(mut self, root_dir: impl Into<PathBuf>) -> Self {
        self.root_dir = root_dir.into();
        self
    }

    pub fn with_root_page(mut self, root_page: impl Into<String>) -> Self {
        self.root_page = root_page.into();
        self
    }

    pub fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_strategy(mut self, strategy: CrawlerStrategyKind) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_transforms(mut self, transforms: Vec<TransformKind>) -> Self {
        self.transforms = transforms;
        self
    }

    pub fn with_milestone(mut self, milestone: Milestone) -> Self {
        self.milestone = milestone;
        self
    }

    pub fn with_student(mut self, student: StudentLevel) -> Self {
        self.student = student;
        self
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn with_max_content_size(mut self, max: usize) -> Self {
        self.max_content_size = max;
        self
    }
}

fn parse_var<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let value = lookup(key)?;
    match value.parse() {
        Ok(parsed) => Some(parsed),
        Err(e) => {
            warn!("Ignoring {}={:?}: {}", key, value, e);
            None
        }
    }
}
