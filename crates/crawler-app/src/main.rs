use image_crawler::{CrawlerConfig, CrawlerStrategyKind, ImageCrawler};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "image_crawler=info,crawl=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Environment first, then an optional strategy argument
    let mut config = CrawlerConfig::from_env();
    if let Some(strategy) = std::env::args().nth(1) {
        config = config.with_strategy(strategy.parse::<CrawlerStrategyKind>()?);
    }

    tracing::info!(
        "Crawling {} with {} (milestone {}, {})",
        config.root_dir.display(),
        config.strategy,
        config.milestone,
        config.student
    );

    let crawler = ImageCrawler::local(config)?;
    let report = crawler.run()?;

    tracing::info!("{}", serde_json::to_string(&report)?);
    Ok(())
}
