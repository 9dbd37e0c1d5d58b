use image_crawler::{
    CrawlerConfig, CrawlerError, CrawlerStrategyKind, ImageCrawler, Milestone, StudentLevel,
};
use std::fs;
use std::path::Path;

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    println!("=== Image Crawler Strategies ===\n");

    let site = tempfile::tempdir()?;
    build_site(site.path())?;

    // Example 1: Every strategy over the same site
    all_strategies_example(site.path())?;

    // Example 2: Strategies gated by milestone
    milestone_example(site.path())?;

    Ok(())
}

fn build_site(root: &Path) -> std::io::Result<()> {
    fs::create_dir_all(root.join("img"))?;
    fs::write(
        root.join("index.html"),
        r#"<html><body><img src="img/cat.png"><a href="more.html">more</a></body></html>"#,
    )?;
    fs::write(
        root.join("more.html"),
        r#"<html><body><img src="img/dog.png"><img src="img/cat.png"></body></html>"#,
    )?;
    fs::write(root.join("img/cat.png"), b"meow")?;
    fs::write(root.join("img/dog.png"), b"woof")?;
    Ok(())
}

fn all_strategies_example(root: &Path) -> anyhow::Result<()> {
    println!("1. All Strategies");
    println!("-----------------");

    let crawler = ImageCrawler::local(CrawlerConfig::local(root))?;
    for kind in CrawlerStrategyKind::ALL {
        let report = crawler.run_with(kind)?;
        println!(
            "{:<24} {} images from {} pages in {:?}",
            kind.to_string(),
            report.counts.images_transformed,
            report.counts.pages_crawled,
            report.elapsed
        );
    }

    println!();
    Ok(())
}

fn milestone_example(root: &Path) -> anyhow::Result<()> {
    println!("2. Milestone Gate");
    println!("-----------------");

    let config = CrawlerConfig::local(root)
        .with_milestone(Milestone::Assignment2b)
        .with_student(StudentLevel::Undergraduate);
    let crawler = ImageCrawler::local(config)?;

    for kind in CrawlerStrategyKind::ALL {
        match crawler.run_with(kind) {
            Ok(report) => println!(
                "{:<24} enabled ({} images)",
                kind.to_string(),
                report.counts.images_transformed
            ),
            Err(CrawlerError::StrategyNotEnabled { milestone, .. }) => {
                println!("{:<24} needs {}", kind.to_string(), milestone)
            }
            Err(e) => return Err(e.into()),
        }
    }

    println!();
    Ok(())
}
