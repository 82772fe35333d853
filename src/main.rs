use anyhow::Result;
use clap::Parser;
use tracing::{error, info};

use nloto_scraper::PrizeFinder;
use nloto_scraper::config::{Cli, Settings, SourceKind};
use nloto_scraper::html::HtmlFileSource;
use nloto_scraper::scrapers::MechtallionScraper;
use nloto_scraper::traits::RowSource;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(cli.log_level.directive()));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    if let Err(e) = run(cli.into_settings()).await {
        error!("Scrape failed: {e:#}");
        std::process::exit(1);
    }
}

async fn run(settings: Settings) -> Result<()> {
    info!("Starting Мечталлион prize table scraper");

    let source: Box<dyn RowSource> = match settings.source {
        SourceKind::Browser => Box::new(MechtallionScraper::new(
            settings.scraper,
            settings.browser,
            settings.timeout,
        )),
        SourceKind::HtmlFile(path) => Box::new(HtmlFileSource::new(path, settings.scraper)),
    };

    let finder = PrizeFinder::new(source, settings.output, settings.format);
    let summary = finder.run().await?;

    info!(
        "Extracted {} rows, saved {} to {}",
        summary.extracted,
        summary.written,
        summary.path.display()
    );
    info!("Scrape finished");

    Ok(())
}
