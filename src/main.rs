use anyhow::Context;
use augsburg_covid::{Crawler, CrawlerConfig, RequestClient};
use dotenv::dotenv;
use log::{LevelFilter, error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    env_logger::Builder::new()
        .filter_level(LevelFilter::Info)
        .parse_default_env()
        .init();

    let config = CrawlerConfig::from_env()?;
    let request_client = RequestClient::new(&config)?;
    let crawler = Crawler::new(config, request_client).context("failed to set up crawler")?;

    let report = crawler.crawl_all().await;
    for e in report.errors() {
        error!("{e}");
    }
    if let Ok(record) = &report.incidence {
        info!("Incidence {}: {}", record.date, record.state());
    }
    if let Ok(record) = &report.vaccination {
        info!("Vaccinations {}: {}", record.date, record.state());
    }

    println!("{}", serde_json::to_string_pretty(&report.attributes())?);
    Ok(())
}
