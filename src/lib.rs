//! Listing Harvester - classified-ad discovery and extraction
//!
//! Crawls paginated olx.pt search results for bicycles, cars or motorcycles,
//! pulls each ad's description from its detail page, then ranks the ads by
//! price and exports them as CSV and/or JSON.

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod interactive;

use anyhow::Result;
use tracing::{error, warn};

use application::HarvestUseCase;
use infrastructure::config::{AppConfig, ConfigManager};
use infrastructure::logging::{init_logging_with_config, log_system_info};

/// Load configuration, falling back to defaults when it cannot be read
async fn load_config() -> AppConfig {
    let manager = match ConfigManager::new() {
        Ok(manager) => manager,
        Err(e) => {
            eprintln!("Using default configuration: {e:#}");
            return AppConfig::default();
        }
    };

    match manager.initialize_on_first_run().await {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Using default configuration: {e:#}");
            AppConfig::default()
        }
    }
}

/// Interactive entry point: prompt, crawl, rank, export, print a summary
pub async fn run() -> Result<()> {
    let config = load_config().await;

    if let Err(e) = init_logging_with_config(&config.logging) {
        eprintln!("Logging disabled: {e:#}");
    }
    log_system_info();

    let request = interactive::collect_request(config.crawling.max_requested_pages)?;
    let use_case = HarvestUseCase::from_config(&config)?;

    let report = use_case.execute(&request).await.inspect_err(|e| error!("Harvest failed: {e:#}"))?;
    if let Some(export) = report.export.as_ref().filter(|e| !e.is_complete()) {
        for failure in &export.failures {
            warn!("Could not write {}", failure.path().display());
        }
    }

    println!("\n{}", report.summary());
    Ok(())
}
