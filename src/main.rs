use anyhow::Context;
use clap::Parser;
use tracing::{error, info};

use cs_scraper::apis::confluence;
use cs_scraper::pipeline::storage::ensure_output_dir;
use cs_scraper::{CliArgs, Config, Pipeline};

fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let args = CliArgs::parse();
    let config = Config::from_args(&args)?;

    // Keep the guard alive so file logs are flushed on exit
    let log_guard = cs_scraper::logging::init_logging(config.log_dir.as_deref());

    if let Err(e) = ensure_output_dir(&config.output_dir) {
        error!("{}", e);
        eprintln!("{}", e);
        // exit() skips destructors; flush the file log first
        drop(log_guard);
        std::process::exit(1);
    }

    info!(page = %config.page_id, output_dir = %config.output_dir.display(), "Starting run");
    let html = confluence::load_page(&config)
        .with_context(|| format!("Failed to load page {}", config.page_url()))?;

    let result = Pipeline::new(&config).run_page(&html)?;
    for outcome in &result.outcomes {
        println!("QC Reported {} warnings/errors.", outcome.quality.missing_count());
        println!(
            "Transformed confluence page to {}",
            outcome.output_file.display()
        );
    }
    if result.tables_found == 0 {
        println!("No tables found on page {}", config.page_id);
    }

    Ok(())
}
