use crate::error::Error;
use crate::models::{BatchSummary, Config, TickerReport};
use crate::services::EquityExplorer;

use super::tickers::print_reports;

pub fn run() {
    println!("🔄 Running full pipeline over configured default tickers...\n");

    match process() {
        Ok(reports) => {
            let summary = BatchSummary::from_reports(&reports);
            print_reports(&reports);
            println!(
                "\n📊 Full run complete: {}/{} tickers processed successfully",
                summary.succeeded(),
                summary.total
            );
            if !summary.all_succeeded() {
                std::process::exit(1);
            }
        }
        Err(e) => {
            eprintln!("❌ Full run failed: {}", e);
            std::process::exit(1);
        }
    }
}

fn process() -> Result<Vec<TickerReport>, Error> {
    let config = Config::from_env()?;
    let runtime = tokio::runtime::Runtime::new()
        .map_err(|e| Error::Other(format!("Failed to create runtime: {}", e)))?;

    runtime.block_on(async {
        let explorer = EquityExplorer::new(config)?;
        Ok(explorer.run_full().await)
    })
}
