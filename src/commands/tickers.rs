use crate::error::Error;
use crate::models::{BatchSummary, Config, TickerReport};
use crate::services::EquityExplorer;

pub fn run(symbols: &[String]) {
    let tickers: Vec<String> = symbols
        .iter()
        .map(|s| s.trim().to_uppercase())
        .filter(|s| !s.is_empty())
        .collect();

    if tickers.is_empty() {
        eprintln!("❌ At least one ticker symbol is required");
        std::process::exit(1);
    }

    println!("🔄 Processing {} tickers...\n", tickers.len());

    match process(&tickers) {
        Ok(reports) => {
            let summary = BatchSummary::from_reports(&reports);
            print_reports(&reports);
            println!(
                "\n📊 Processed {}/{} tickers ({} complete, {} partial, {} failed)",
                summary.succeeded(),
                summary.total,
                summary.complete,
                summary.partial,
                summary.failed
            );
            if !summary.all_succeeded() {
                std::process::exit(1);
            }
        }
        Err(e) => {
            eprintln!("❌ Error: {}", e);
            std::process::exit(1);
        }
    }
}

pub(crate) fn print_reports(reports: &[TickerReport]) {
    for report in reports {
        if report.is_success() {
            println!(
                "✓ {}: {} statements processed",
                report.ticker,
                report.statements.len()
            );
        } else {
            println!("✗ {}: failed to process", report.ticker);
        }
    }
}

fn process(tickers: &[String]) -> Result<Vec<TickerReport>, Error> {
    let config = Config::from_env()?;
    let runtime = tokio::runtime::Runtime::new()
        .map_err(|e| Error::Other(format!("Failed to create runtime: {}", e)))?;

    runtime.block_on(async {
        let explorer = EquityExplorer::new(config)?;
        Ok(explorer.process_many(tickers).await)
    })
}
