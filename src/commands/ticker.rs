use crate::error::Error;
use crate::models::Config;
use crate::services::EquityExplorer;

pub fn run(symbol: &str) {
    let symbol = symbol.trim().to_uppercase();
    if symbol.is_empty() {
        eprintln!("❌ Ticker symbol is required");
        std::process::exit(1);
    }

    println!("🔄 Processing {}...", symbol);

    match process(&symbol) {
        Ok(true) => {
            println!("\n✅ {} processed successfully", symbol);
        }
        Ok(false) => {
            eprintln!("\n❌ Failed to process {}", symbol);
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("❌ Error: {}", e);
            std::process::exit(1);
        }
    }
}

fn process(symbol: &str) -> Result<bool, Error> {
    let config = Config::from_env()?;
    let runtime = tokio::runtime::Runtime::new()
        .map_err(|e| Error::Other(format!("Failed to create runtime: {}", e)))?;

    runtime.block_on(async {
        let explorer = EquityExplorer::new(config)?;
        let report = explorer.process_single_ticker(symbol).await;

        for statement in crate::models::StatementType::ALL {
            if let Some(path) = report.statements.get(&statement) {
                println!("   {}: {}", statement, path.display());
            }
        }

        Ok(report.is_success())
    })
}
