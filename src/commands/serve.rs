use crate::models::Config;
use crate::server;
use crate::services::EquityExplorer;

pub fn run(port: u16) {
    println!("🚀 Starting equityexplorer server on port {}", port);

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Configuration error: {}", e);
            std::process::exit(1);
        }
    };
    println!("📁 Output directory: {}", config.output_dir.display());

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("❌ Failed to create runtime: {}", e);
            std::process::exit(1);
        }
    };

    runtime.block_on(async {
        let explorer = match EquityExplorer::new(config) {
            Ok(explorer) => explorer,
            Err(e) => {
                eprintln!("❌ Failed to initialize pipeline: {}", e);
                std::process::exit(1);
            }
        };

        if let Err(e) = server::serve(explorer, port).await {
            eprintln!("❌ Server error: {}", e);
            std::process::exit(1);
        }
    });
}
