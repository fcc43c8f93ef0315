use clap::{Parser, Subcommand};

use crate::commands;

#[derive(Parser)]
#[command(name = "equityexplorer")]
#[command(about = "Financial statement pipeline CLI", long_about = None)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Process a single ticker
    Ticker {
        /// Stock ticker symbol
        symbol: String,
    },
    /// Process multiple tickers
    Tickers {
        /// Stock ticker symbols
        #[arg(required = true)]
        symbols: Vec<String>,
    },
    /// Run the full pipeline over the configured default ticker list
    Full,
    /// Show output directory status
    Status,
    /// Start the HTTP server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value_t = 8080)]
        port: u16,
    },
}

pub fn run() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Ticker { symbol } => {
            commands::ticker::run(&symbol);
        }
        Commands::Tickers { symbols } => {
            commands::tickers::run(&symbols);
        }
        Commands::Full => {
            commands::full::run();
        }
        Commands::Status => {
            commands::status::run();
        }
        Commands::Serve { port } => {
            commands::serve::run(port);
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .with_target(false)
        .init();
}
