use crate::constants::{
    DEFAULT_BASE_URL, DEFAULT_MAX_RETRIES, DEFAULT_RETRY_DELAY_SECS, DEFAULT_TICKERS,
    DEFAULT_TICKER_DELAY_SECS,
};
use crate::error::{AppError, Result};
use crate::utils::{get_output_dir, get_scripts_dir};
use std::path::PathBuf;
use std::time::Duration;
use tracing::warn;

/// Planning-tool credentials. All three values must be present for import
/// dispatch to be enabled; the core pipeline runs without them.
#[derive(Debug, Clone)]
pub struct ImportConfig {
    pub user: String,
    pub workspace_id: String,
    pub model_id: String,
}

/// Runtime configuration, resolved from the environment at startup
#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: String,
    pub base_url: String,
    pub output_dir: PathBuf,
    pub scripts_dir: PathBuf,
    pub max_retries: u32,
    pub retry_delay: Duration,
    pub ticker_delay: Duration,
    pub default_tickers: Vec<String>,
    pub import: Option<ImportConfig>,
}

impl Config {
    /// Resolve configuration from environment variables.
    ///
    /// A missing or empty `FMP_API_KEY` is a fatal configuration error;
    /// everything else falls back to defaults. Incomplete planning-tool
    /// credentials disable import dispatch rather than failing startup.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("FMP_API_KEY")
            .map_err(|_| AppError::Config("FMP_API_KEY is not set".to_string()))?;
        if api_key.trim().is_empty() {
            return Err(AppError::Config("FMP_API_KEY is empty".to_string()));
        }

        let base_url = std::env::var("FMP_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string())
            .trim()
            .trim_end_matches('/')
            .to_string();

        let max_retries = std::env::var("MAX_RETRIES")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_MAX_RETRIES)
            .max(1);

        let retry_delay_secs = std::env::var("RETRY_DELAY_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_RETRY_DELAY_SECS);

        let ticker_delay_secs = std::env::var("TICKER_DELAY_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_TICKER_DELAY_SECS);

        let default_tickers = match std::env::var("DEFAULT_TICKERS") {
            Ok(raw) => {
                let tickers = parse_ticker_list(&raw);
                if tickers.is_empty() {
                    default_ticker_list()
                } else {
                    tickers
                }
            }
            Err(_) => default_ticker_list(),
        };

        let import = match (
            std::env::var("ANAPLAN_USER"),
            std::env::var("ANAPLAN_WORKSPACE_ID"),
            std::env::var("ANAPLAN_MODEL_ID"),
        ) {
            (Ok(user), Ok(workspace_id), Ok(model_id)) => Some(ImportConfig {
                user,
                workspace_id,
                model_id,
            }),
            (Err(_), Err(_), Err(_)) => None,
            _ => {
                warn!("Incomplete planning-tool credentials - import dispatch disabled");
                None
            }
        };

        Ok(Config {
            api_key,
            base_url,
            output_dir: get_output_dir(),
            scripts_dir: get_scripts_dir(),
            max_retries,
            retry_delay: Duration::from_secs(retry_delay_secs),
            ticker_delay: Duration::from_secs(ticker_delay_secs),
            default_tickers,
            import,
        })
    }

    /// Create the output directory if it does not exist yet
    pub fn create_directories(&self) -> Result<()> {
        std::fs::create_dir_all(&self.output_dir).map_err(|e| {
            AppError::Io(format!(
                "Failed to create output directory {}: {}",
                self.output_dir.display(),
                e
            ))
        })
    }
}

fn default_ticker_list() -> Vec<String> {
    DEFAULT_TICKERS.iter().map(|t| t.to_string()).collect()
}

/// Split a comma-separated ticker list, trimming and uppercasing entries
fn parse_ticker_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|t| t.trim().to_uppercase())
        .filter(|t| !t.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ticker_list() {
        assert_eq!(parse_ticker_list("aapl, msft ,GOOGL"), vec!["AAPL", "MSFT", "GOOGL"]);
        assert_eq!(parse_ticker_list(" ,, "), Vec::<String>::new());
        assert_eq!(parse_ticker_list("TSLA"), vec!["TSLA"]);
    }

    #[test]
    fn test_default_ticker_list() {
        let tickers = default_ticker_list();
        assert_eq!(tickers.len(), 5);
        assert!(tickers.contains(&"AAPL".to_string()));
    }
}
