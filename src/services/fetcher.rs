use crate::constants::{ERROR_SENTINEL, HTTP_TIMEOUT_SECS};
use crate::error::{AppError, Result};
use crate::models::{Config, StatementType};
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

/// Check a response body for the provider's soft-failure message.
///
/// The API signals invalid keys, unknown tickers and plan limits inside a 200
/// response; the check is a case-insensitive substring match on "contact"
/// because that is the only stable marker across those messages. A body that
/// trips this check must not be saved, reshaped or dispatched.
pub fn contains_error_sentinel(body: &str) -> bool {
    body.to_lowercase().contains(ERROR_SENTINEL)
}

/// Fetches statement CSVs from the Financial Modeling Prep API
pub struct StatementFetcher {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    output_dir: PathBuf,
    max_retries: u32,
    retry_delay: Duration,
}

impl StatementFetcher {
    pub fn new(config: &Config) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
            .build()
            .map_err(|e| AppError::Network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(StatementFetcher {
            client,
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
            output_dir: config.output_dir.clone(),
            max_retries: config.max_retries,
            retry_delay: config.retry_delay,
        })
    }

    fn statement_url(&self, ticker: &str, statement: StatementType) -> String {
        format!("{}/{}/{}", self.base_url, statement.endpoint(), ticker)
    }

    /// Fetch one statement with bounded retry.
    ///
    /// An attempt fails on transport error, non-2xx status, or the error
    /// sentinel in the body. Each retry is preceded by the configured fixed
    /// delay. After `max_retries` attempts the last cause is returned.
    pub async fn fetch(&self, ticker: &str, statement: StatementType) -> Result<Vec<u8>> {
        let url = self.statement_url(ticker, statement);
        let mut last_error = AppError::Network("No fetch attempt made".to_string());

        for attempt in 1..=self.max_retries {
            if attempt > 1 {
                sleep(self.retry_delay).await;
            }

            debug!(ticker, statement = %statement, attempt, "Fetching statement");
            match self.try_fetch(&url).await {
                Ok(body) => {
                    info!(ticker, statement = %statement, bytes = body.len(), "Fetched statement");
                    return Ok(body);
                }
                Err(e) => {
                    warn!(
                        ticker,
                        statement = %statement,
                        attempt,
                        max_retries = self.max_retries,
                        error = %e,
                        "Fetch attempt failed"
                    );
                    last_error = e;
                }
            }
        }

        Err(last_error)
    }

    async fn try_fetch(&self, url: &str) -> Result<Vec<u8>> {
        let response = self
            .client
            .get(url)
            .query(&[("datatype", "csv"), ("apikey", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| AppError::Network(format!("Request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Network(format!("API returned status {}", status)));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| AppError::Network(format!("Failed to read response body: {}", e)))?;

        if contains_error_sentinel(&String::from_utf8_lossy(&body)) {
            return Err(AppError::Network(
                "API returned an error message instead of statement data".to_string(),
            ));
        }

        Ok(body.to_vec())
    }

    /// Write fetched bytes verbatim to the statement's output file, creating
    /// the output directory if needed. Existing files are overwritten.
    pub fn save(&self, ticker: &str, statement: StatementType, content: &[u8]) -> Result<PathBuf> {
        std::fs::create_dir_all(&self.output_dir)?;
        let path = self.output_dir.join(statement.file_name(ticker));
        std::fs::write(&path, content)
            .map_err(|e| AppError::Io(format!("Failed to write {}: {}", path.display(), e)))?;
        info!(file = %path.display(), "Saved statement");
        Ok(path)
    }

    /// Fetch all three statements for a ticker independently; one statement
    /// failing does not block the others.
    pub async fn fetch_all(
        &self,
        ticker: &str,
    ) -> HashMap<StatementType, Result<Vec<u8>>> {
        let mut results = HashMap::new();
        for statement in StatementType::ALL {
            results.insert(statement, self.fetch(ticker, statement).await);
        }
        results
    }

    /// Fetch and save all statements for a ticker. Failed statements are
    /// logged and omitted from the returned map.
    pub async fn process_ticker(
        &self,
        ticker: &str,
    ) -> Result<HashMap<StatementType, PathBuf>> {
        info!(ticker, "Fetching financial statements");

        let mut saved = HashMap::new();
        for (statement, result) in self.fetch_all(ticker).await {
            match result {
                Ok(content) => {
                    let path = self.save(ticker, statement, &content)?;
                    saved.insert(statement, path);
                }
                Err(e) => {
                    error!(ticker, statement = %statement, error = %e, "Failed to fetch statement");
                }
            }
        }

        Ok(saved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{routing::get, Router};
    use std::net::SocketAddr;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tempfile::TempDir;

    fn test_config(base_url: String, output_dir: PathBuf) -> Config {
        Config {
            api_key: "test-key".to_string(),
            base_url,
            output_dir,
            scripts_dir: PathBuf::from("scripts"),
            max_retries: 3,
            retry_delay: Duration::from_millis(1),
            ticker_delay: Duration::from_millis(1),
            default_tickers: vec!["AAPL".to_string()],
            import: None,
        }
    }

    async fn spawn_server(app: Router) -> SocketAddr {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        addr
    }

    #[test]
    fn test_error_sentinel_detection() {
        assert!(contains_error_sentinel(
            "Invalid API KEY. Please Contact us to upgrade your plan."
        ));
        assert!(contains_error_sentinel("please CONTACT support"));
        assert!(!contains_error_sentinel("date,revenue\n2023-09-30,383285000000"));
    }

    #[test]
    fn test_statement_url() {
        let dir = TempDir::new().unwrap();
        let fetcher = StatementFetcher::new(&test_config(
            "https://example.com/api/v3".to_string(),
            dir.path().to_path_buf(),
        ))
        .unwrap();
        assert_eq!(
            fetcher.statement_url("AAPL", StatementType::BalanceSheet),
            "https://example.com/api/v3/balance-sheet-statement/AAPL"
        );
    }

    #[tokio::test]
    async fn test_retry_bound_on_sentinel_body() {
        let hits = Arc::new(AtomicUsize::new(0));
        let handler_hits = hits.clone();
        let app = Router::new().route(
            "/{endpoint}/{ticker}",
            get(move || {
                let hits = handler_hits.clone();
                async move {
                    hits.fetch_add(1, Ordering::SeqCst);
                    "Invalid API KEY. Please contact us to upgrade your plan."
                }
            }),
        );
        let addr = spawn_server(app).await;

        let dir = TempDir::new().unwrap();
        let fetcher = StatementFetcher::new(&test_config(
            format!("http://{}", addr),
            dir.path().to_path_buf(),
        ))
        .unwrap();

        let result = fetcher.fetch("AAPL", StatementType::IncomeStatement).await;
        assert!(result.is_err());
        // Exactly max_retries attempts, never a fourth
        assert_eq!(hits.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_fetch_and_save_success() {
        let app = Router::new().route(
            "/{endpoint}/{ticker}",
            get(|| async { "0,date,revenue\n1,2023-09-30,383285000000\n" }),
        );
        let addr = spawn_server(app).await;

        let dir = TempDir::new().unwrap();
        let fetcher = StatementFetcher::new(&test_config(
            format!("http://{}", addr),
            dir.path().to_path_buf(),
        ))
        .unwrap();

        let body = fetcher.fetch("AAPL", StatementType::CashFlow).await.unwrap();
        let path = fetcher.save("AAPL", StatementType::CashFlow, &body).unwrap();

        assert_eq!(path, dir.path().join("AAPL Cash Flow.csv"));
        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, "0,date,revenue\n1,2023-09-30,383285000000\n");
    }

    #[tokio::test]
    async fn test_fetch_all_isolates_failures() {
        // Balance sheet always fails, the other two succeed
        let app = Router::new()
            .route(
                "/balance-sheet-statement/{ticker}",
                get(|| async { "An error occurred, contact support." }),
            )
            .route(
                "/{endpoint}/{ticker}",
                get(|| async { "0,a,b\n1,c,d\n" }),
            );
        let addr = spawn_server(app).await;

        let dir = TempDir::new().unwrap();
        let fetcher = StatementFetcher::new(&test_config(
            format!("http://{}", addr),
            dir.path().to_path_buf(),
        ))
        .unwrap();

        let results = fetcher.fetch_all("AAPL").await;
        assert_eq!(results.len(), 3);
        assert!(results[&StatementType::IncomeStatement].is_ok());
        assert!(results[&StatementType::CashFlow].is_ok());
        assert!(results[&StatementType::BalanceSheet].is_err());
    }
}
