//! Pipeline orchestration.
//!
//! Per ticker: fetch all statements, reshape whatever arrived, then hand the
//! reshaped files to the import dispatcher when one is configured. Failures
//! are contained at ticker granularity; a ticker going down never aborts the
//! rest of a batch.

use crate::error::Result;
use crate::models::{BatchSummary, Config, TickerReport};
use crate::services::dispatcher::ImportDispatcher;
use crate::services::fetcher::StatementFetcher;
use crate::services::reshaper;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{error, info, warn};

pub struct EquityExplorer {
    config: Config,
    fetcher: StatementFetcher,
    dispatcher: Option<ImportDispatcher>,
}

impl EquityExplorer {
    pub fn new(config: Config) -> Result<Self> {
        config.create_directories()?;
        let fetcher = StatementFetcher::new(&config)?;

        let dispatcher = match &config.import {
            Some(import) => Some(ImportDispatcher::new(
                config.scripts_dir.clone(),
                import.clone(),
            )),
            None => {
                warn!("Planning-tool credentials not configured - import dispatch disabled");
                None
            }
        };

        info!(
            output_dir = %config.output_dir.display(),
            import_enabled = dispatcher.is_some(),
            "EquityExplorer initialized"
        );

        Ok(EquityExplorer {
            config,
            fetcher,
            dispatcher,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn import_enabled(&self) -> bool {
        self.dispatcher.is_some()
    }

    /// Run one ticker through fetch, reshape and optional dispatch.
    ///
    /// An empty fetch result fails the ticker; a partial one continues with
    /// whatever files exist. Stage errors are logged and converted into a
    /// failed report, never propagated.
    pub async fn process_single_ticker(&self, ticker: &str) -> TickerReport {
        info!(ticker, "Processing ticker");

        let fetched = match self.fetcher.process_ticker(ticker).await {
            Ok(files) => files,
            Err(e) => {
                error!(ticker, error = %e, "Fetch stage failed");
                return TickerReport::failed(ticker);
            }
        };
        if fetched.is_empty() {
            error!(ticker, "No statements fetched");
            return TickerReport::failed(ticker);
        }

        let reshaped = reshaper::process_statement_files(ticker, &self.config.output_dir);
        if reshaped.is_empty() {
            error!(ticker, "No statements survived reshaping");
            return TickerReport::failed(ticker);
        }

        if let Some(dispatcher) = &self.dispatcher {
            dispatcher.dispatch_statements(ticker, &reshaped).await;
        }

        let report = TickerReport::new(ticker, reshaped);
        info!(
            ticker,
            outcome = ?report.outcome,
            statements = report.statements.len(),
            "Finished ticker"
        );
        report
    }

    /// Process tickers strictly sequentially with a fixed pacing delay
    /// between them (the provider rate-limits aggressively on free plans).
    pub async fn process_many(&self, tickers: &[String]) -> Vec<TickerReport> {
        info!(count = tickers.len(), "Starting batch processing");

        let bar = ProgressBar::new(tickers.len() as u64);
        bar.set_style(
            ProgressStyle::with_template("[{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );

        let mut reports = Vec::with_capacity(tickers.len());
        for (i, ticker) in tickers.iter().enumerate() {
            bar.set_message(ticker.clone());
            reports.push(self.process_single_ticker(ticker).await);
            bar.inc(1);

            if i + 1 < tickers.len() {
                tokio::time::sleep(self.config.ticker_delay).await;
            }
        }
        bar.finish_and_clear();

        let summary = BatchSummary::from_reports(&reports);
        info!(
            total = summary.total,
            complete = summary.complete,
            partial = summary.partial,
            failed = summary.failed,
            "Batch processing finished"
        );
        reports
    }

    /// Process the configured default ticker list
    pub async fn run_full(&self) -> Vec<TickerReport> {
        let tickers = self.config.default_tickers.clone();
        info!(count = tickers.len(), "Running full pipeline over default tickers");
        self.process_many(&tickers).await
    }
}
