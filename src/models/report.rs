use super::StatementType;
use serde::Serialize;
use std::collections::HashMap;
use std::path::PathBuf;

/// Outcome of one ticker's run through the pipeline.
///
/// `Partial` (some but not all statements produced) counts as success for
/// batch summaries and exit codes; only `Failed` (nothing produced) is fatal
/// for the ticker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TickerOutcome {
    Complete,
    Partial,
    Failed,
}

/// Per-ticker pipeline result
#[derive(Debug, Clone, Serialize)]
pub struct TickerReport {
    pub ticker: String,
    pub statements: HashMap<StatementType, PathBuf>,
    pub outcome: TickerOutcome,
}

impl TickerReport {
    pub fn new(ticker: &str, statements: HashMap<StatementType, PathBuf>) -> Self {
        let outcome = match statements.len() {
            0 => TickerOutcome::Failed,
            n if n == StatementType::ALL.len() => TickerOutcome::Complete,
            _ => TickerOutcome::Partial,
        };
        TickerReport {
            ticker: ticker.to_string(),
            statements,
            outcome,
        }
    }

    pub fn failed(ticker: &str) -> Self {
        TickerReport {
            ticker: ticker.to_string(),
            statements: HashMap::new(),
            outcome: TickerOutcome::Failed,
        }
    }

    pub fn is_success(&self) -> bool {
        self.outcome != TickerOutcome::Failed
    }
}

/// Aggregate counts over a batch of ticker reports
#[derive(Debug, Clone, Serialize)]
pub struct BatchSummary {
    pub total: usize,
    pub complete: usize,
    pub partial: usize,
    pub failed: usize,
}

impl BatchSummary {
    pub fn from_reports(reports: &[TickerReport]) -> Self {
        let mut summary = BatchSummary {
            total: reports.len(),
            complete: 0,
            partial: 0,
            failed: 0,
        };
        for report in reports {
            match report.outcome {
                TickerOutcome::Complete => summary.complete += 1,
                TickerOutcome::Partial => summary.partial += 1,
                TickerOutcome::Failed => summary.failed += 1,
            }
        }
        summary
    }

    pub fn succeeded(&self) -> usize {
        self.complete + self.partial
    }

    pub fn all_succeeded(&self) -> bool {
        self.failed == 0
    }
}
