use serde::{Deserialize, Serialize};
use std::fmt;

/// The three financial statements fetched per ticker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatementType {
    IncomeStatement,
    BalanceSheet,
    CashFlow,
}

impl StatementType {
    /// All statement types in processing order
    pub const ALL: [StatementType; 3] = [
        StatementType::IncomeStatement,
        StatementType::BalanceSheet,
        StatementType::CashFlow,
    ];

    /// API endpoint path segment
    pub fn endpoint(&self) -> &'static str {
        match self {
            StatementType::IncomeStatement => "income-statement",
            StatementType::BalanceSheet => "balance-sheet-statement",
            StatementType::CashFlow => "cash-flow-statement",
        }
    }

    /// Human-readable label used in output file names
    pub fn label(&self) -> &'static str {
        match self {
            StatementType::IncomeStatement => "Income Statement",
            StatementType::BalanceSheet => "Balance Sheet",
            StatementType::CashFlow => "Cash Flow",
        }
    }

    /// Process name handed to the planning-tool import
    pub fn process_name(&self) -> &'static str {
        match self {
            StatementType::IncomeStatement => "Load Income Statement",
            StatementType::BalanceSheet => "Load Balance Sheet",
            StatementType::CashFlow => "Load Cash Flow",
        }
    }

    /// Launch-script template owned by the planning-tool integration
    pub fn script_name(&self) -> &'static str {
        match self {
            StatementType::BalanceSheet => "Basic Auth Process Script.bat",
            StatementType::IncomeStatement => "Basic Auth Process Script2.bat",
            StatementType::CashFlow => "Basic Auth Process Script3.bat",
        }
    }

    /// Output file name for a ticker ("AAPL Income Statement.csv")
    pub fn file_name(&self, ticker: &str) -> String {
        format!("{} {}.csv", ticker, self.label())
    }

    /// Intermediate file name used while a reshape is in flight
    pub fn intermediate_name(&self, ticker: &str) -> String {
        format!("{} {} New.csv", ticker, self.label())
    }
}

impl fmt::Display for StatementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}
