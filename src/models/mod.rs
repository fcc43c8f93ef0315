mod config;
mod report;
mod statement;

pub use config::{Config, ImportConfig};
pub use report::{BatchSummary, TickerOutcome, TickerReport};
pub use statement::StatementType;
