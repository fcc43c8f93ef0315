//! Pipeline constants
//!
//! Defaults for the statement fetch/reshape pipeline. Everything here can be
//! overridden through the environment (see `models::Config`).

/// Default Financial Modeling Prep API base URL
pub const DEFAULT_BASE_URL: &str = "https://financialmodelingprep.com/api/v3";

/// Substring that marks a soft API failure inside a 200 response body.
///
/// The provider answers invalid keys, unknown tickers and exceeded plans with
/// a human-readable message instead of an error status, and the one marker
/// those messages share is the word "contact" (as in "please contact us").
/// Matching that substring is fragile but it is the provider's de-facto error
/// contract, so it is kept verbatim.
pub const ERROR_SENTINEL: &str = "contact";

/// Fetch attempts per statement before giving up
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Fixed delay before each fetch retry (seconds)
pub const DEFAULT_RETRY_DELAY_SECS: u64 = 2;

/// Pacing delay between tickers in a batch (seconds)
pub const DEFAULT_TICKER_DELAY_SECS: u64 = 2;

/// Pacing delay between import-script launches for one ticker (seconds)
pub const DISPATCH_DELAY_SECS: u64 = 2;

/// HTTP request timeout (seconds)
pub const HTTP_TIMEOUT_SECS: u64 = 30;

/// Column stripped from every fetched statement CSV.
///
/// The pipeline only ever removes this single leading index column, even
/// though `reshaper::remove_column` could remove any index.
pub const REMOVED_COLUMN_INDEX: usize = 0;

/// Marker identifying the period-header row of a statement CSV ("FY 2023" etc.)
pub const PERIOD_HEADER_MARKER: &str = "FY";

/// Label substituted for the ticker symbol on the period-header row
pub const TICKER_HEADER_LABEL: &str = "Ticker:";

/// Fallback ticker list for `full` runs when DEFAULT_TICKERS is not set
pub const DEFAULT_TICKERS: &[&str] = &["AAPL", "MSFT", "GOOGL", "AMZN", "TSLA"];
