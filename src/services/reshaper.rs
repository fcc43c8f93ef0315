//! CSV reshaping for fetched statement files.
//!
//! Raw statement CSVs arrive with a leading row-index column and no ticker
//! column. Reshaping strips column 0, appends the ticker as a trailing field
//! on every row, and (income statement only) relabels the period-header row.
//! Reshaping rewrites files in place through a short-lived intermediate;
//! re-running it on an already-reshaped file appends the ticker column again.

use crate::constants::{PERIOD_HEADER_MARKER, REMOVED_COLUMN_INDEX, TICKER_HEADER_LABEL};
use crate::error::{AppError, Result};
use crate::models::StatementType;
use csv::{ReaderBuilder, WriterBuilder};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

/// Remove one column from a CSV, writing the result to a new file.
///
/// Rows with more fields than `column_index` lose that field; shorter rows
/// pass through unchanged. Row order is preserved. The input is never
/// mutated.
pub fn remove_column(input: &Path, output: &Path, column_index: usize) -> Result<PathBuf> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(input)
        .map_err(|e| AppError::Io(format!("Failed to open {}: {}", input.display(), e)))?;
    let mut writer = WriterBuilder::new()
        .flexible(true)
        .from_path(output)
        .map_err(|e| AppError::Io(format!("Failed to create {}: {}", output.display(), e)))?;

    for record in reader.records() {
        let record = record?;
        let fields: Vec<&str> = record
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != column_index)
            .map(|(_, field)| field)
            .collect();
        if fields.is_empty() {
            // A single-field row loses its only field; keep the row itself
            writer.write_record([""])?;
        } else {
            writer.write_record(&fields)?;
        }
    }

    writer.flush()?;
    debug!(column_index, file = %input.display(), "Removed column");
    Ok(output.to_path_buf())
}

/// Append the ticker symbol as a trailing field on every row, header included
pub fn append_ticker_column(input: &Path, output: &Path, ticker: &str) -> Result<PathBuf> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(input)
        .map_err(|e| AppError::Io(format!("Failed to open {}: {}", input.display(), e)))?;
    let mut writer = WriterBuilder::new()
        .flexible(true)
        .from_path(output)
        .map_err(|e| AppError::Io(format!("Failed to create {}: {}", output.display(), e)))?;

    for record in reader.records() {
        let record = record?;
        let mut fields: Vec<String> = record.iter().map(str::to_string).collect();
        fields.push(ticker.to_string());
        writer.write_record(&fields)?;
    }

    writer.flush()?;
    Ok(output.to_path_buf())
}

/// Replace the ticker symbol with the fixed header label on period-header
/// lines.
///
/// Operates on lines containing the "FY" marker; every literal occurrence of
/// the ticker on such a line becomes "Ticker:". All other lines are left
/// byte-identical. This is a textual substitution, not column-aware, matching
/// the planning-tool template the files feed into.
pub fn relabel_header(path: &Path, ticker: &str) -> Result<()> {
    let content = fs::read_to_string(path)
        .map_err(|e| AppError::Io(format!("Failed to read {}: {}", path.display(), e)))?;

    let rewritten: String = content
        .split_inclusive('\n')
        .map(|line| {
            if line.contains(PERIOD_HEADER_MARKER) {
                line.replace(ticker, TICKER_HEADER_LABEL)
            } else {
                line.to_string()
            }
        })
        .collect();

    if rewritten != content {
        fs::write(path, rewritten)
            .map_err(|e| AppError::Io(format!("Failed to write {}: {}", path.display(), e)))?;
        info!(ticker, file = %path.display(), "Relabeled period header");
    } else {
        debug!(ticker, file = %path.display(), "No period header to relabel");
    }

    Ok(())
}

/// Reshape every fetched statement file for a ticker.
///
/// Per statement: strip column 0 into an intermediate file, append the ticker
/// column back into the original name, delete the intermediate, and relabel
/// the income statement's period header. Missing inputs are skipped with a
/// warning; a failed statement is logged and omitted. The returned map holds
/// the successfully reshaped paths.
pub fn process_statement_files(ticker: &str, dir: &Path) -> HashMap<StatementType, PathBuf> {
    let mut processed = HashMap::new();

    for statement in StatementType::ALL {
        match reshape_statement(ticker, statement, dir) {
            Ok(path) => {
                processed.insert(statement, path);
            }
            Err(AppError::MissingInput(msg)) => {
                warn!(ticker, statement = %statement, "{} - skipping", msg);
            }
            Err(e) => {
                error!(ticker, statement = %statement, error = %e, "Failed to reshape statement");
            }
        }
    }

    processed
}

fn reshape_statement(ticker: &str, statement: StatementType, dir: &Path) -> Result<PathBuf> {
    let input = dir.join(statement.file_name(ticker));
    if !input.exists() {
        return Err(AppError::MissingInput(format!(
            "Statement file not found: {}",
            input.display()
        )));
    }

    let intermediate = dir.join(statement.intermediate_name(ticker));

    remove_column(&input, &intermediate, REMOVED_COLUMN_INDEX)?;
    append_ticker_column(&intermediate, &input, ticker)?;
    fs::remove_file(&intermediate).map_err(|e| {
        AppError::Io(format!(
            "Failed to remove intermediate {}: {}",
            intermediate.display(),
            e
        ))
    })?;

    if statement == StatementType::IncomeStatement {
        relabel_header(&input, ticker)?;
    }

    info!(ticker, statement = %statement, "Reshaped statement file");
    Ok(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_remove_column_drops_index_zero() {
        let dir = TempDir::new().unwrap();
        let input = write_file(&dir, "in.csv", "0,date,revenue\n1,2021,100\n2,2022,200\n");
        let output = dir.path().join("out.csv");

        remove_column(&input, &output, 0).unwrap();

        let result = fs::read_to_string(&output).unwrap();
        assert_eq!(result, "date,revenue\n2021,100\n2022,200\n");
        // Input untouched
        let original = fs::read_to_string(&input).unwrap();
        assert_eq!(original, "0,date,revenue\n1,2021,100\n2,2022,200\n");
    }

    #[test]
    fn test_remove_column_passes_short_rows_through() {
        let dir = TempDir::new().unwrap();
        let input = write_file(&dir, "in.csv", "a,b,c\nx\nd,e,f\n");
        let output = dir.path().join("out.csv");

        // Removing index 2: three-field rows shrink, the one-field row survives
        remove_column(&input, &output, 2).unwrap();

        let result = fs::read_to_string(&output).unwrap();
        assert_eq!(result, "a,b\nx\nd,e\n");
    }

    #[test]
    fn test_append_ticker_column_includes_header() {
        let dir = TempDir::new().unwrap();
        let input = write_file(&dir, "in.csv", "date,revenue\n2021,100\n");
        let output = dir.path().join("out.csv");

        append_ticker_column(&input, &output, "AAPL").unwrap();

        let result = fs::read_to_string(&output).unwrap();
        assert_eq!(result, "date,revenue,AAPL\n2021,100,AAPL\n");
    }

    #[test]
    fn test_relabel_header_only_touches_fy_lines() {
        let dir = TempDir::new().unwrap();
        let path = write_file(
            &dir,
            "in.csv",
            "AAPL,FY,AAPL\nAAPL revenue,2021,100\nother,2022,200\n",
        );

        relabel_header(&path, "AAPL").unwrap();

        let result = fs::read_to_string(&path).unwrap();
        // Both occurrences on the FY line replaced; non-FY lines byte-identical
        assert_eq!(
            result,
            "Ticker:,FY,Ticker:\nAAPL revenue,2021,100\nother,2022,200\n"
        );
    }

    #[test]
    fn test_relabel_header_without_marker_is_noop() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "in.csv", "date,revenue\n2021,100\n");

        relabel_header(&path, "AAPL").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "date,revenue\n2021,100\n");
    }

    #[test]
    fn test_process_statement_files_end_to_end() {
        let dir = TempDir::new().unwrap();
        write_file(&dir, "ABC Income Statement.csv", "0,ABC,FY\n1,IncomeA,2021\n2,IncomeB,2022\n");
        write_file(&dir, "ABC Balance Sheet.csv", "0,BalanceA,2021\n");
        write_file(&dir, "ABC Cash Flow.csv", "0,CashA,2021\n");

        let processed = process_statement_files("ABC", dir.path());
        assert_eq!(processed.len(), 3);

        // Column 0 removed, ticker appended, header relabeled (income only).
        // The appended ticker on the FY line is relabeled too since the header
        // pass runs after the append.
        let income = fs::read_to_string(dir.path().join("ABC Income Statement.csv")).unwrap();
        assert_eq!(income, "Ticker:,FY,Ticker:\nIncomeA,2021,ABC\nIncomeB,2022,ABC\n");

        let balance = fs::read_to_string(dir.path().join("ABC Balance Sheet.csv")).unwrap();
        assert_eq!(balance, "BalanceA,2021,ABC\n");

        // Intermediates cleaned up
        assert!(!dir.path().join("ABC Income Statement New.csv").exists());
        assert!(!dir.path().join("ABC Balance Sheet New.csv").exists());
    }

    #[test]
    fn test_process_statement_files_skips_missing_inputs() {
        let dir = TempDir::new().unwrap();
        write_file(&dir, "ABC Cash Flow.csv", "0,CashA,2021\n");

        let processed = process_statement_files("ABC", dir.path());

        assert_eq!(processed.len(), 1);
        assert!(processed.contains_key(&StatementType::CashFlow));
    }

    #[test]
    fn test_reshaping_twice_appends_ticker_again() {
        // The pipeline does not guard against double-processing; a second run
        // strips the (already data-bearing) first column and appends another
        // ticker field. Documented behavior, not an accident.
        let dir = TempDir::new().unwrap();
        write_file(&dir, "ABC Balance Sheet.csv", "0,BalanceA,2021\n");

        process_statement_files("ABC", dir.path());
        let once = fs::read_to_string(dir.path().join("ABC Balance Sheet.csv")).unwrap();
        assert_eq!(once, "BalanceA,2021,ABC\n");

        process_statement_files("ABC", dir.path());
        let twice = fs::read_to_string(dir.path().join("ABC Balance Sheet.csv")).unwrap();
        assert_eq!(twice, "2021,ABC,ABC\n");
    }
}
