use crate::models::BatchSummary;
use crate::server::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::path::Path;
use tracing::{info, instrument, warn};

#[derive(Debug, Serialize)]
pub struct FileInfo {
    pub name: String,
    pub size: u64,
    pub modified: String,
}

/// GET /health - liveness and uptime
pub async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "uptime_secs": state.started_at.elapsed().as_secs(),
    }))
}

/// GET /api/status - pipeline readiness and the most recent output files
pub async fn status_handler(State(state): State<AppState>) -> impl IntoResponse {
    let config = state.explorer.config();
    let latest_files = list_output_files(&config.output_dir, Some(10));

    Json(json!({
        "status": "success",
        "output_directory": config.output_dir.display().to_string(),
        "import_dispatch_enabled": state.explorer.import_enabled(),
        "latest_files": latest_files,
    }))
}

/// GET /api/tickers - the configured default ticker list
pub async fn tickers_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "status": "success",
        "tickers": state.explorer.config().default_tickers,
    }))
}

/// GET /api/files - all output CSVs, newest first
pub async fn files_handler(State(state): State<AppState>) -> impl IntoResponse {
    let files = list_output_files(&state.explorer.config().output_dir, None);
    Json(json!({
        "status": "success",
        "files": files,
    }))
}

#[derive(Debug, Deserialize)]
pub struct ProcessRequest {
    pub tickers: Vec<String>,
}

/// POST /api/process - run the sequential pipeline over the given tickers.
///
/// The request blocks until the batch finishes, mirroring the CLI; tickers
/// are processed one at a time with the configured pacing delay.
#[instrument(skip(state, request))]
pub async fn process_handler(
    State(state): State<AppState>,
    Json(request): Json<ProcessRequest>,
) -> impl IntoResponse {
    let tickers: Vec<String> = request
        .tickers
        .iter()
        .map(|t| t.trim().to_uppercase())
        .filter(|t| !t.is_empty())
        .collect();

    if tickers.is_empty() {
        warn!("Process request without tickers");
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "status": "error",
                "message": "Ticker symbols are required",
            })),
        );
    }

    info!(count = tickers.len(), "Processing tickers via API");
    let reports = state.explorer.process_many(&tickers).await;
    let summary = BatchSummary::from_reports(&reports);

    let details: serde_json::Map<String, Value> = reports
        .iter()
        .map(|report| {
            (
                report.ticker.clone(),
                json!({
                    "outcome": report.outcome,
                    "statements": report.statements.keys().collect::<Vec<_>>(),
                }),
            )
        })
        .collect();

    (
        StatusCode::OK,
        Json(json!({
            "status": "success",
            "message": format!(
                "Processed {}/{} tickers successfully",
                summary.succeeded(),
                summary.total
            ),
            "results": {
                "total": summary.total,
                "complete": summary.complete,
                "partial": summary.partial,
                "failed": summary.failed,
                "details": details,
            },
        })),
    )
}

fn list_output_files(dir: &Path, limit: Option<usize>) -> Vec<FileInfo> {
    let mut files = Vec::new();
    let Ok(entries) = std::fs::read_dir(dir) else {
        return files;
    };

    for entry in entries.flatten() {
        let path = entry.path();
        if !path.extension().map_or(false, |ext| ext == "csv") {
            continue;
        }
        let Ok(metadata) = entry.metadata() else {
            continue;
        };
        let modified = metadata
            .modified()
            .map(|t| DateTime::<Local>::from(t).to_rfc3339())
            .unwrap_or_default();
        files.push(FileInfo {
            name: entry.file_name().to_string_lossy().to_string(),
            size: metadata.len(),
            modified,
        });
    }

    // Newest first
    files.sort_by(|a, b| b.modified.cmp(&a.modified));
    if let Some(limit) = limit {
        files.truncate(limit);
    }
    files
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_list_output_files_filters_and_limits() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("AAPL Income Statement.csv"), "a").unwrap();
        std::fs::write(dir.path().join("AAPL Balance Sheet.csv"), "b").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let all = list_output_files(dir.path(), None);
        assert_eq!(all.len(), 2);
        assert!(all.iter().all(|f| f.name.ends_with(".csv")));

        let limited = list_output_files(dir.path(), Some(1));
        assert_eq!(limited.len(), 1);
    }

    #[test]
    fn test_list_output_files_missing_dir() {
        let files = list_output_files(Path::new("/nonexistent/equityexplorer-output"), None);
        assert!(files.is_empty());
    }
}
