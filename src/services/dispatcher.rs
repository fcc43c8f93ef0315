//! Planning-tool import dispatch.
//!
//! The downstream import tool is driven by launch scripts it owns; this
//! module's only obligation is to fill three placeholders in each script
//! (file name, file path, process name) and start the script as a detached
//! process. The tool's exit status is never interpreted.

use crate::constants::DISPATCH_DELAY_SECS;
use crate::error::{AppError, Result};
use crate::models::{ImportConfig, StatementType};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{error, info};

/// Parameters for one launch-script invocation
#[derive(Debug, Clone)]
pub struct ImportJob {
    pub file_name: String,
    pub file_path: PathBuf,
    pub process_name: String,
}

impl ImportJob {
    pub fn for_statement(ticker: &str, statement: StatementType, file_path: &Path) -> Self {
        ImportJob {
            file_name: statement.file_name(ticker),
            file_path: file_path.to_path_buf(),
            process_name: statement.process_name().to_string(),
        }
    }
}

/// Handle for a launched import process
#[derive(Debug)]
pub struct DispatchHandle {
    pub script: PathBuf,
    pub pid: u32,
}

/// Updates launch-script templates and starts them as detached processes
pub struct ImportDispatcher {
    scripts_dir: PathBuf,
    import: ImportConfig,
}

impl ImportDispatcher {
    pub fn new(scripts_dir: PathBuf, import: ImportConfig) -> Self {
        ImportDispatcher {
            scripts_dir,
            import,
        }
    }

    /// Rewrite a statement's launch script with the job's values.
    ///
    /// Substitution is keyed on the `set FileName=` / `set FilePath=` /
    /// `set ProcessName=` lines, wherever they sit in the template. All other
    /// lines are preserved verbatim.
    pub fn update_script(&self, statement: StatementType, job: &ImportJob) -> Result<PathBuf> {
        let script_path = self.scripts_dir.join(statement.script_name());
        if !script_path.exists() {
            return Err(AppError::Dispatch(format!(
                "Launch script not found: {}",
                script_path.display()
            )));
        }

        let template = fs::read_to_string(&script_path).map_err(|e| {
            AppError::Dispatch(format!("Failed to read {}: {}", script_path.display(), e))
        })?;
        let rendered = render_script(&template, job);
        fs::write(&script_path, rendered).map_err(|e| {
            AppError::Dispatch(format!("Failed to write {}: {}", script_path.display(), e))
        })?;

        info!(
            script = %script_path.display(),
            file_name = %job.file_name,
            "Updated launch script"
        );
        Ok(script_path)
    }

    /// Launch a script as a detached process; fire and forget
    pub fn dispatch(&self, script: &Path) -> Result<DispatchHandle> {
        let child = spawn_detached(script)?;
        let handle = DispatchHandle {
            script: script.to_path_buf(),
            pid: child.id(),
        };
        info!(script = %script.display(), pid = handle.pid, "Launched import script");
        Ok(handle)
    }

    /// Update and launch the script for every reshaped statement, with a
    /// pacing delay between launches. Individual failures are logged and do
    /// not roll back already-reshaped files.
    pub async fn dispatch_statements(
        &self,
        ticker: &str,
        files: &HashMap<StatementType, PathBuf>,
    ) -> Vec<DispatchHandle> {
        info!(
            ticker,
            workspace = %self.import.workspace_id,
            model = %self.import.model_id,
            user = %self.import.user,
            statements = files.len(),
            "Dispatching statements to planning-tool import"
        );

        let mut handles = Vec::new();
        for statement in StatementType::ALL {
            let Some(path) = files.get(&statement) else {
                continue;
            };

            let job = ImportJob::for_statement(ticker, statement, path);
            match self
                .update_script(statement, &job)
                .and_then(|script| self.dispatch(&script))
            {
                Ok(handle) => handles.push(handle),
                Err(e) => {
                    error!(ticker, statement = %statement, error = %e, "Import dispatch failed");
                }
            }

            sleep(Duration::from_secs(DISPATCH_DELAY_SECS)).await;
        }

        handles
    }
}

fn render_script(template: &str, job: &ImportJob) -> String {
    template
        .split_inclusive('\n')
        .map(|line| {
            let trimmed = line.trim_start();
            if trimmed.starts_with("set FileName=") {
                replace_line(line, &format!("set FileName=\"{}\"", job.file_name))
            } else if trimmed.starts_with("set FilePath=") {
                replace_line(line, &format!("set FilePath=\"{}\"", job.file_path.display()))
            } else if trimmed.starts_with("set ProcessName=") {
                replace_line(line, &format!("set ProcessName=\"{}\"", job.process_name))
            } else {
                line.to_string()
            }
        })
        .collect()
}

fn replace_line(original: &str, replacement: &str) -> String {
    if original.ends_with("\r\n") {
        format!("{}\r\n", replacement)
    } else if original.ends_with('\n') {
        format!("{}\n", replacement)
    } else {
        replacement.to_string()
    }
}

#[cfg(windows)]
fn spawn_detached(script: &Path) -> Result<Child> {
    Command::new("cmd")
        .arg("/C")
        .arg("start")
        .arg("")
        .arg(script)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|e| AppError::Dispatch(format!("Failed to launch {}: {}", script.display(), e)))
}

#[cfg(not(windows))]
fn spawn_detached(script: &Path) -> Result<Child> {
    Command::new("sh")
        .arg(script)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|e| AppError::Dispatch(format!("Failed to launch {}: {}", script.display(), e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const TEMPLATE: &str = "@echo off\r\n\
        set ServiceUrl=\"https://api.anaplan.com\"\r\n\
        set FileName=\"PLACEHOLDER\"\r\n\
        set FilePath=\"PLACEHOLDER\"\r\n\
        set ProcessName=\"PLACEHOLDER\"\r\n\
        call AnaplanClient.bat -s %ServiceUrl% -f %FileName% -p %FilePath%\r\n";

    fn test_job() -> ImportJob {
        ImportJob {
            file_name: "AAPL Balance Sheet.csv".to_string(),
            file_path: PathBuf::from("/data/output/AAPL Balance Sheet.csv"),
            process_name: "Load Balance Sheet".to_string(),
        }
    }

    fn test_dispatcher(scripts_dir: PathBuf) -> ImportDispatcher {
        ImportDispatcher::new(
            scripts_dir,
            ImportConfig {
                user: "user@example.com".to_string(),
                workspace_id: "ws-1".to_string(),
                model_id: "model-1".to_string(),
            },
        )
    }

    #[test]
    fn test_render_script_substitutes_all_keys() {
        let rendered = render_script(TEMPLATE, &test_job());

        assert!(rendered.contains("set FileName=\"AAPL Balance Sheet.csv\"\r\n"));
        assert!(rendered.contains("set FilePath=\"/data/output/AAPL Balance Sheet.csv\"\r\n"));
        assert!(rendered.contains("set ProcessName=\"Load Balance Sheet\"\r\n"));
        assert!(!rendered.contains("PLACEHOLDER"));
        // Untouched lines stay byte-identical, terminators included
        assert!(rendered.starts_with("@echo off\r\n"));
        assert!(rendered.contains("set ServiceUrl=\"https://api.anaplan.com\"\r\n"));
        assert!(rendered.contains("call AnaplanClient.bat"));
    }

    #[test]
    fn test_render_script_is_position_independent() {
        // Keys are matched by name, not line number
        let shuffled = "rem header\nset ProcessName=\"OLD\"\nrem middle\nset FileName=\"OLD\"\n";
        let rendered = render_script(shuffled, &test_job());

        assert!(rendered.contains("set ProcessName=\"Load Balance Sheet\"\n"));
        assert!(rendered.contains("set FileName=\"AAPL Balance Sheet.csv\"\n"));
        assert!(rendered.contains("rem header\n"));
        assert!(rendered.contains("rem middle\n"));
    }

    #[test]
    fn test_update_script_rewrites_template_in_place() {
        let dir = TempDir::new().unwrap();
        let script = dir.path().join(StatementType::BalanceSheet.script_name());
        fs::write(&script, TEMPLATE).unwrap();

        let dispatcher = test_dispatcher(dir.path().to_path_buf());
        let path = dispatcher
            .update_script(StatementType::BalanceSheet, &test_job())
            .unwrap();

        assert_eq!(path, script);
        let updated = fs::read_to_string(&script).unwrap();
        assert!(updated.contains("set FileName=\"AAPL Balance Sheet.csv\""));
    }

    #[test]
    fn test_update_script_missing_template() {
        let dir = TempDir::new().unwrap();
        let dispatcher = test_dispatcher(dir.path().to_path_buf());

        let result = dispatcher.update_script(StatementType::CashFlow, &test_job());
        assert!(matches!(result, Err(AppError::Dispatch(_))));
    }
}
