use std::path::PathBuf;

/// Get output directory for statement CSVs from environment variable or use default
pub fn get_output_dir() -> PathBuf {
    std::env::var("OUTPUT_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("output"))
}

/// Get directory holding the import launch-script templates
pub fn get_scripts_dir() -> PathBuf {
    std::env::var("SCRIPTS_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("scripts"))
}
