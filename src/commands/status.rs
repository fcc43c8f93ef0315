use crate::utils::get_output_dir;
use chrono::{DateTime, Local};

pub fn run() {
    println!("📊 Statement Pipeline Status\n");

    match show_status() {
        Ok(()) => {}
        Err(e) => {
            eprintln!("❌ Error: {}", e);
            std::process::exit(1);
        }
    }
}

fn show_status() -> Result<(), Box<dyn std::error::Error>> {
    let api_key_set = std::env::var("FMP_API_KEY")
        .map(|v| !v.trim().is_empty())
        .unwrap_or(false);
    let import_ready = ["ANAPLAN_USER", "ANAPLAN_WORKSPACE_ID", "ANAPLAN_MODEL_ID"]
        .iter()
        .all(|key| std::env::var(key).is_ok());

    println!("🔑 API key:         {}", if api_key_set { "configured" } else { "missing" });
    println!("📦 Import dispatch: {}", if import_ready { "enabled" } else { "disabled" });

    let output_dir = get_output_dir();
    println!("📁 Output dir:      {}\n", output_dir.display());

    if !output_dir.exists() {
        println!("⚠️  No output yet. Run 'equityexplorer ticker <SYMBOL>' first.");
        return Ok(());
    }

    let mut files: Vec<(String, u64, DateTime<Local>)> = Vec::new();
    for entry in std::fs::read_dir(&output_dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.extension().map_or(false, |ext| ext == "csv") {
            let metadata = entry.metadata()?;
            let modified: DateTime<Local> = metadata.modified()?.into();
            let name = entry.file_name().to_string_lossy().to_string();
            files.push((name, metadata.len(), modified));
        }
    }

    if files.is_empty() {
        println!("⚠️  No statement files found in the output directory.");
        return Ok(());
    }

    // Newest first
    files.sort_by(|a, b| b.2.cmp(&a.2));

    println!("═══════════════════════════════════════════════════════════\n");
    for (name, size, modified) in &files {
        println!(
            "🔹 {:<40} {:>8} bytes  {}",
            name,
            size,
            modified.format("%Y-%m-%d %H:%M:%S")
        );
    }
    println!("\n═══════════════════════════════════════════════════════════");
    println!("💡 {} statement files in {}", files.len(), output_dir.display());

    Ok(())
}
