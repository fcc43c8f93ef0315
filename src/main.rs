fn main() {
    // Load .env if present; real environment variables win
    dotenvy::dotenv().ok();

    equityexplorer::cli::run();
}
