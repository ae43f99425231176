use csvview::{app, Config};
use std::env;

/// Main entry point for the CSV viewer
///
/// Reads the configuration from the command line, sets up logging and runs
/// the web server until it is stopped.
///
/// # Arguments
/// * `[host] [port]` - address to listen on, `127.0.0.1 8000` by default
/// * `--max-upload-bytes N` - upload limit, 2 MiB by default
/// * `--static-dir DIR` - directory served under `/static`
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::from_args(env::args().skip(1))?;
    log::info!("Starting CSV viewer on {}", config.address());

    app::run(config).await?;

    Ok(())
}
