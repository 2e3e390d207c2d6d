// Callback Gateway Server
//
// Standalone front-end for the Spotify/Discord OAuth redirect leg
// Receives the provider redirect, exchanges the code with the backend API,
// and renders the normalized result

use callback_gateway::{analytics, config::AppConfig, server::start_server};
use std::env;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    println!("Callback Gateway Server");
    println!();

    // Configuration is read once; the reconciler and the bootstrapper get
    // the same immutable struct
    let config = AppConfig::from_env()?;
    println!("[OK] Backend API: {}", config.api_base_url);

    if analytics::init(&config).is_some() {
        println!("[OK] Analytics initialized");
    }

    // Parse command-line arguments
    let args: Vec<String> = env::args().collect();
    let host = args.get(1).map(|s| s.as_str()).unwrap_or("127.0.0.1");
    let port = args
        .get(2)
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(8080);

    println!();
    println!("[INFO] Starting callback gateway on {}:{}", host, port);
    println!();
    println!("[INFO] Available endpoints:");
    println!(
        "  GET    http://{}:{}/callback            - OAuth redirect callback",
        host, port
    );
    println!(
        "  GET    http://{}:{}/healthz             - Liveness probe",
        host, port
    );
    println!();

    // Start the server
    start_server(host, port, &config).await?;

    Ok(())
}
