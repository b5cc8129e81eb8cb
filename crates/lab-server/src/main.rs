mod config;
mod sim;
mod wiring;

use std::error::Error;

use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use crate::config::RunMode;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    init_tracing();

    let config = config::Config::from_env()?;
    tracing::info!(mode = config.mode.as_str(), "lab-server starting");

    match config.mode {
        RunMode::Sim => {
            sim::run_once(&config)?;
        }
        RunMode::Serve => {
            let listener = TcpListener::bind(config.listen_addr).await?;
            tracing::info!(addr = %config.listen_addr, "listening");
            axum::serve(listener, wiring::build_app()).await?;
        }
    }
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
