// TrashFlow - Web Server
// REST API over the shared Dashboard

use anyhow::{Context, Result};
use trashflow::api::{router, AppState};
use trashflow::{logging, AppConfig, Dashboard};
use tracing::info;

// ============================================================================
// Main Server
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    logging::init();

    let config = AppConfig::load()?;
    let dashboard = Dashboard::from_config(&config)?;
    info!(facilities = dashboard.records().len(), "dashboard ready");

    let app = router(AppState::new(dashboard, config.refresh_delay()));

    let listener = tokio::net::TcpListener::bind(&config.server_addr)
        .await
        .with_context(|| format!("Failed to bind to {}", config.server_addr))?;

    info!(addr = %config.server_addr, "server running");
    println!("\n🚀 Server running on http://{}", config.server_addr);
    println!("   API: http://{}/api/facilities", config.server_addr);
    println!("\n   Press Ctrl+C to stop\n");

    axum::serve(listener, app)
        .await
        .context("Failed to start server")?;

    Ok(())
}
