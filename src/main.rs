//! Calorie Counter
//!
//! Serves the JSON API over HTTP, or the same tools over MCP stdio when
//! started with `--mcp`.

use rmcp::ServiceExt;
use tokio::io::{stdin, stdout};
use tracing::info;
use tracing_subscriber::EnvFilter;

use calorie_counter::build_info;
use calorie_counter::config::Config;
use calorie_counter::http;
use calorie_counter::mcp::CalorieService;
use calorie_counter::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // A missing .env file is fine
    let dotenv = dotenvy::dotenv();

    // Logs go to stderr so MCP stdio stays clean
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("calorie_counter=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    if let Ok(path) = dotenv {
        info!("Loaded environment from {}", path.display());
    }

    let mcp_mode = std::env::args().skip(1).any(|arg| arg == "--mcp");
    let config = Config::from_env();

    if mcp_mode {
        build_info::print_startup_banner("MCP stdio");
    } else {
        build_info::print_startup_banner(&format!("HTTP {}", config.bind_addr));
    }
    eprintln!("Database path: {}", config.database_path.display());

    let state = AppState::initialize(config)?;

    if mcp_mode {
        let service = CalorieService::new(state);
        let server = service.serve((stdin(), stdout())).await?;
        server.waiting().await?;
        return Ok(());
    }

    let listener = tokio::net::TcpListener::bind(state.config.bind_addr).await?;
    info!("Listening on http://{}", listener.local_addr()?);
    axum::serve(listener, http::router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}
