use log::{error, info, warn};
use std::net::SocketAddr;

use sprite_sync::config::ServerConfig;
use sprite_sync::constants::WS_PATH;
use sprite_sync::core::server::create_server_manager;
use sprite_sync::handlers::ws_route;

#[tokio::main]
async fn main() {
    // Load .env before the logger so RUST_LOG can come from it
    let dotenv_result = dotenvy::dotenv();
    env_logger::init();

    match dotenv_result {
        Ok(path) => info!("Environment variables loaded from {}", path.display()),
        Err(e) => warn!("No .env file loaded: {}", e),
    }

    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    info!(
        "Configuration: host={}, port={}, message_ttl={:?}",
        config.host, config.port, config.message_ttl
    );

    let server = create_server_manager(config.world_settings());
    let routes = ws_route(server);

    // Build the server address
    let addr: SocketAddr = match format!("{}:{}", config.host, config.port).parse() {
        Ok(addr) => addr,
        Err(e) => {
            error!("Failed to parse server address: {}", e);
            std::process::exit(1);
        }
    };

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for shutdown signal: {}", e);
        }
        info!("Shutdown signal received");
    };

    match warp::serve(routes).try_bind_with_graceful_shutdown(addr, shutdown) {
        Ok((bound, running)) => {
            info!("Sprite Sync listening on ws://{}/{}", bound, WS_PATH);
            running.await;
            info!("Server stopped");
        }
        Err(e) => {
            error!("Failed to bind {}: {}", addr, e);
            std::process::exit(1);
        }
    }
}
