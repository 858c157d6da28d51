use std::net::SocketAddr;
use std::sync::Arc;

use dreampsyche_server::app;
use dreampsyche_server::config::{establish_connection, AppConfig};
use dreampsyche_server::domain::ai::client::OpenAiClient;
use dreampsyche_server::domain::health::init_start_time;
use dreampsyche_server::state::AppState;
use dreampsyche_server::utils::logging::init_logging;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // Guard must live for the whole process or file logging stops.
    let _guard = init_logging();

    init_start_time();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    let db = match establish_connection(&config.database_url).await {
        Ok(db) => db,
        Err(e) => {
            tracing::error!("Database connection failed: {}", e);
            std::process::exit(1);
        }
    };

    let ai = Arc::new(OpenAiClient::new(&config.openai_api_key));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let state = AppState {
        db: Arc::new(db),
        config,
        ai,
    };
    let app = app(state);

    tracing::info!("Server listening on {}", addr);

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!("Failed to bind {}: {}", addr, e);
            std::process::exit(1);
        }
    };
    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
