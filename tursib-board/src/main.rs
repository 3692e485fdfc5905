use std::process::ExitCode;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use tursib_board::board::{BoardRegistry, Poller};
use tursib_board::config::BoardConfig;
use tursib_board::source::{MockPageSource, PageSource, TimetableClient};
use tursib_board::web::{AppState, create_router};

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = match BoardConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("configuration error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let result = match &config.mock_dir {
        Some(dir) => {
            info!(dir = %dir.display(), "serving timetable pages from disk");
            match MockPageSource::new(dir) {
                Ok(source) => serve(source, &config).await,
                Err(e) => Err(e.to_string()),
            }
        }
        None => match TimetableClient::new(config.client_config()) {
            Ok(client) => serve(client, &config).await,
            Err(e) => Err(e.to_string()),
        },
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

/// Start the poller and serve the HTTP API until the server stops.
async fn serve<S: PageSource + 'static>(source: S, config: &BoardConfig) -> Result<(), String> {
    let registry = BoardRegistry::new(config.stations.clone());
    info!(
        stations = config.stations.len(),
        interval_secs = config.refresh_interval.as_secs(),
        "starting departure boards"
    );

    // Stations are refreshed in the background; the API serves whatever
    // the registry holds at request time.
    let poller = Poller::new(source, registry.clone(), config.refresh_interval);
    tokio::spawn(poller.run());

    let app = create_router(AppState::new(registry));

    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .map_err(|e| format!("failed to bind {}: {e}", config.listen_addr))?;
    info!(addr = %config.listen_addr, "listening");
    info!("  GET /health                  - Health check");
    info!("  GET /api/boards              - All station boards");
    info!("  GET /api/boards/:station_id  - One station board");

    axum::serve(listener, app)
        .await
        .map_err(|e| format!("server error: {e}"))
}
