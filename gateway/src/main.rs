//! Gateway service — HTTP API over the live flight-data provider.
//!
//! Presents one stable contract (live positions, departures, flight details,
//! flight search, airport lookup) regardless of how the provider is reached.
//! The transport is selected once at startup and injected into the handlers;
//! nothing below `main` branches on the deployment environment.
//!
//! # Configuration
//! | Env var                 | Default              |
//! |-------------------------|----------------------|
//! | `GATEWAY_ADDR`          | `0.0.0.0:8080`       |
//! | `PROVIDER_BASE_URL`     | unset → local mode   |
//! | `PROVIDER_COMMAND`      | `python3`            |
//! | `PROVIDER_SCRIPT_DIR`   | `provider`           |
//! | `PROVIDER_TIMEOUT_SECS` | `30`                 |
//! | `AIRPORTS_FILE`         | `data/airports.json` |

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tracing::info;

use gateway::{airports::AirportIndex, router, AppState};
use provider_client::{FlightGateway, LocalProcessTransport, ProviderTransport, RemoteTransport};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("gateway=info".parse()?),
        )
        .json()
        .init();

    let timeout = std::env::var("PROVIDER_TIMEOUT_SECS")
        .ok()
        .and_then(|s| s.parse().ok())
        .map(Duration::from_secs)
        .unwrap_or(Duration::from_secs(30));

    // Transport selection is a startup decision, never a per-request branch.
    let transport: Arc<dyn ProviderTransport> = match std::env::var("PROVIDER_BASE_URL") {
        Ok(base) if !base.trim().is_empty() => {
            info!(base_url = %base, "using remote provider transport");
            Arc::new(RemoteTransport::new(base, timeout))
        }
        _ => {
            let command =
                std::env::var("PROVIDER_COMMAND").unwrap_or_else(|_| "python3".to_string());
            let script_dir =
                std::env::var("PROVIDER_SCRIPT_DIR").unwrap_or_else(|_| "provider".to_string());
            info!(command, script_dir, "using local provider transport");
            Arc::new(LocalProcessTransport::new(command, script_dir, timeout))
        }
    };

    let airports_file =
        std::env::var("AIRPORTS_FILE").unwrap_or_else(|_| "data/airports.json".to_string());

    let state = Arc::new(AppState {
        gateway: FlightGateway::new(transport),
        airports: AirportIndex::new(airports_file),
    });

    let app = router(state);

    let bind_addr = std::env::var("GATEWAY_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!(addr = bind_addr, "gateway listening");

    axum::serve(listener, app).await?;

    Ok(())
}
