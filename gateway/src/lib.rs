//! HTTP surface of the flight-data gateway.
//!
//! Thin axum layer over [`provider_client::FlightGateway`]: route table,
//! request/response models, and the airport reference cache. Handlers are
//! transport-agnostic: which provider transport is in play was decided once
//! at startup and injected through [`AppState`].

pub mod airports;
pub mod handlers;
pub mod models;

use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

use crate::airports::AirportIndex;
use provider_client::FlightGateway;

/// Shared state injected into every handler via `State`.
pub struct AppState {
    pub gateway: FlightGateway,
    pub airports: AirportIndex,
}

/// Build the gateway router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health))
        // Airport reference search
        .route("/airports", get(handlers::search_airports))
        // Live positions and per-flight details
        .route("/flights", get(handlers::live_flights))
        .route("/flights/:id", get(handlers::flight_details))
        // Departure board and schedule search
        .route("/live-departures", get(handlers::live_departures))
        .route("/search-flights", get(handlers::search_flights))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
