//! FlightGateway — the façade unifying the four provider operations.
//!
//! Each operation validates its parameters, invokes the injected transport
//! once, and normalizes the answer. Transport and parse detail never leaves
//! this module except through logs; callers see the taxonomy in
//! [`GatewayError`].

use std::sync::Arc;

use tracing::{error, warn};

use crate::envelope::{normalize, ProviderError};
use crate::error::GatewayError;
use crate::models::{iata_code, BoundingBox, Departure, Flight, FlightDetails, SearchResult};
use crate::operation::{Operation, DEFAULT_DEPARTURE_AIRPORT, DEFAULT_POSITION_LIMIT};
use crate::transport::ProviderTransport;

pub struct FlightGateway {
    transport: Arc<dyn ProviderTransport>,
}

impl FlightGateway {
    pub fn new(transport: Arc<dyn ProviderTransport>) -> Self {
        Self { transport }
    }

    /// Live aircraft positions, optionally scoped to a viewport.
    ///
    /// `limit` caps the snapshot size; callers on constrained clients pass a
    /// smaller value, the gateway forwards whatever was requested.
    pub async fn live_positions(
        &self,
        bounds: Option<BoundingBox>,
        limit: Option<u32>,
    ) -> Result<Vec<Flight>, GatewayError> {
        let op = Operation::LivePositions {
            bounds,
            limit: limit.unwrap_or(DEFAULT_POSITION_LIMIT),
        };
        let raw = self.transport.invoke(&op).await;
        normalize::<Vec<Flight>>(raw).map_err(|e| {
            error!(operation = op.name(), error = %e, "provider operation failed");
            GatewayError::Backend("Failed to fetch flights".to_string())
        })
    }

    /// Departure board for one airport (defaults to GRU).
    pub async fn live_departures(
        &self,
        airport: Option<&str>,
    ) -> Result<Vec<Departure>, GatewayError> {
        let op = Operation::LiveDepartures {
            airport: airport.unwrap_or(DEFAULT_DEPARTURE_AIRPORT).to_string(),
        };
        let raw = self.transport.invoke(&op).await;
        normalize::<Vec<Departure>>(raw).map_err(|e| match e {
            ProviderError::Reported(msg) => {
                warn!(operation = op.name(), error = %msg, "provider reported failure");
                GatewayError::Backend(msg)
            }
            other => {
                error!(operation = op.name(), error = %other, "provider operation failed");
                GatewayError::Backend("Failed to fetch departures".to_string())
            }
        })
    }

    /// Detail record for one flight, keyed by id plus optional hints.
    ///
    /// A provider-reported failure means the flight is unknown and maps to
    /// [`GatewayError::NotFound`] with the provider's message.
    pub async fn flight_details(
        &self,
        id: &str,
        airline_icao: Option<&str>,
        aircraft: Option<&str>,
    ) -> Result<FlightDetails, GatewayError> {
        if id.trim().is_empty() {
            return Err(GatewayError::Validation("Missing flight ID".to_string()));
        }

        let op = Operation::FlightDetails {
            id: id.to_string(),
            airline_icao: airline_icao.unwrap_or_default().to_string(),
            aircraft: aircraft.unwrap_or_default().to_string(),
        };
        let raw = self.transport.invoke(&op).await;
        normalize::<FlightDetails>(raw).map_err(|e| match e {
            ProviderError::Reported(msg) => {
                warn!(operation = op.name(), flight_id = id, error = %msg, "flight not found");
                GatewayError::NotFound(msg)
            }
            other => {
                error!(operation = op.name(), flight_id = id, error = %other, "provider operation failed");
                GatewayError::Backend("Failed to fetch flight details".to_string())
            }
        })
    }

    /// Scheduled flights from `origin` to `dest`, optionally on `date`.
    ///
    /// Either code may arrive as a composite `"CODE - Full Name"` string; the
    /// leading IATA code is extracted before the provider sees it.
    pub async fn search_flights(
        &self,
        origin: Option<&str>,
        dest: Option<&str>,
        date: Option<&str>,
    ) -> Result<Vec<SearchResult>, GatewayError> {
        let origin = origin.map(iata_code).unwrap_or_default();
        let dest = dest.map(iata_code).unwrap_or_default();
        if origin.is_empty() || dest.is_empty() {
            return Err(GatewayError::Validation(
                "Missing origin or destination".to_string(),
            ));
        }

        let op = Operation::SearchFlights {
            origin: origin.to_string(),
            dest: dest.to_string(),
            date: date.map(str::to_string),
        };
        let raw = self.transport.invoke(&op).await;
        normalize::<Vec<SearchResult>>(raw).map_err(|e| match e {
            ProviderError::Reported(msg) => {
                warn!(operation = op.name(), error = %msg, "provider reported failure");
                GatewayError::Backend(msg)
            }
            other => {
                error!(operation = op.name(), error = %other, "provider operation failed");
                GatewayError::Backend("Invalid response from backend".to_string())
            }
        })
    }
}

// ------------------------------------------------------------------ //
//  Tests                                                              //
// ------------------------------------------------------------------ //
