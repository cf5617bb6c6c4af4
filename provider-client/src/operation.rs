//! The catalogue of provider operations and their two serializations.
//!
//! Each operation reaches the provider either as a local script invocation
//! with positional arguments or as a remote GET with query parameters. Both
//! carry the same parameter set; absent optionals serialize as empty strings
//! locally so the argv arity stays fixed per operation.

use crate::models::BoundingBox;

/// Default live-position cap forwarded when the caller does not set one.
pub const DEFAULT_POSITION_LIMIT: u32 = 1500;

/// Default airport for the departures board.
pub const DEFAULT_DEPARTURE_AIRPORT: &str = "GRU";

/// One logical provider call with its named parameters.
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    LivePositions {
        bounds: Option<BoundingBox>,
        limit: u32,
    },
    LiveDepartures {
        airport: String,
    },
    FlightDetails {
        id: String,
        airline_icao: String,
        aircraft: String,
    },
    SearchFlights {
        origin: String,
        dest: String,
        date: Option<String>,
    },
}

impl Operation {
    /// Script file name for the local transport.
    pub fn script(&self) -> &'static str {
        match self {
            Operation::LivePositions { .. } => "flight_service.py",
            Operation::LiveDepartures { .. } => "live_departures.py",
            Operation::FlightDetails { .. } => "flight_details.py",
            Operation::SearchFlights { .. } => "search_flights.py",
        }
    }

    /// URL path for the remote transport, relative to the base URL.
    pub fn path(&self) -> &'static str {
        match self {
            Operation::LivePositions { .. } => "api/flight_service",
            Operation::LiveDepartures { .. } => "api/live_departures",
            Operation::FlightDetails { .. } => "api/flight_details",
            Operation::SearchFlights { .. } => "api/search_flights",
        }
    }

    /// Operation name for log fields.
    pub fn name(&self) -> &'static str {
        match self {
            Operation::LivePositions { .. } => "live_positions",
            Operation::LiveDepartures { .. } => "live_departures",
            Operation::FlightDetails { .. } => "flight_details",
            Operation::SearchFlights { .. } => "search_flights",
        }
    }

    /// Positional argv for the local script.
    pub fn positional_args(&self) -> Vec<String> {
        match self {
            Operation::LivePositions { bounds, limit } => {
                let mut args = match bounds {
                    Some(b) => vec![
                        b.min_lat.to_string(),
                        b.max_lat.to_string(),
                        b.min_lon.to_string(),
                        b.max_lon.to_string(),
                    ],
                    None => vec![String::new(); 4],
                };
                args.push(limit.to_string());
                args
            }
            Operation::LiveDepartures { airport } => vec![airport.clone()],
            Operation::FlightDetails { id, airline_icao, aircraft } => {
                vec![id.clone(), airline_icao.clone(), aircraft.clone()]
            }
            Operation::SearchFlights { origin, dest, date } => {
                let mut args = vec![origin.clone(), dest.clone()];
                if let Some(d) = date {
                    args.push(d.clone());
                }
                args
            }
        }
    }

    /// Query-string pairs for the remote endpoint.
    pub fn query_params(&self) -> Vec<(&'static str, String)> {
        match self {
            Operation::LivePositions { bounds, limit } => {
                let mut params = vec![("limit", limit.to_string())];
                if let Some(b) = bounds {
                    params.push(("min_lat", b.min_lat.to_string()));
                    params.push(("max_lat", b.max_lat.to_string()));
                    params.push(("min_lon", b.min_lon.to_string()));
                    params.push(("max_lon", b.max_lon.to_string()));
                }
                params
            }
            Operation::LiveDepartures { airport } => vec![("airport", airport.clone())],
            Operation::FlightDetails { id, airline_icao, aircraft } => vec![
                ("id", id.clone()),
                ("airline_icao", airline_icao.clone()),
                ("aircraft", aircraft.clone()),
            ],
            Operation::SearchFlights { origin, dest, date } => {
                let mut params = vec![("origin", origin.clone()), ("dest", dest.clone())];
                if let Some(d) = date {
                    params.push(("date", d.clone()));
                }
                params
            }
        }
    }
}
