//! Wire types shared between the provider, the gateway, and its clients.
//!
//! Field names mirror the provider's JSON exactly (serde renames where the
//! provider uses camelCase), so payloads pass through the gateway unchanged.

use serde::{Deserialize, Serialize};

use crate::error::GatewayError;

// ------------------------------------------------------------------ //
//  Live position snapshot                                             //
// ------------------------------------------------------------------ //

/// A single aircraft position as reported by the provider.
///
/// Transient: re-fetched on every poll, never diffed or merged across polls.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Flight {
    /// Provider-assigned id, unique within one snapshot.
    pub id: String,
    pub callsign: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Track in degrees.
    pub heading: i32,
    /// Barometric altitude in feet.
    pub altitude: i32,
    /// Ground speed in knots.
    #[serde(rename = "ground_speed")]
    pub speed: i32,
    /// Feet per minute; not reported by every provider endpoint.
    #[serde(default)]
    pub vertical_speed: Option<i32>,
    /// 0 = airborne, 1 = on ground, as sent by the provider.
    #[serde(default)]
    pub on_ground: Option<u8>,
    pub airline: String,
    #[serde(default)]
    pub airline_icao: Option<String>,
    /// Origin airport IATA code.
    pub origin: String,
    /// Destination airport IATA code.
    pub destination: String,
    /// Aircraft type code (e.g. `B738`).
    pub aircraft: String,
}

// ------------------------------------------------------------------ //
//  Flight details                                                     //
// ------------------------------------------------------------------ //

/// Lazily fetched detail record for one flight.
///
/// Every field is optional: the provider assembles what it can find and the
/// display layer renders placeholders for the rest.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct FlightDetails {
    #[serde(default)]
    pub airline: Option<String>,
    #[serde(default)]
    pub airline_logo: Option<String>,
    #[serde(default)]
    pub aircraft_model: Option<String>,
    #[serde(default)]
    pub origin: Option<String>,
    #[serde(default)]
    pub destination: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
}

// ------------------------------------------------------------------ //
//  Departures                                                         //
// ------------------------------------------------------------------ //

/// A scheduled or in-progress departure from one airport.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Departure {
    pub id: String,
    pub callsign: String,
    pub flight_number: String,
    pub origin: String,
    pub destination: String,
    pub airline: String,
    #[serde(default)]
    pub airline_icao: Option<String>,
    #[serde(default)]
    pub airline_logo: Option<String>,
    pub aircraft: String,
    pub status: String,
    /// Human-readable flight duration, e.g. `"2h 15m"`.
    pub duration: String,
    #[serde(rename = "departureTime")]
    pub departure_time: String,
    #[serde(rename = "arrivalTime")]
    pub arrival_time: String,
}

// ------------------------------------------------------------------ //
//  Flight search                                                      //
// ------------------------------------------------------------------ //

/// One scheduled flight matching an origin/destination search.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchResult {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub flight_number: Option<String>,
    pub airline: SearchAirline,
    pub aircraft: SearchAircraft,
    pub time: SearchTimes,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SearchAirline {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub logo: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SearchAircraft {
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
}

/// Departure timestamps in unix seconds; `real` is set once the flight left.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SearchTimes {
    #[serde(default)]
    pub scheduled: Option<i64>,
    #[serde(default)]
    pub estimated: Option<i64>,
    #[serde(default)]
    pub real: Option<i64>,
}

// ------------------------------------------------------------------ //
//  Bounding box                                                       //
// ------------------------------------------------------------------ //

/// Geographic rectangle scoping a live-position query to a viewport.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl BoundingBox {
    /// Build a box, rejecting inverted ranges.
    pub fn new(min_lat: f64, max_lat: f64, min_lon: f64, max_lon: f64) -> Result<Self, GatewayError> {
        if min_lat > max_lat || min_lon > max_lon {
            return Err(GatewayError::Validation(
                "Bounding box min must not exceed max".to_string(),
            ));
        }
        Ok(Self { min_lat, max_lat, min_lon, max_lon })
    }

    /// Assemble a box from four individually optional query parameters.
    ///
    /// The four are accepted as a unit: all absent means "no box", all present
    /// means a validated box, anything in between is a validation error.
    pub fn from_parts(
        min_lat: Option<f64>,
        max_lat: Option<f64>,
        min_lon: Option<f64>,
        max_lon: Option<f64>,
    ) -> Result<Option<Self>, GatewayError> {
        match (min_lat, max_lat, min_lon, max_lon) {
            (None, None, None, None) => Ok(None),
            (Some(a), Some(b), Some(c), Some(d)) => Self::new(a, b, c, d).map(Some),
            _ => Err(GatewayError::Validation(
                "Bounding box requires all of min_lat, max_lat, min_lon, max_lon".to_string(),
            )),
        }
    }
}

// ------------------------------------------------------------------ //
//  Airport code extraction                                            //
// ------------------------------------------------------------------ //

/// Reduce a composite `"JFK - John F. Kennedy Intl"` string to its leading
/// IATA code. Bare codes pass through unchanged.
pub fn iata_code(input: &str) -> &str {
    match input.split_once(" - ") {
        Some((code, _)) => code.trim(),
        None => input.trim(),
    }
}

// ------------------------------------------------------------------ //
//  Tests                                                              //
// ------------------------------------------------------------------ //
