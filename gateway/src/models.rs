//! HTTP request/response models for the gateway's public REST API.

use serde::{Deserialize, Serialize};

// ------------------------------------------------------------------ //
//  Response envelope                                                  //
// ------------------------------------------------------------------ //

/// The uniform response wrapper used at every boundary.
///
/// Exactly one of `data` / `error` is present: the constructors are the only
/// way to build one, so the invariant holds by construction.
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> Envelope<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

// ------------------------------------------------------------------ //
//  Airport reference record                                           //
// ------------------------------------------------------------------ //

/// One entry of the static airport dataset. Loaded once, immutable after.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Airport {
    pub iata: String,
    #[serde(default)]
    pub icao: Option<String>,
    pub name: String,
    pub city: String,
    pub country: String,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lon: Option<f64>,
}

// ------------------------------------------------------------------ //
//  Inbound query parameters                                           //
// ------------------------------------------------------------------ //

#[derive(Debug, Deserialize)]
pub struct AirportsQuery {
    pub q: Option<String>,
}

/// Bounding-box coordinates are accepted as a unit: all four or none.
#[derive(Debug, Deserialize)]
pub struct LiveFlightsQuery {
    pub min_lat: Option<f64>,
    pub max_lat: Option<f64>,
    pub min_lon: Option<f64>,
    pub max_lon: Option<f64>,
    pub limit: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct DetailsQuery {
    pub airline_icao: Option<String>,
    pub aircraft: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DeparturesQuery {
    pub airport: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub origin: Option<String>,
    pub dest: Option<String>,
    pub date: Option<String>,
}

// ------------------------------------------------------------------ //
//  Tests                                                              //
// ------------------------------------------------------------------ //
