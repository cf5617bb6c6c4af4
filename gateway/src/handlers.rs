//! Axum HTTP handlers for the gateway.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::{
    models::{
        AirportsQuery, DeparturesQuery, DetailsQuery, Envelope, LiveFlightsQuery, SearchQuery,
    },
    AppState,
};
use provider_client::{BoundingBox, GatewayError};

/// Map a gateway failure onto its HTTP status and failure envelope.
fn failure(err: GatewayError) -> Response {
    let status = match &err {
        GatewayError::Validation(_) => StatusCode::BAD_REQUEST,
        GatewayError::NotFound(_) => StatusCode::NOT_FOUND,
        GatewayError::Backend(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(Envelope::<()>::err(err.to_string()))).into_response()
}

// ------------------------------------------------------------------ //
//  GET /airports                                                      //
// ------------------------------------------------------------------ //

/// Substring search over the airport reference dataset. Fail-soft: a missing
/// or corrupt dataset yields an empty result list, never an error.
pub async fn search_airports(
    State(state): State<Arc<AppState>>,
    Query(params): Query<AirportsQuery>,
) -> impl IntoResponse {
    let results = state.airports.search(params.q.as_deref().unwrap_or("")).await;
    (StatusCode::OK, Json(Envelope::ok(results)))
}

// ------------------------------------------------------------------ //
//  GET /flights                                                       //
// ------------------------------------------------------------------ //

/// Live positions, optionally scoped to a viewport bounding box.
pub async fn live_flights(
    State(state): State<Arc<AppState>>,
    Query(params): Query<LiveFlightsQuery>,
) -> impl IntoResponse {
    let bounds = match BoundingBox::from_parts(
        params.min_lat,
        params.max_lat,
        params.min_lon,
        params.max_lon,
    ) {
        Ok(bounds) => bounds,
        Err(e) => return failure(e),
    };

    match state.gateway.live_positions(bounds, params.limit).await {
        Ok(flights) => (StatusCode::OK, Json(Envelope::ok(flights))).into_response(),
        Err(e) => failure(e),
    }
}

// ------------------------------------------------------------------ //
//  GET /flights/:id                                                   //
// ------------------------------------------------------------------ //

pub async fn flight_details(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Query(params): Query<DetailsQuery>,
) -> impl IntoResponse {
    match state
        .gateway
        .flight_details(&id, params.airline_icao.as_deref(), params.aircraft.as_deref())
        .await
    {
        Ok(details) => (StatusCode::OK, Json(Envelope::ok(details))).into_response(),
        Err(e) => failure(e),
    }
}

// ------------------------------------------------------------------ //
//  GET /live-departures                                               //
// ------------------------------------------------------------------ //

pub async fn live_departures(
    State(state): State<Arc<AppState>>,
    Query(params): Query<DeparturesQuery>,
) -> impl IntoResponse {
    match state.gateway.live_departures(params.airport.as_deref()).await {
        Ok(departures) => (StatusCode::OK, Json(Envelope::ok(departures))).into_response(),
        Err(e) => failure(e),
    }
}

// ------------------------------------------------------------------ //
//  GET /search-flights                                                //
// ------------------------------------------------------------------ //

pub async fn search_flights(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchQuery>,
) -> impl IntoResponse {
    match state
        .gateway
        .search_flights(
            params.origin.as_deref(),
            params.dest.as_deref(),
            params.date.as_deref(),
        )
        .await
    {
        Ok(results) => (StatusCode::OK, Json(Envelope::ok(results))).into_response(),
        Err(e) => failure(e),
    }
}

// ------------------------------------------------------------------ //
//  Health                                                             //
// ------------------------------------------------------------------ //

pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, Json(serde_json::json!({"status": "ok"})))
}

// ------------------------------------------------------------------ //
//  Tests                                                              //
// ------------------------------------------------------------------ //
