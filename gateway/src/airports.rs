//! Airport reference cache and substring search.
//!
//! The dataset is a static JSON array loaded at most once per process, on the
//! first query of length ≥ 2. Load failure degrades search to an empty result
//! set instead of failing requests; the rest of the gateway keeps working.

use std::path::{Path, PathBuf};

use anyhow::Context;
use tokio::sync::OnceCell;
use tracing::{info, warn};

use crate::models::Airport;

/// Maximum number of results returned per query.
const MAX_RESULTS: usize = 10;

pub struct AirportIndex {
    path: PathBuf,
    cell: OnceCell<Vec<Airport>>,
}

impl AirportIndex {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cell: OnceCell::new(),
        }
    }

    /// Case-insensitive substring search over name, iata, icao, city and
    /// country. Queries shorter than 2 characters return empty without
    /// touching the dataset.
    pub async fn search(&self, query: &str) -> Vec<Airport> {
        let query = query.trim().to_lowercase();
        if query.chars().count() < 2 {
            return Vec::new();
        }

        let airports = self.cell.get_or_init(|| load(&self.path)).await;

        airports
            .iter()
            .filter(|a| matches(a, &query))
            .take(MAX_RESULTS)
            .cloned()
            .collect()
    }
}

async fn load(path: &Path) -> Vec<Airport> {
    match read_dataset(path).await {
        Ok(airports) => {
            info!(count = airports.len(), path = %path.display(), "airport dataset loaded");
            airports
        }
        Err(e) => {
            warn!(error = %e, path = %path.display(), "failed to load airport dataset, search degraded to empty");
            Vec::new()
        }
    }
}

async fn read_dataset(path: &Path) -> anyhow::Result<Vec<Airport>> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_slice(&bytes).context("parsing airport dataset")
}

fn matches(airport: &Airport, query: &str) -> bool {
    airport.name.to_lowercase().contains(query)
        || airport.iata.to_lowercase().contains(query)
        || airport
            .icao
            .as_deref()
            .map(|s| s.to_lowercase().contains(query))
            .unwrap_or(false)
        || airport.city.to_lowercase().contains(query)
        || airport.country.to_lowercase().contains(query)
}

// ------------------------------------------------------------------ //
//  Tests                                                              //
// ------------------------------------------------------------------ //
