//! Live position poller — the refresh contract consumed by display clients.
//!
//! A spawned task issues the live-positions operation on a fixed interval and
//! immediately whenever the viewport bounds change, publishing snapshots over
//! a watch channel. Every request carries a monotonically increasing sequence
//! number; a response older than the last applied one is discarded, so a slow
//! early poll can never overwrite a faster later one. `loading` is true only
//! until the first outcome lands; background refreshes never flip it back,
//! and a failed refresh keeps the previous flight list on screen.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, warn};

use provider_client::{BoundingBox, Flight, FlightGateway, GatewayError};

// ------------------------------------------------------------------ //
//  Source port                                                        //
// ------------------------------------------------------------------ //

/// Where the poller gets its snapshots from.
#[async_trait]
pub trait FlightSource: Send + Sync + 'static {
    async fn live_positions(
        &self,
        bounds: Option<BoundingBox>,
        limit: Option<u32>,
    ) -> Result<Vec<Flight>, GatewayError>;
}

#[async_trait]
impl FlightSource for FlightGateway {
    async fn live_positions(
        &self,
        bounds: Option<BoundingBox>,
        limit: Option<u32>,
    ) -> Result<Vec<Flight>, GatewayError> {
        FlightGateway::live_positions(self, bounds, limit).await
    }
}

// ------------------------------------------------------------------ //
//  Config and published state                                         //
// ------------------------------------------------------------------ //

#[derive(Debug, Clone)]
pub struct PollerConfig {
    /// Time between background refreshes.
    pub interval: Duration,
    /// Snapshot cap forwarded to the source. Constrained clients set 500;
    /// `None` leaves the provider default (1500) in effect.
    pub limit: Option<u32>,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(8),
            limit: None,
        }
    }
}

/// Snapshot published to subscribers after every applied poll outcome.
#[derive(Debug, Clone)]
pub struct PollState {
    pub flights: Vec<Flight>,
    /// True only until the very first outcome is applied.
    pub loading: bool,
    /// Message of the most recent failed refresh; cleared by the next success.
    pub error: Option<String>,
    /// Sequence number of the applied outcome.
    pub last_seq: u64,
    pub refreshed_at: Option<DateTime<Utc>>,
}

impl Default for PollState {
    fn default() -> Self {
        Self {
            flights: Vec::new(),
            loading: true,
            error: None,
            last_seq: 0,
            refreshed_at: None,
        }
    }
}

// ------------------------------------------------------------------ //
//  Poller                                                             //
// ------------------------------------------------------------------ //

pub struct LivePoller {
    state_rx: watch::Receiver<PollState>,
    bounds_tx: watch::Sender<Option<BoundingBox>>,
    shutdown_tx: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl LivePoller {
    /// Start polling. The first request is issued immediately.
    pub fn spawn(source: Arc<dyn FlightSource>, config: PollerConfig) -> Self {
        let (state_tx, state_rx) = watch::channel(PollState::default());
        let (bounds_tx, bounds_rx) = watch::channel(None);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let task = tokio::spawn(run(source, config, bounds_rx, shutdown_rx, state_tx));

        Self {
            state_rx,
            bounds_tx,
            shutdown_tx,
            task,
        }
    }

    /// Subscribe to state snapshots.
    pub fn subscribe(&self) -> watch::Receiver<PollState> {
        self.state_rx.clone()
    }

    /// Current snapshot.
    pub fn state(&self) -> PollState {
        self.state_rx.borrow().clone()
    }

    /// Report a viewport change. Triggers an immediate refresh and restarts
    /// the interval.
    pub fn set_bounds(&self, bounds: Option<BoundingBox>) {
        let _ = self.bounds_tx.send(bounds);
    }

    /// Stop issuing requests. Cooperative: an in-flight request is not
    /// aborted, its late result is dropped.
    pub fn stop(&self) {
        let _ = self.shutdown_tx.send(true);
    }

    /// Stop and wait for the polling task to exit.
    pub async fn shutdown(self) {
        self.stop();
        let _ = self.task.await;
    }
}

type PollOutcome = (u64, Result<Vec<Flight>, GatewayError>);

async fn run(
    source: Arc<dyn FlightSource>,
    config: PollerConfig,
    mut bounds_rx: watch::Receiver<Option<BoundingBox>>,
    mut shutdown_rx: watch::Receiver<bool>,
    state_tx: watch::Sender<PollState>,
) {
    let mut ticker = tokio::time::interval(config.interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let (done_tx, mut done_rx) = mpsc::unbounded_channel::<PollOutcome>();
    let mut next_seq: u64 = 0;
    let mut last_applied: u64 = 0;

    loop {
        tokio::select! {
            // First tick completes immediately: the initial fetch.
            _ = ticker.tick() => {
                next_seq += 1;
                issue(&source, &bounds_rx, config.limit, next_seq, &done_tx);
            }
            Ok(()) = bounds_rx.changed() => {
                ticker.reset();
                next_seq += 1;
                issue(&source, &bounds_rx, config.limit, next_seq, &done_tx);
            }
            Some((seq, outcome)) = done_rx.recv() => {
                if seq < last_applied {
                    debug!(seq, last_applied, "discarding stale poll response");
                    continue;
                }
                last_applied = seq;
                apply(&state_tx, seq, outcome);
            }
            _ = shutdown_rx.changed() => break,
        }
    }
}

fn issue(
    source: &Arc<dyn FlightSource>,
    bounds_rx: &watch::Receiver<Option<BoundingBox>>,
    limit: Option<u32>,
    seq: u64,
    done_tx: &mpsc::UnboundedSender<PollOutcome>,
) {
    let source = Arc::clone(source);
    let bounds = *bounds_rx.borrow();
    let done_tx = done_tx.clone();
    tokio::spawn(async move {
        let outcome = source.live_positions(bounds, limit).await;
        // After shutdown the receiver is gone and the late result is dropped.
        let _ = done_tx.send((seq, outcome));
    });
}

fn apply(state_tx: &watch::Sender<PollState>, seq: u64, outcome: Result<Vec<Flight>, GatewayError>) {
    state_tx.send_modify(|state| {
        match outcome {
            Ok(flights) => {
                state.flights = flights;
                state.error = None;
            }
            Err(e) => {
                warn!(error = %e, "live position refresh failed");
                state.error = Some(e.to_string());
            }
        }
        state.loading = false;
        state.last_seq = seq;
        state.refreshed_at = Some(Utc::now());
    });
}

// ------------------------------------------------------------------ //
//  Tests                                                              //
// ------------------------------------------------------------------ //

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Scripted source: records calls, replays queued (delay, outcome) pairs.
    /// With an empty queue it answers an empty snapshot immediately.
    struct ScriptedSource {
        calls: Mutex<Vec<(Option<BoundingBox>, Option<u32>)>>,
        responses: Mutex<VecDeque<(Duration, Result<Vec<Flight>, GatewayError>)>>,
    }

    impl ScriptedSource {
        fn new() -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                responses: Mutex::new(VecDeque::new()),
            }
        }

        fn push(&self, delay: Duration, outcome: Result<Vec<Flight>, GatewayError>) {
            self.responses.lock().unwrap().push_back((delay, outcome));
        }

        fn calls(&self) -> Vec<(Option<BoundingBox>, Option<u32>)> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl FlightSource for ScriptedSource {
        async fn live_positions(
            &self,
            bounds: Option<BoundingBox>,
            limit: Option<u32>,
        ) -> Result<Vec<Flight>, GatewayError> {
            self.calls.lock().unwrap().push((bounds, limit));
            let (delay, outcome) = self
                .responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or((Duration::ZERO, Ok(Vec::new())));
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            outcome
        }
    }

    fn flight(id: &str) -> Flight {
        Flight {
            id: id.to_string(),
            callsign: "TST123".to_string(),
            latitude: -23.43,
            longitude: -46.47,
            heading: 90,
            altitude: 30000,
            speed: 400,
            vertical_speed: None,
            on_ground: None,
            airline: "TST".to_string(),
            airline_icao: None,
            origin: "GRU".to_string(),
            destination: "JFK".to_string(),
            aircraft: "A320".to_string(),
        }
    }

    fn sample_box() -> BoundingBox {
        BoundingBox::new(-24.0, -23.0, -47.0, -46.0).unwrap()
    }

    async fn wait_until(
        rx: &mut watch::Receiver<PollState>,
        pred: impl Fn(&PollState) -> bool,
    ) -> PollState {
        loop {
            {
                let state = rx.borrow();
                if pred(&state) {
                    return state.clone();
                }
            }
            rx.changed().await.unwrap();
        }
    }

    #[tokio::test(start_paused = true)]
    async fn first_fetch_populates_state_and_clears_loading() {
        let source = Arc::new(ScriptedSource::new());
        source.push(Duration::ZERO, Ok(vec![flight("a")]));

        let poller = LivePoller::spawn(source.clone(), PollerConfig::default());
        let mut rx = poller.subscribe();

        assert!(rx.borrow().loading, "no data yet means loading");

        let state = wait_until(&mut rx, |s| !s.loading).await;
        assert_eq!(state.flights.len(), 1);
        assert_eq!(state.flights[0].id, "a");
        assert_eq!(state.last_seq, 1);
        assert!(state.error.is_none());
        assert!(state.refreshed_at.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn interval_refresh_updates_without_reentering_loading() {
        let source = Arc::new(ScriptedSource::new());
        source.push(Duration::ZERO, Ok(vec![flight("a")]));
        source.push(Duration::ZERO, Ok(vec![flight("b")]));

        let poller = LivePoller::spawn(source.clone(), PollerConfig::default());
        let mut rx = poller.subscribe();

        wait_until(&mut rx, |s| s.last_seq == 1).await;
        let state = wait_until(&mut rx, |s| s.last_seq == 2).await;

        assert_eq!(state.flights[0].id, "b");
        assert!(!state.loading, "background refresh must not flip loading");
    }

    #[tokio::test(start_paused = true)]
    async fn bounds_change_triggers_immediate_refetch() {
        let source = Arc::new(ScriptedSource::new());
        let poller = LivePoller::spawn(source.clone(), PollerConfig::default());
        let mut rx = poller.subscribe();

        wait_until(&mut rx, |s| s.last_seq == 1).await;
        poller.set_bounds(Some(sample_box()));
        wait_until(&mut rx, |s| s.last_seq == 2).await;

        let calls = source.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].0, None);
        assert_eq!(calls[1].0, Some(sample_box()));
    }

    #[tokio::test(start_paused = true)]
    async fn stale_response_is_discarded() {
        let source = Arc::new(ScriptedSource::new());
        // First request is slow; the bounds-triggered second one overtakes it.
        source.push(Duration::from_secs(5), Ok(vec![flight("stale")]));
        source.push(Duration::ZERO, Ok(vec![flight("fresh")]));

        let poller = LivePoller::spawn(source.clone(), PollerConfig::default());
        let mut rx = poller.subscribe();

        poller.set_bounds(Some(sample_box()));
        wait_until(&mut rx, |s| s.last_seq == 2).await;

        // Let the slow first response arrive; it must not be applied.
        tokio::time::sleep(Duration::from_secs(6)).await;

        let state = rx.borrow().clone();
        assert_eq!(state.last_seq, 2);
        assert_eq!(state.flights[0].id, "fresh");
    }

    #[tokio::test(start_paused = true)]
    async fn failed_refresh_keeps_previous_flights_until_recovery() {
        let source = Arc::new(ScriptedSource::new());
        source.push(Duration::ZERO, Ok(vec![flight("a")]));
        source.push(
            Duration::ZERO,
            Err(GatewayError::Backend("Failed to fetch flights".to_string())),
        );
        source.push(Duration::ZERO, Ok(vec![flight("b")]));

        let poller = LivePoller::spawn(source.clone(), PollerConfig::default());
        let mut rx = poller.subscribe();

        let failed = wait_until(&mut rx, |s| s.last_seq == 2).await;
        assert_eq!(failed.flights[0].id, "a", "previous data stays on failure");
        assert_eq!(failed.error.as_deref(), Some("Failed to fetch flights"));
        assert!(!failed.loading);

        let recovered = wait_until(&mut rx, |s| s.last_seq == 3).await;
        assert_eq!(recovered.flights[0].id, "b");
        assert!(recovered.error.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn stop_halts_issuance() {
        let source = Arc::new(ScriptedSource::new());
        let poller = LivePoller::spawn(source.clone(), PollerConfig::default());
        let mut rx = poller.subscribe();

        wait_until(&mut rx, |s| s.last_seq == 1).await;
        poller.shutdown().await;

        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(source.calls().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn constrained_limit_is_forwarded() {
        let source = Arc::new(ScriptedSource::new());
        let config = PollerConfig {
            limit: Some(500),
            ..PollerConfig::default()
        };
        let poller = LivePoller::spawn(source.clone(), config);
        let mut rx = poller.subscribe();

        wait_until(&mut rx, |s| s.last_seq == 1).await;
        assert_eq!(source.calls()[0].1, Some(500));
    }
}
