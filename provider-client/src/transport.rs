//! ProviderTransport trait and implementations.
//!
//! The provider is reachable two ways: spawning its local script with
//! positional arguments, or issuing an HTTP GET against a deployed endpoint.
//! Which one runs is a startup decision; everything above the trait is
//! transport-agnostic.

use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tokio::process::Command;
use tracing::warn;

use crate::operation::Operation;

// ------------------------------------------------------------------ //
//  Trait                                                              //
// ------------------------------------------------------------------ //

/// Capability to invoke one provider operation and collect its raw payload.
#[async_trait]
pub trait ProviderTransport: Send + Sync {
    async fn invoke(&self, op: &Operation) -> Result<Vec<u8>, TransportError>;
}

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("failed to launch provider process: {0}")]
    Spawn(#[from] std::io::Error),
    #[error("provider process exited with {status}: {stderr}")]
    ProcessFailed {
        status: std::process::ExitStatus,
        stderr: String,
    },
    #[error("provider request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("provider returned HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },
    #[error("provider call timed out after {0:?}")]
    Timeout(Duration),
}

// ------------------------------------------------------------------ //
//  LocalProcessTransport                                              //
// ------------------------------------------------------------------ //

/// Invokes the provider script out of process and captures its stdout.
///
/// Diagnostic output on stderr is logged but is not a failure by itself;
/// only a non-zero exit status is.
pub struct LocalProcessTransport {
    command: String,
    script_dir: PathBuf,
    timeout: Duration,
}

impl LocalProcessTransport {
    pub fn new(command: impl Into<String>, script_dir: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            command: command.into(),
            script_dir: script_dir.into(),
            timeout,
        }
    }
}

#[async_trait]
impl ProviderTransport for LocalProcessTransport {
    async fn invoke(&self, op: &Operation) -> Result<Vec<u8>, TransportError> {
        let script = self.script_dir.join(op.script());

        let output = tokio::time::timeout(
            self.timeout,
            Command::new(&self.command)
                .arg(&script)
                .args(op.positional_args())
                .kill_on_drop(true)
                .output(),
        )
        .await
        .map_err(|_| TransportError::Timeout(self.timeout))??;

        let stderr = String::from_utf8_lossy(&output.stderr);
        if !stderr.trim().is_empty() {
            warn!(operation = op.name(), stderr = %stderr.trim(), "provider process wrote to stderr");
        }

        if !output.status.success() {
            return Err(TransportError::ProcessFailed {
                status: output.status,
                stderr: stderr.trim().to_string(),
            });
        }

        Ok(output.stdout)
    }
}

// ------------------------------------------------------------------ //
//  RemoteTransport                                                    //
// ------------------------------------------------------------------ //

/// Reaches a deployed provider endpoint over HTTP.
pub struct RemoteTransport {
    http: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl RemoteTransport {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            timeout,
        }
    }
}

#[async_trait]
impl ProviderTransport for RemoteTransport {
    async fn invoke(&self, op: &Operation) -> Result<Vec<u8>, TransportError> {
        let url = format!("{}/{}", self.base_url.trim_end_matches('/'), op.path());

        let exchange = async {
            let resp = self.http.get(&url).query(&op.query_params()).send().await?;
            let status = resp.status();
            if !status.is_success() {
                let body = resp.text().await.unwrap_or_default();
                return Err(TransportError::HttpStatus {
                    status: status.as_u16(),
                    body,
                });
            }
            Ok(resp.bytes().await?.to_vec())
        };

        tokio::time::timeout(self.timeout, exchange)
            .await
            .map_err(|_| TransportError::Timeout(self.timeout))?
    }
}

// ------------------------------------------------------------------ //
//  FakeTransport (for tests)                                          //
// ------------------------------------------------------------------ //

/// In-memory transport that records invocations and replays queued responses.
///
/// With an empty queue it answers with an empty success envelope, so tests
/// that only care about the recorded operations need no setup.
#[derive(Default, Clone)]
pub struct FakeTransport {
    invocations: Arc<Mutex<Vec<Operation>>>,
    responses: Arc<Mutex<VecDeque<Result<Vec<u8>, TransportError>>>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a raw payload to be returned by the next invocation.
    pub fn push_raw(&self, bytes: impl Into<Vec<u8>>) {
        self.responses.lock().unwrap().push_back(Ok(bytes.into()));
    }

    /// Queue a JSON payload to be returned by the next invocation.
    pub fn push_json(&self, value: &serde_json::Value) {
        self.push_raw(value.to_string().into_bytes());
    }

    /// Queue a transport failure.
    pub fn push_err(&self, err: TransportError) {
        self.responses.lock().unwrap().push_back(Err(err));
    }

    /// Snapshot of the operations invoked so far.
    pub fn invocations(&self) -> Vec<Operation> {
        self.invocations.lock().unwrap().clone()
    }
}

#[async_trait]
impl ProviderTransport for FakeTransport {
    async fn invoke(&self, op: &Operation) -> Result<Vec<u8>, TransportError> {
        self.invocations.lock().unwrap().push(op.clone());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(br#"{"success":true,"data":[]}"#.to_vec()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fake_records_invocations_in_order() {
        let fake = FakeTransport::new();
        let first = Operation::LiveDepartures { airport: "GRU".into() };
        let second = Operation::LiveDepartures { airport: "GIG".into() };

        fake.invoke(&first).await.unwrap();
        fake.invoke(&second).await.unwrap();

        assert_eq!(fake.invocations(), vec![first, second]);
    }

    #[tokio::test]
    async fn fake_replays_queued_responses_then_defaults() {
        let fake = FakeTransport::new();
        fake.push_raw(&b"first"[..]);

        let op = Operation::LiveDepartures { airport: "GRU".into() };
        assert_eq!(fake.invoke(&op).await.unwrap(), b"first");
        // Queue drained: default empty success envelope.
        let raw = fake.invoke(&op).await.unwrap();
        let v: serde_json::Value = serde_json::from_slice(&raw).unwrap();
        assert_eq!(v["success"], true);
    }

    #[tokio::test]
    async fn fake_replays_failures() {
        let fake = FakeTransport::new();
        fake.push_err(TransportError::Spawn(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "no provider",
        )));

        let op = Operation::LiveDepartures { airport: "GRU".into() };
        assert!(matches!(
            fake.invoke(&op).await,
            Err(TransportError::Spawn(_))
        ));
    }
}
