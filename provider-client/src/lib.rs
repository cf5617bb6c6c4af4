//! Client for the live flight-data provider.
//!
//! The provider is reachable through two interchangeable transports (a local
//! subprocess invocation or a remote HTTP endpoint) and always answers with
//! a `{success, data|error}` JSON envelope. This crate owns the wire types,
//! the transport capability, the envelope normalizer, and the
//! [`FlightGateway`] façade the HTTP surface and the live poller build on.

pub mod envelope;
pub mod error;
pub mod gateway;
pub mod models;
pub mod operation;
pub mod transport;

pub use error::GatewayError;
pub use gateway::FlightGateway;
pub use models::{BoundingBox, Departure, Flight, FlightDetails, SearchResult};
pub use operation::Operation;
pub use transport::{FakeTransport, LocalProcessTransport, ProviderTransport, RemoteTransport};
