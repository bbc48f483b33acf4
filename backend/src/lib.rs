//! CleanBee backend: community waste reporting, collection and rewards.
//!
//! The crate follows a hexagonal layout. [`domain`] holds entities, services
//! and ports; [`inbound`] adapts HTTP onto the driving ports; [`outbound`]
//! implements the driven ports against PostgreSQL, Gemini and Mapbox.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;
