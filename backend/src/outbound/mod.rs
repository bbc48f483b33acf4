//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: PostgreSQL-backed repositories using Diesel ORM
//! - **gemini**: vision model behind the `WasteClassifier` port
//! - **mapbox**: place search behind the `Geocoder` port
//!
//! Adapters are thin translators that convert between domain types and
//! infrastructure-specific representations. They contain no business logic.

pub mod gemini;
mod http_status;
pub mod mapbox;
pub mod persistence;
