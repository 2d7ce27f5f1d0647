//! Spreadsheet-driven ETL pipeline.
//!
//! One authenticated GET kicks off the whole flow: invoke the remote
//! transform behind the API gateway, download the derived TSV artifacts
//! from object storage, convert each one to an INSERT batch via local
//! sub-requests, and apply everything inside a single transaction.
//! Progress is streamed back to the caller over SSE at every step.

pub mod dataset;
pub mod error;
pub mod fetch;
pub mod ingest;
pub mod progress;
pub mod runner;
pub mod transform;
pub mod trigger;

pub use dataset::Dataset;
pub use error::EtlError;
