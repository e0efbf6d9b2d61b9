//! # ComicVine Metadata
//!
//! Retrieves comic issue metadata from the ComicVine catalog API and
//! normalizes it into flat records.
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`models`]: Core data structures (NormalizedMetadata, Credit, request parameters)
//! - [`sources`]: The ComicVine API seam, the paged volume walk and the issue detail chain
//! - [`utils`]: HTTP client, rate-limit pause, key redaction and table rendering
//! - [`config`]: Configuration management

pub mod config;
pub mod models;
pub mod sources;
pub mod utils;

// Re-export commonly used types
pub use models::NormalizedMetadata;
pub use sources::{ComicVineApi, ComicVineSource, MetadataError};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
