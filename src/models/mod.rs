//! Core data models for normalized comic metadata and request parameters.

mod credit;
mod metadata;
mod request;

pub use credit::{expand_credits, parse_roles, ComicTagType, Credit, CreditRole};
pub use metadata::{parse_source_date, MetadataBuilder, NormalizedMetadata};
pub use request::{
    ApiSettings, IssueDetailsRequest, IssueLookupRequest, VolumeIssuesRequest, DEFAULT_BASE_URL,
    DEFAULT_DELAY_SECONDS,
};
