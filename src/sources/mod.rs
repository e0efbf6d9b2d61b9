//! ComicVine metadata source.
//!
//! The flows in this module talk to ComicVine only through the
//! [`ComicVineApi`] trait, one method per endpoint shape:
//!
//! - [`walk_volume_issues`] pages through `volume/4050-{id}/` and maps every
//!   listed issue into a [`NormalizedMetadata`] record, pausing between pages.
//! - [`lookup_issue`] lists the issues of a volume that carry a given issue
//!   number through the `issues/` list endpoint.
//! - [`fetch_issue_details`] chains issue → volume → publisher detail fetches
//!   and flattens them into one record with resolved credit tags.
//!
//! [`HttpComicVineApi`] is the reqwest-backed implementation and
//! [`ComicVineSource`] bundles it with the default [`SignalThrottle`].
//! [`mock::MockComicVineApi`] replays canned responses for tests.
//!
//! # Example
//!
//! ```rust,no_run
//! use comicvine_metadata::models::{ApiSettings, VolumeIssuesRequest};
//! use comicvine_metadata::sources::ComicVineSource;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let source = ComicVineSource::new()?;
//! let request = VolumeIssuesRequest::new(ApiSettings::new("my-api-key"), "66143");
//! for issue in source.get_all_issues(&request).await? {
//!     println!("{}", issue.label());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! [`SignalThrottle`]: crate::utils::SignalThrottle
//! [`NormalizedMetadata`]: crate::models::NormalizedMetadata

mod comicvine;
mod detail_chain;
mod issue_lookup;
mod page_walker;
mod response;

pub mod mock;

pub use comicvine::{ComicVineSource, HttpComicVineApi, VOLUME_LISTING_FIELDS};
pub use detail_chain::fetch_issue_details;
pub use issue_lookup::lookup_issue;
pub use page_walker::walk_volume_issues;
pub use response::{
    EntityRef, IssueDetail, IssueSummary, NamedRef, PersonCredit, PublisherDetail, VolumeDetail,
    VolumeIssuesPage, STATUS_OK,
};

use async_trait::async_trait;

use crate::models::ApiSettings;

/// One async call per ComicVine endpoint used by the flows
///
/// Implementations perform exactly one request per call and never retry.
#[async_trait]
pub trait ComicVineApi: Send + Sync {
    /// Fetch one page of the issues listed under a volume
    async fn volume_issues_page(
        &self,
        settings: &ApiSettings,
        volume_id: &str,
        offset: u32,
    ) -> Result<VolumeIssuesPage, MetadataError>;

    /// List the issues of a volume, optionally narrowed to one issue number
    ///
    /// A blank `issue_number` lists every issue of the volume.
    async fn issues_for_volume(
        &self,
        settings: &ApiSettings,
        volume_id: &str,
        issue_number: &str,
    ) -> Result<Vec<IssueSummary>, MetadataError>;

    /// Fetch full details for one issue
    async fn issue_detail(
        &self,
        settings: &ApiSettings,
        issue_id: &str,
    ) -> Result<IssueDetail, MetadataError>;

    /// Fetch a volume through the detail URL found in an issue
    async fn volume_detail(
        &self,
        settings: &ApiSettings,
        detail_url: &str,
    ) -> Result<VolumeDetail, MetadataError>;

    /// Fetch a publisher through the detail URL found in a volume
    async fn publisher_detail(
        &self,
        settings: &ApiSettings,
        detail_url: &str,
    ) -> Result<PublisherDetail, MetadataError>;
}

/// Errors that can occur while fetching metadata
#[derive(Debug, thiserror::Error)]
pub enum MetadataError {
    /// A required input (API key, id, base URL) is missing or invalid
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Network failure, non-2xx status, API error status, or undecodable body
    #[error("Transport error ({endpoint}): {message}")]
    Transport { endpoint: String, message: String },

    /// The rate-limit pause was interrupted
    #[error("Interrupted: {0}")]
    Interrupted(String),
}

impl MetadataError {
    pub fn transport(endpoint: impl Into<String>, message: impl Into<String>) -> Self {
        MetadataError::Transport {
            endpoint: endpoint.into(),
            message: message.into(),
        }
    }
}
