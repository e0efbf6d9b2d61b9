//! reqwest-backed ComicVine API and the bundled source facade.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use url::Url;

use crate::models::{
    ApiSettings, IssueDetailsRequest, IssueLookupRequest, NormalizedMetadata, VolumeIssuesRequest,
};
use crate::sources::response::{Envelope, PageInfo, VolumeListing, STATUS_OK};
use crate::sources::{
    fetch_issue_details, lookup_issue, walk_volume_issues, ComicVineApi, IssueDetail,
    IssueSummary, MetadataError, PublisherDetail, VolumeDetail, VolumeIssuesPage,
};
use crate::utils::{redact_url, HttpClient, SignalThrottle, Throttle};

/// Field selectors requested from the volume listing endpoint
pub const VOLUME_LISTING_FIELDS: &[&str] = &["issues", "publisher", "name", "start_year"];

/// ComicVine resource prefix for volumes
const VOLUME_PREFIX: &str = "4050";

/// ComicVine resource prefix for issues
const ISSUE_PREFIX: &str = "4000";

/// ComicVine API over HTTP
///
/// Holds no credentials: key and base URL arrive with every call in
/// [`ApiSettings`].
#[derive(Debug, Clone)]
pub struct HttpComicVineApi {
    client: Arc<HttpClient>,
}

impl HttpComicVineApi {
    /// Create with a default HTTP client
    pub fn new() -> Result<Self, MetadataError> {
        Ok(Self {
            client: Arc::new(HttpClient::new()?),
        })
    }

    /// Create with a custom HTTP client
    pub fn with_client(client: Arc<HttpClient>) -> Self {
        Self { client }
    }

    /// Build `{base_url}/{path}` for a fixed endpoint
    fn endpoint_url(settings: &ApiSettings, path: &str) -> Result<Url, MetadataError> {
        let raw = format!("{}/{}", settings.base_url.trim_end_matches('/'), path);
        Url::parse(&raw).map_err(|e| {
            MetadataError::Configuration(format!(
                "Invalid base URL '{}': {}",
                settings.base_url, e
            ))
        })
    }

    /// Parse a detail URL taken from an earlier response
    fn detail_url(endpoint: &str, detail_url: &str) -> Result<Url, MetadataError> {
        Url::parse(detail_url)
            .map_err(|e| MetadataError::transport(endpoint, format!("Invalid detail URL: {}", e)))
    }

    /// Append the query parameters every ComicVine call needs
    fn add_query(url: &mut Url, settings: &ApiSettings, fields: &[&str], offset: Option<u32>) {
        let mut query = url.query_pairs_mut();
        query.append_pair("api_key", &settings.api_key);
        query.append_pair("format", "json");
        if !fields.is_empty() {
            query.append_pair("field_list", &fields.join(","));
        }
        if let Some(offset) = offset {
            query.append_pair("offset", &offset.to_string());
        }
    }

    /// Issue a GET and decode the ComicVine envelope around `T`
    async fn get<T: DeserializeOwned>(
        &self,
        url: Url,
        endpoint: &str,
    ) -> Result<(PageInfo, T), MetadataError> {
        tracing::debug!("Requesting {}: {}", endpoint, redact_url(&url));

        let response = self
            .client
            .client()
            .get(url)
            .send()
            .await
            .map_err(|e| {
                MetadataError::transport(
                    endpoint,
                    format!("Failed to get response: {}", e.without_url()),
                )
            })?;

        if !response.status().is_success() {
            return Err(MetadataError::transport(
                endpoint,
                format!("ComicVine API returned status: {}", response.status()),
            ));
        }

        let body = response.text().await.map_err(|e| {
            MetadataError::transport(
                endpoint,
                format!("Failed to read response: {}", e.without_url()),
            )
        })?;

        let body = body.trim();
        if body.is_empty() || body == "null" {
            return Err(MetadataError::transport(endpoint, "No response received"));
        }

        let envelope: Envelope<serde_json::Value> = serde_json::from_str(body).map_err(|e| {
            MetadataError::transport(endpoint, format!("Failed to parse JSON: {}", e))
        })?;

        if let Some(code) = envelope.status_code {
            if code != STATUS_OK {
                return Err(MetadataError::transport(
                    endpoint,
                    format!(
                        "ComicVine API error {}: {}",
                        code,
                        envelope.error.as_deref().unwrap_or("unknown error")
                    ),
                ));
            }
        }

        let (info, results) = envelope.split();
        if results.is_null() {
            return Err(MetadataError::transport(endpoint, "No results received"));
        }

        let results = serde_json::from_value(results).map_err(|e| {
            MetadataError::transport(endpoint, format!("Failed to parse results: {}", e))
        })?;

        Ok((info, results))
    }
}

#[async_trait]
impl ComicVineApi for HttpComicVineApi {
    async fn volume_issues_page(
        &self,
        settings: &ApiSettings,
        volume_id: &str,
        offset: u32,
    ) -> Result<VolumeIssuesPage, MetadataError> {
        let path = format!("volume/{}-{}/", VOLUME_PREFIX, volume_id.trim());
        let mut url = Self::endpoint_url(settings, &path)?;
        Self::add_query(&mut url, settings, VOLUME_LISTING_FIELDS, Some(offset));

        let endpoint = format!("volume {}-{} offset {}", VOLUME_PREFIX, volume_id, offset);
        let (info, listing): (PageInfo, VolumeListing) = self.get(url, &endpoint).await?;
        Ok(listing.into_page(info))
    }

    async fn issues_for_volume(
        &self,
        settings: &ApiSettings,
        volume_id: &str,
        issue_number: &str,
    ) -> Result<Vec<IssueSummary>, MetadataError> {
        let mut url = Self::endpoint_url(settings, "issues/")?;
        Self::add_query(&mut url, settings, &[], None);
        url.query_pairs_mut().append_pair("filter", &issue_filter(volume_id, issue_number));

        let endpoint = format!(
            "issues volume {}-{} number {}",
            VOLUME_PREFIX, volume_id, issue_number
        );
        let (_, issues): (PageInfo, Vec<IssueSummary>) = self.get(url, &endpoint).await?;
        Ok(issues)
    }

    async fn issue_detail(
        &self,
        settings: &ApiSettings,
        issue_id: &str,
    ) -> Result<IssueDetail, MetadataError> {
        let path = format!("issue/{}-{}/", ISSUE_PREFIX, issue_id.trim());
        let mut url = Self::endpoint_url(settings, &path)?;
        Self::add_query(&mut url, settings, &[], None);

        let endpoint = format!("issue {}-{}", ISSUE_PREFIX, issue_id);
        let (_, issue) = self.get(url, &endpoint).await?;
        Ok(issue)
    }

    async fn volume_detail(
        &self,
        settings: &ApiSettings,
        detail_url: &str,
    ) -> Result<VolumeDetail, MetadataError> {
        let endpoint = format!("volume detail {}", detail_url);
        let mut url = Self::detail_url(&endpoint, detail_url)?;
        Self::add_query(&mut url, settings, &[], None);

        let (_, volume) = self.get(url, &endpoint).await?;
        Ok(volume)
    }

    async fn publisher_detail(
        &self,
        settings: &ApiSettings,
        detail_url: &str,
    ) -> Result<PublisherDetail, MetadataError> {
        let endpoint = format!("publisher detail {}", detail_url);
        let mut url = Self::detail_url(&endpoint, detail_url)?;
        Self::add_query(&mut url, settings, &[], None);

        let (_, publisher) = self.get(url, &endpoint).await?;
        Ok(publisher)
    }
}

/// `filter` value for the issues list endpoint
fn issue_filter(volume_id: &str, issue_number: &str) -> String {
    let volume_id = volume_id.trim();
    let issue_number = issue_number.trim();
    if issue_number.is_empty() {
        format!("volume:{}", volume_id)
    } else {
        format!("volume:{},issue_number:{}", volume_id, issue_number)
    }
}

/// ComicVine metadata source
///
/// Supports:
/// - Listing every issue of a volume
/// - Finding the issues of a volume by issue number
/// - Loading the full details of a single issue
#[derive(Debug, Clone)]
pub struct ComicVineSource<A = HttpComicVineApi, T = SignalThrottle> {
    api: A,
    throttle: T,
}

impl ComicVineSource {
    /// Create a source backed by HTTP with Ctrl-C interruptible pauses
    ///
    /// Must be called inside a Tokio runtime; see [`SignalThrottle::new`].
    pub fn new() -> Result<Self, MetadataError> {
        Ok(Self::with_parts(HttpComicVineApi::new()?, SignalThrottle::new()))
    }

    /// Create with a custom HTTP client
    ///
    /// Must be called inside a Tokio runtime; see [`SignalThrottle::new`].
    pub fn with_client(client: Arc<HttpClient>) -> Self {
        Self::with_parts(HttpComicVineApi::with_client(client), SignalThrottle::new())
    }
}

impl<A: ComicVineApi, T: Throttle> ComicVineSource<A, T> {
    /// Create from any API and throttle implementation
    pub fn with_parts(api: A, throttle: T) -> Self {
        Self { api, throttle }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn throttle(&self) -> &T {
        &self.throttle
    }

    /// Every issue of a volume, in API order
    pub async fn get_all_issues(
        &self,
        request: &VolumeIssuesRequest,
    ) -> Result<Vec<NormalizedMetadata>, MetadataError> {
        walk_volume_issues(&self.api, &self.throttle, request).await
    }

    /// Issues of a volume carrying an issue number
    pub async fn lookup_issue(
        &self,
        request: &IssueLookupRequest,
    ) -> Result<Vec<NormalizedMetadata>, MetadataError> {
        lookup_issue(&self.api, request).await
    }

    /// Full details of one issue
    pub async fn get_issue_details(
        &self,
        request: &IssueDetailsRequest,
    ) -> Result<NormalizedMetadata, MetadataError> {
        fetch_issue_details(&self.api, request).await
    }
}
