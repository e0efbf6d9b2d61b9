//! Immutable request parameters for the ComicVine flows.

use std::time::Duration;

use crate::sources::MetadataError;
use crate::utils::mask_api_key;

/// Public ComicVine API root
pub const DEFAULT_BASE_URL: &str = "https://comicvine.gamespot.com/api";

/// Default pause between listing pages
pub const DEFAULT_DELAY_SECONDS: u64 = 1;

/// Connection settings shared by every ComicVine call
#[derive(Clone)]
pub struct ApiSettings {
    /// ComicVine API key
    pub api_key: String,

    /// API root, e.g. `https://comicvine.gamespot.com/api`
    pub base_url: String,

    /// Pause between consecutive page requests
    pub delay: Duration,
}

impl ApiSettings {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            delay: Duration::from_secs(DEFAULT_DELAY_SECONDS),
        }
    }

    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn delay_seconds(mut self, seconds: u64) -> Self {
        self.delay = Duration::from_secs(seconds);
        self
    }

    /// API key safe for logs
    pub fn masked_api_key(&self) -> String {
        mask_api_key(&self.api_key)
    }

    fn require_api_key(&self) -> Result<(), MetadataError> {
        if self.api_key.trim().is_empty() {
            return Err(MetadataError::Configuration("Missing API key".to_string()));
        }
        Ok(())
    }
}

// Keeps the key out of `{:?}` output.
impl std::fmt::Debug for ApiSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiSettings")
            .field("api_key", &self.masked_api_key())
            .field("base_url", &self.base_url)
            .field("delay", &self.delay)
            .finish()
    }
}

/// Parameters for walking every issue of a volume
#[derive(Debug, Clone)]
pub struct VolumeIssuesRequest {
    pub settings: ApiSettings,

    /// ComicVine volume id (without the `4050-` prefix)
    pub volume_id: String,

    /// Fetch issue details for each entry to fill in cover and store dates
    pub enrich_dates: bool,
}

impl VolumeIssuesRequest {
    pub fn new(settings: ApiSettings, volume_id: impl Into<String>) -> Self {
        Self {
            settings,
            volume_id: volume_id.into(),
            enrich_dates: false,
        }
    }

    pub fn enrich_dates(mut self, enabled: bool) -> Self {
        self.enrich_dates = enabled;
        self
    }

    /// Check required inputs before any request is made
    pub fn validate(&self) -> Result<(), MetadataError> {
        self.settings.require_api_key()?;
        if self.volume_id.trim().is_empty() {
            return Err(MetadataError::Configuration("Missing volume id".to_string()));
        }
        Ok(())
    }
}

/// Parameters for loading the full details of one issue
#[derive(Debug, Clone)]
pub struct IssueDetailsRequest {
    pub settings: ApiSettings,

    /// ComicVine issue id (without the `4000-` prefix)
    pub issue_id: String,
}

impl IssueDetailsRequest {
    pub fn new(settings: ApiSettings, issue_id: impl Into<String>) -> Self {
        Self {
            settings,
            issue_id: issue_id.into(),
        }
    }

    /// Check required inputs before any request is made
    pub fn validate(&self) -> Result<(), MetadataError> {
        self.settings.require_api_key()?;
        if self.issue_id.trim().is_empty() {
            return Err(MetadataError::Configuration("Missing issue id".to_string()));
        }
        Ok(())
    }
}

/// Parameters for finding the issues of a volume by issue number
#[derive(Debug, Clone)]
pub struct IssueLookupRequest {
    pub settings: ApiSettings,

    /// ComicVine volume id (without the `4050-` prefix)
    pub volume_id: String,

    /// Issue number as printed, e.g. `1` or `989`. Blank matches every issue.
    pub issue_number: String,
}

impl IssueLookupRequest {
    pub fn new(
        settings: ApiSettings,
        volume_id: impl Into<String>,
        issue_number: impl Into<String>,
    ) -> Self {
        Self {
            settings,
            volume_id: volume_id.into(),
            issue_number: issue_number.into(),
        }
    }

    /// Check required inputs before any request is made
    pub fn validate(&self) -> Result<(), MetadataError> {
        self.settings.require_api_key()?;
        if self.volume_id.trim().is_empty() {
            return Err(MetadataError::Configuration("Missing volume id".to_string()));
        }
        Ok(())
    }
}
