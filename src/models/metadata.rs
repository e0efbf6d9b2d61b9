//! Normalized issue metadata handed to the library application.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::credit::Credit;

/// Date format ComicVine uses for `cover_date` and `store_date`
const SOURCE_DATE_FORMAT: &str = "%Y-%m-%d";

/// Metadata for a single comic issue, flattened from one or more ComicVine responses
///
/// Records produced by a volume walk only carry the fields available on the
/// listing page; records produced by the detail chain carry everything.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NormalizedMetadata {
    /// ComicVine issue id
    pub source_id: String,

    /// Publisher name
    pub publisher: String,

    /// Series (volume) name
    pub series: String,

    /// Volume start year
    pub volume: String,

    /// Issue number as printed
    pub issue_number: String,

    /// Issue title
    pub title: Option<String>,

    /// Cover date
    pub cover_date: Option<NaiveDate>,

    /// In-store date
    pub store_date: Option<NaiveDate>,

    /// Issue description (HTML as returned by the API)
    pub description: Option<String>,

    #[serde(default)]
    pub characters: Vec<String>,

    #[serde(default)]
    pub teams: Vec<String>,

    #[serde(default)]
    pub locations: Vec<String>,

    #[serde(default)]
    pub stories: Vec<String>,

    #[serde(default)]
    pub credits: Vec<Credit>,
}

impl NormalizedMetadata {
    /// Create a record with the identifying fields set
    pub fn new(source_id: impl Into<String>) -> Self {
        Self {
            source_id: source_id.into(),
            ..Self::default()
        }
    }

    /// Display label such as `Batman v2011 #12`
    pub fn label(&self) -> String {
        if self.volume.is_empty() {
            format!("{} #{}", self.series, self.issue_number)
        } else {
            format!("{} v{} #{}", self.series, self.volume, self.issue_number)
        }
    }
}

/// Parse a ComicVine date, returning `None` for blank or malformed values
pub fn parse_source_date(raw: Option<&str>) -> Option<NaiveDate> {
    let raw = raw?.trim();
    if raw.is_empty() {
        return None;
    }

    match NaiveDate::parse_from_str(raw, SOURCE_DATE_FORMAT) {
        Ok(date) => Some(date),
        Err(e) => {
            tracing::debug!("Ignoring malformed date '{}': {}", raw, e);
            None
        }
    }
}

/// Builder for constructing NormalizedMetadata records
#[derive(Debug, Clone)]
pub struct MetadataBuilder {
    metadata: NormalizedMetadata,
}

impl MetadataBuilder {
    pub fn new(source_id: impl Into<String>) -> Self {
        Self {
            metadata: NormalizedMetadata::new(source_id),
        }
    }

    /// Set publisher name (trimmed)
    pub fn publisher(mut self, publisher: impl AsRef<str>) -> Self {
        self.metadata.publisher = publisher.as_ref().trim().to_string();
        self
    }

    /// Set series name (trimmed)
    pub fn series(mut self, series: impl AsRef<str>) -> Self {
        self.metadata.series = series.as_ref().trim().to_string();
        self
    }

    /// Set volume start year (trimmed)
    pub fn volume(mut self, volume: impl AsRef<str>) -> Self {
        self.metadata.volume = volume.as_ref().trim().to_string();
        self
    }

    /// Set issue number (trimmed)
    pub fn issue_number(mut self, issue_number: impl AsRef<str>) -> Self {
        self.metadata.issue_number = issue_number.as_ref().trim().to_string();
        self
    }

    pub fn title(mut self, title: Option<String>) -> Self {
        self.metadata.title = title;
        self
    }

    pub fn cover_date(mut self, date: Option<NaiveDate>) -> Self {
        self.metadata.cover_date = date;
        self
    }

    pub fn store_date(mut self, date: Option<NaiveDate>) -> Self {
        self.metadata.store_date = date;
        self
    }

    pub fn description(mut self, description: Option<String>) -> Self {
        self.metadata.description = description;
        self
    }

    pub fn characters(mut self, names: Vec<String>) -> Self {
        self.metadata.characters = names;
        self
    }

    pub fn teams(mut self, names: Vec<String>) -> Self {
        self.metadata.teams = names;
        self
    }

    pub fn locations(mut self, names: Vec<String>) -> Self {
        self.metadata.locations = names;
        self
    }

    pub fn stories(mut self, names: Vec<String>) -> Self {
        self.metadata.stories = names;
        self
    }

    pub fn credits(mut self, credits: Vec<Credit>) -> Self {
        self.metadata.credits = credits;
        self
    }

    /// Build the record
    pub fn build(self) -> NormalizedMetadata {
        self.metadata
    }
}
