//! ComicVine response payloads.
//!
//! ComicVine is loose with types: ids arrive as numbers, `start_year` as a
//! string or null, and list fields as null when empty. Everything here decodes
//! into owned strings and vectors so the flows never see those variations.

use serde::{Deserialize, Deserializer};

/// `status_code` ComicVine uses for a successful call
pub const STATUS_OK: i64 = 1;

/// Outer wrapper shared by every ComicVine response
#[derive(Debug, Deserialize)]
pub(crate) struct Envelope<T> {
    #[serde(default)]
    pub error: Option<String>,

    #[serde(default)]
    pub status_code: Option<i64>,

    #[serde(default)]
    pub offset: u32,

    #[serde(default)]
    pub number_of_page_results: u32,

    #[serde(default)]
    pub number_of_total_results: u32,

    pub results: T,
}

/// Paging counters reported alongside `results`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct PageInfo {
    pub offset: u32,
    pub page_result_count: u32,
    pub total_result_count: u32,
}

impl<T> Envelope<T> {
    /// Separate the paging counters from the payload
    pub fn split(self) -> (PageInfo, T) {
        let info = PageInfo {
            offset: self.offset,
            page_result_count: self.number_of_page_results,
            total_result_count: self.number_of_total_results,
        };
        (info, self.results)
    }
}

/// One page of the volume listing endpoint
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VolumeIssuesPage {
    pub offset: u32,
    pub page_result_count: u32,
    pub total_result_count: u32,
    pub issues: Vec<IssueSummary>,
    pub publisher: Option<String>,
    pub series: Option<String>,
    pub start_year: Option<String>,
}

impl VolumeIssuesPage {
    /// Whether the server has reported every result
    pub fn is_last(&self) -> bool {
        self.offset.saturating_add(self.page_result_count) >= self.total_result_count
    }

    /// Offset to request for the page after this one
    pub fn next_offset(&self) -> u32 {
        self.offset.saturating_add(self.page_result_count)
    }
}

/// `results` of the volume listing endpoint
#[derive(Debug, Deserialize)]
pub(crate) struct VolumeListing {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub issues: Vec<IssueSummary>,

    #[serde(default)]
    pub publisher: Option<EntityRef>,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub start_year: Option<String>,
}

impl VolumeListing {
    pub fn into_page(self, info: PageInfo) -> VolumeIssuesPage {
        VolumeIssuesPage {
            offset: info.offset,
            page_result_count: info.page_result_count,
            total_result_count: info.total_result_count,
            issues: self.issues,
            publisher: self.publisher.and_then(|p| p.name),
            series: self.name,
            start_year: self.start_year,
        }
    }
}

/// Issue entry as listed under a volume
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct IssueSummary {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,

    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub issue_number: Option<String>,

    #[serde(default, rename = "name")]
    pub title: Option<String>,

    #[serde(default)]
    pub cover_date: Option<String>,

    #[serde(default)]
    pub store_date: Option<String>,

    /// Only present on the `issues` list endpoint
    #[serde(default)]
    pub volume: Option<EntityRef>,
}

/// Reference to another ComicVine entity, with the URL to fetch it from
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct EntityRef {
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub api_detail_url: Option<String>,
}

/// Named entry in one of the issue's credit lists
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct NamedRef {
    #[serde(default)]
    pub name: Option<String>,
}

/// Person credit with ComicVine's comma-joined free-text role
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PersonCredit {
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub role: Option<String>,
}

/// `results` of the issue detail endpoint
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct IssueDetail {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,

    #[serde(default)]
    pub cover_date: Option<String>,

    #[serde(default)]
    pub store_date: Option<String>,

    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub issue_number: Option<String>,

    #[serde(default, rename = "name")]
    pub title: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub volume: Option<EntityRef>,

    #[serde(default, rename = "character_credits", deserialize_with = "null_as_empty")]
    pub characters: Vec<NamedRef>,

    #[serde(default, rename = "team_credits", deserialize_with = "null_as_empty")]
    pub teams: Vec<NamedRef>,

    #[serde(default, rename = "location_credits", deserialize_with = "null_as_empty")]
    pub locations: Vec<NamedRef>,

    #[serde(default, rename = "story_arc_credits", deserialize_with = "null_as_empty")]
    pub stories: Vec<NamedRef>,

    #[serde(default, rename = "person_credits", deserialize_with = "null_as_empty")]
    pub people: Vec<PersonCredit>,
}

/// `results` of the volume detail endpoint
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct VolumeDetail {
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub start_year: Option<String>,

    #[serde(default)]
    pub api_detail_url: Option<String>,

    #[serde(default)]
    pub publisher: Option<EntityRef>,
}

/// `results` of the publisher detail endpoint
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PublisherDetail {
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub api_detail_url: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    String(String),
    Integer(i64),
    Float(f64),
}

impl From<StringOrNumber> for String {
    fn from(value: StringOrNumber) -> Self {
        match value {
            StringOrNumber::String(s) => s,
            StringOrNumber::Integer(n) => n.to_string(),
            StringOrNumber::Float(n) => n.to_string(),
        }
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    StringOrNumber::deserialize(deserializer).map(String::from)
}

fn opt_string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<StringOrNumber>::deserialize(deserializer)?.map(String::from))
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}
