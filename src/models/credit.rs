//! Contributor credits and the role lookup table.

use serde::{Deserialize, Serialize};

/// Canonical tag identifiers used by the consuming library application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComicTagType {
    Writer,
    Editor,
    Penciller,
    Inker,
    Colorist,
    Letterer,
    Cover,
}

impl ComicTagType {
    /// Returns the tag value as stored by the library
    pub fn value(&self) -> &'static str {
        match self {
            ComicTagType::Writer => "writer",
            ComicTagType::Editor => "editor",
            ComicTagType::Penciller => "penciller",
            ComicTagType::Inker => "inker",
            ComicTagType::Colorist => "colorist",
            ComicTagType::Letterer => "letterer",
            ComicTagType::Cover => "cover",
        }
    }
}

impl std::fmt::Display for ComicTagType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value())
    }
}

/// Role names as ComicVine writes them in `person_credits[].role`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreditRole {
    Writer,
    Editor,
    Penciller,
    Inker,
    Colorist,
    Letterer,
    Cover,
}

/// ComicVine role name → credit role. Matched case-insensitively.
const ROLE_TABLE: &[(&str, CreditRole)] = &[
    ("writer", CreditRole::Writer),
    ("editor", CreditRole::Editor),
    ("penciler", CreditRole::Penciller),
    ("penciller", CreditRole::Penciller),
    ("inker", CreditRole::Inker),
    ("colorist", CreditRole::Colorist),
    ("letterer", CreditRole::Letterer),
    ("cover", CreditRole::Cover),
];

impl CreditRole {
    /// Look up a single role token. Returns `None` for roles the library has no tag for.
    pub fn from_source_name(name: &str) -> Option<Self> {
        let name = name.trim();
        ROLE_TABLE
            .iter()
            .find(|(source_name, _)| source_name.eq_ignore_ascii_case(name))
            .map(|(_, role)| *role)
    }

    /// The canonical tag for this role
    pub fn tag(&self) -> ComicTagType {
        match self {
            CreditRole::Writer => ComicTagType::Writer,
            CreditRole::Editor => ComicTagType::Editor,
            CreditRole::Penciller => ComicTagType::Penciller,
            CreditRole::Inker => ComicTagType::Inker,
            CreditRole::Colorist => ComicTagType::Colorist,
            CreditRole::Letterer => ComicTagType::Letterer,
            CreditRole::Cover => ComicTagType::Cover,
        }
    }
}

/// A single (person, role) pair on an issue
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credit {
    /// Contributor name
    pub name: String,

    /// Canonical role tag
    pub role: ComicTagType,
}

impl Credit {
    pub fn new(name: impl Into<String>, role: ComicTagType) -> Self {
        Self {
            name: name.into(),
            role,
        }
    }
}

/// Split a comma-joined role string and map every known token to its tag.
///
/// Order follows the input. Blank and unknown tokens are skipped.
pub fn parse_roles(raw: &str) -> Vec<ComicTagType> {
    raw.split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .filter_map(|token| match CreditRole::from_source_name(token) {
            Some(role) => Some(role.tag()),
            None => {
                tracing::trace!("Dropping unmapped credit role: {}", token);
                None
            }
        })
        .collect()
}

/// Expand one contributor into one credit per mapped role
pub fn expand_credits(name: &str, raw_roles: &str) -> Vec<Credit> {
    parse_roles(raw_roles)
        .into_iter()
        .map(|tag| Credit::new(name, tag))
        .collect()
}
