//! Core types: provider identification, queries, and normalised results.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Hard cap on the number of records in a [`ResultSet`].
pub const MAX_RESULTS: usize = 5;

/// The external search providers devfinder can query.
///
/// Serialised as the provider's source label (`"arXiv"`, `"GitHub"`,
/// `"StackOverflow"`), which is also the value persisted with a cached result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProviderId {
    /// arXiv paper index, Atom XML via a CORS relay.
    #[serde(rename = "arXiv")]
    Arxiv,
    /// GitHub repository search, JSON.
    #[serde(rename = "GitHub")]
    Github,
    /// Stack Overflow question search through the Stack Exchange API, JSON.
    #[serde(rename = "StackOverflow")]
    StackOverflow,
}

impl ProviderId {
    /// Source label shown on result badges and stored in the cache.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Arxiv => "arXiv",
            Self::Github => "GitHub",
            Self::StackOverflow => "StackOverflow",
        }
    }

    /// Value used by the provider selector.
    pub fn form_value(&self) -> &'static str {
        match self {
            Self::Arxiv => "arxiv",
            Self::Github => "github",
            Self::StackOverflow => "stackoverflow",
        }
    }

    /// Message displayed when the provider returned nothing for a query.
    pub fn no_results_message(&self) -> &'static str {
        match self {
            Self::Arxiv => "No arXiv papers found for this keyword.",
            Self::Github => "No repositories found.",
            Self::StackOverflow => "No discussions found.",
        }
    }

    /// Returns all provider variants.
    pub fn all() -> &'static [ProviderId] {
        &[Self::Arxiv, Self::Github, Self::StackOverflow]
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Returned when a selector value names no known provider.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown provider: {0:?}")]
pub struct UnknownProvider(pub String);

impl FromStr for ProviderId {
    type Err = UnknownProvider;

    /// Accepts selector values and source labels, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::all()
            .iter()
            .copied()
            .find(|p| {
                wanted.eq_ignore_ascii_case(p.form_value()) || wanted.eq_ignore_ascii_case(p.label())
            })
            .ok_or_else(|| UnknownProvider(s.to_owned()))
    }
}

/// A validated search request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    /// Trimmed, non-empty query text.
    pub text: String,
    /// Which provider to ask.
    pub provider: ProviderId,
}

impl Query {
    /// Build a query from raw input text. Returns `None` when the text is
    /// empty after trimming.
    pub fn new(raw_text: &str, provider: ProviderId) -> Option<Self> {
        let text = raw_text.trim();
        if text.is_empty() {
            return None;
        }
        Some(Self {
            text: text.to_owned(),
            provider,
        })
    }
}

/// One normalised, displayable search hit.
///
/// `title` and `description` are markup-safe and never empty; `link` is an
/// absolute URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultRecord {
    /// Display title.
    pub title: String,
    /// Absolute URL of the resource.
    pub link: String,
    /// Description line; may contain inline markup.
    pub description: String,
    /// Label of the provider that produced this record.
    pub source_label: String,
}

/// Ordered search results for one query, capped at [`MAX_RESULTS`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultSet {
    records: Vec<ResultRecord>,
}

impl ResultSet {
    /// Wrap records in provider order, dropping anything past the cap.
    pub fn new(mut records: Vec<ResultRecord>) -> Self {
        records.truncate(MAX_RESULTS);
        Self { records }
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the set holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterate records in provider order.
    pub fn iter(&self) -> std::slice::Iter<'_, ResultRecord> {
        self.records.iter()
    }

    /// Borrow the records as a slice.
    pub fn records(&self) -> &[ResultRecord] {
        &self.records
    }
}

impl<'a> IntoIterator for &'a ResultSet {
    type Item = &'a ResultRecord;
    type IntoIter = std::slice::Iter<'a, ResultRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

impl FromIterator<ResultRecord> for ResultSet {
    fn from_iter<I: IntoIterator<Item = ResultRecord>>(iter: I) -> Self {
        Self::new(iter.into_iter().take(MAX_RESULTS).collect())
    }
}
