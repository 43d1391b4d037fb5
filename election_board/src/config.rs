// ********* Input data structures ***********

use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// A dated announcement, as read from the notice ledger or its JSON form.
///
/// The `id` is positional: it is assigned at conversion time from the line
/// position and is not stable if lines are reordered.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct Notice {
    pub id: String,
    pub title: String,
    pub content: String,
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pdf: Option<String>,
}

/// The JSON fallback document for notices.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct NoticeDocument {
    pub notices: Vec<Notice>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct Candidate {
    pub name: String,
    pub votes: u64,
}

/// The tally of one contest: a central panel position or a councillor school.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ContestResult {
    pub title: String,
    pub candidates: Vec<Candidate>,
    pub last_updated: Option<String>,
}

// ******** Per-source outcomes *********

/// Why a single data source could not be used for this refresh.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum FailureKind {
    /// No transport at all: connection refused, DNS failure, missing data directory.
    Unreachable,
    /// The data directory is there but the file is not, or cannot be read.
    Missing,
    /// The server answered with a non-success status.
    Status(u16),
    /// The request did not complete in time.
    Timeout,
    /// The exchange broke off after a connection was made.
    Transport,
    /// The body was received but could not be understood.
    Parse,
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct SourceFailure {
    pub source: String,
    pub kind: FailureKind,
    pub message: String,
}

impl Display for SourceFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            FailureKind::Status(code) => write!(f, "HTTP status {} for {}", code, self.source),
            FailureKind::Unreachable => write!(f, "{} is unreachable: {}", self.source, self.message),
            FailureKind::Missing => write!(f, "{} is missing: {}", self.source, self.message),
            FailureKind::Timeout => write!(f, "timed out fetching {}", self.source),
            FailureKind::Transport => write!(f, "error fetching {}: {}", self.source, self.message),
            FailureKind::Parse => write!(f, "could not read {}: {}", self.source, self.message),
        }
    }
}

/// The tagged result of fetching and parsing one source.
pub type SourceOutcome<T> = Result<T, SourceFailure>;

// ********* Configuration **********

/// How candidates are ordered inside a contest table.
///
/// This is fixed per rendering surface, never chosen per request.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Serialize, Deserialize, Default)]
pub enum CandidateOrder {
    /// Keep the document order (alphabetical, with NOTA/BLANK/INVALID last).
    #[default]
    #[serde(rename = "source")]
    Source,
    #[serde(rename = "votesDescending")]
    VotesDescending,
}

/// The two deployment shapes for result data. They are not interchangeable.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Serialize, Deserialize, Default)]
pub enum ResultsLayout {
    #[default]
    #[serde(rename = "perCategory")]
    PerCategory,
    #[serde(rename = "combined")]
    Combined,
}

/// A two-category breakdown in percent. The pair is expected to sum to 100.
#[derive(PartialEq, Debug, Clone, Copy, Serialize, Deserialize)]
pub struct GenderRatio {
    pub male: f64,
    pub female: f64,
}

impl GenderRatio {
    pub const EVEN: GenderRatio = GenderRatio {
        male: 50.0,
        female: 50.0,
    };
}

impl Default for GenderRatio {
    fn default() -> Self {
        GenderRatio::EVEN
    }
}

/// Rendering options for the notice views.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct NoticeViewOptions {
    /// Maximum number of links in the compact (home page) list.
    pub home_limit: Option<usize>,
    /// Prefix prepended to attachment file names.
    pub attachment_base: String,
    /// Page holding the full notice cards.
    pub full_page: String,
}

impl NoticeViewOptions {
    pub const DEFAULT_HOME_LIMIT: usize = 3;
}

impl Default for NoticeViewOptions {
    fn default() -> Self {
        NoticeViewOptions {
            home_limit: Some(NoticeViewOptions::DEFAULT_HOME_LIMIT),
            attachment_base: "data/notices/".to_string(),
            full_page: "notices.html".to_string(),
        }
    }
}
