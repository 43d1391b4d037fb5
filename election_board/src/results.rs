//! Result documents, candidate ordering and section aggregation.

use chrono::{DateTime, NaiveDateTime};
use log::{debug, warn};
use serde::Deserialize;
use snafu::{prelude::*, Snafu};

use crate::config::*;

#[derive(Debug, Snafu)]
pub enum ParseError {
    #[snafu(display("malformed JSON: {source}"))]
    Json { source: serde_json::Error },
    #[snafu(display("missing field `{field}`"))]
    MissingField { field: &'static str },
}

pub type ParseResult<T> = Result<T, ParseError>;

#[derive(Deserialize, Debug)]
struct ContestDocument {
    position: Option<String>,
    school: Option<String>,
    candidates: Option<Vec<Candidate>>,
    #[serde(rename = "lastUpdated")]
    last_updated: Option<String>,
}

#[derive(Deserialize, Debug)]
struct SchoolEntry {
    school: Option<String>,
    candidates: Option<Vec<Candidate>>,
}

#[derive(Deserialize, Debug)]
struct CombinedDocument {
    #[serde(rename = "lastUpdated")]
    last_updated: Option<String>,
    #[serde(rename = "centralPanel")]
    central_panel: Option<Vec<Candidate>>,
    councillor: Option<Vec<SchoolEntry>>,
}

/// The contests of a combined results document, split by section.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct CombinedResults {
    pub central_panel: Vec<ContestResult>,
    pub councillor: Vec<ContestResult>,
}

pub const CENTRAL_PANEL_TITLE: &str = "Central Panel";

/// Parses a per-category document (`{position|school, candidates, lastUpdated}`).
pub fn parse_contest(body: &[u8]) -> ParseResult<ContestResult> {
    let doc: ContestDocument = serde_json::from_slice(body).context(JsonSnafu {})?;
    let title = doc
        .position
        .or(doc.school)
        .context(MissingFieldSnafu { field: "position" })?;
    let candidates = doc
        .candidates
        .context(MissingFieldSnafu { field: "candidates" })?;
    Ok(ContestResult {
        title,
        candidates,
        last_updated: doc.last_updated,
    })
}

/// Parses the combined document.
///
/// The central panel becomes one contest. Councillor entries without
/// candidates are dropped with a warning, matching how a failed per-school
/// file is treated.
pub fn parse_combined(body: &[u8]) -> ParseResult<CombinedResults> {
    let doc: CombinedDocument = serde_json::from_slice(body).context(JsonSnafu {})?;
    let central = doc
        .central_panel
        .context(MissingFieldSnafu {
            field: "centralPanel",
        })?;
    let schools = doc
        .councillor
        .context(MissingFieldSnafu { field: "councillor" })?;

    let mut councillor: Vec<ContestResult> = Vec::new();
    for (idx, entry) in schools.into_iter().enumerate() {
        match (entry.school, entry.candidates) {
            (Some(school), Some(candidates)) => councillor.push(ContestResult {
                title: school,
                candidates,
                last_updated: doc.last_updated.clone(),
            }),
            (school, _) => {
                warn!(
                    "parse_combined: councillor entry {} ({:?}) is incomplete, skipping",
                    idx, school
                );
            }
        }
    }
    Ok(CombinedResults {
        central_panel: vec![ContestResult {
            title: CENTRAL_PANEL_TITLE.to_string(),
            candidates: central,
            last_updated: doc.last_updated,
        }],
        councillor,
    })
}

/// Applies the ordering policy of a rendering surface.
pub fn order_candidates(candidates: &[Candidate], order: CandidateOrder) -> Vec<Candidate> {
    let mut res = candidates.to_vec();
    if order == CandidateOrder::VotesDescending {
        // Stable: equal counts keep the document order.
        res.sort_by(|a, b| b.votes.cmp(&a.votes));
    }
    res
}

/// Formats a count with `,` thousands separators, as the en-US locale does.
pub fn format_votes(votes: u64) -> String {
    let digits = votes.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, c) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let s = raw.trim();
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.naive_local())
        .ok()
        .or_else(|| crate::notices::parse_notice_date(s))
}

/// `1/15/2024, 10:30:00 AM`
pub fn format_timestamp(ts: &NaiveDateTime) -> String {
    ts.format("%-m/%-d/%Y, %-I:%M:%S %p").to_string()
}

/// What a results section shows after one refresh.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum SectionView {
    /// At least one source succeeded. Failures are kept for logging and tests.
    Contests {
        contests: Vec<ContestResult>,
        failures: Vec<SourceFailure>,
    },
    /// Every source failed.
    Unavailable(TotalFailure),
}

/// The single error state of a section whose sources all failed.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct TotalFailure {
    /// All failures were transport-level: likely no server is reachable.
    pub unreachable: bool,
    pub failures: Vec<SourceFailure>,
}

impl TotalFailure {
    /// The first failure's one-line reason, for the generic panel.
    pub fn summary(&self) -> String {
        self.failures
            .first()
            .map(|f| f.to_string())
            .unwrap_or_else(|| "no data sources configured".to_string())
    }
}

/// Collapses the per-source outcomes of one section.
///
/// Successful contests keep their source order and get the section's
/// candidate order applied. Failed sources are dropped from the view.
pub fn collect_section(
    outcomes: Vec<SourceOutcome<ContestResult>>,
    order: CandidateOrder,
) -> SectionView {
    let mut contests: Vec<ContestResult> = Vec::new();
    let mut failures: Vec<SourceFailure> = Vec::new();
    for outcome in outcomes {
        match outcome {
            Ok(contest) => {
                debug!(
                    "collect_section: {:?} with {} candidates",
                    contest.title,
                    contest.candidates.len()
                );
                contests.push(ContestResult {
                    candidates: order_candidates(&contest.candidates, order),
                    ..contest
                });
            }
            Err(failure) => {
                warn!("collect_section: excluding source: {}", failure);
                failures.push(failure);
            }
        }
    }
    if contests.is_empty() {
        let unreachable = !failures.is_empty()
            && failures
                .iter()
                .all(|f| f.kind == FailureKind::Unreachable);
        SectionView::Unavailable(TotalFailure {
            unreachable,
            failures,
        })
    } else {
        SectionView::Contests { contests, failures }
    }
}

/// The most recent `lastUpdated` among the displayed contests.
pub fn latest_update<'a, I>(contests: I) -> Option<NaiveDateTime>
where
    I: IntoIterator<Item = &'a ContestResult>,
{
    contests
        .into_iter()
        .filter_map(|c| c.last_updated.as_deref())
        .filter_map(parse_timestamp)
        .max()
}
