//! Conversion of the pipe-delimited notice ledger and date handling.
//!
//! Ledger lines follow `date|title|content[|pdf]`. Content must not contain
//! the raw delimiter: a line with more than four fields is rejected rather
//! than guessed at, since joining the trailing fields and reading the last
//! one as an attachment would disagree on the same line.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use log::{debug, warn};

use crate::config::{Notice, NoticeDocument};

pub const DELIMITER: char = '|';

const MIN_FIELDS: usize = 3;
const MAX_FIELDS: usize = 4;

#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum SkipReason {
    TooFewFields(usize),
    DelimiterInContent(usize),
}

/// A ledger line that did not produce a notice.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct SkippedLine {
    /// 1-based line number in the raw text, empty lines included.
    pub line_number: usize,
    pub reason: SkipReason,
}

#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct NoticeConversion {
    pub notices: Vec<Notice>,
    pub skipped: Vec<SkippedLine>,
}

impl NoticeConversion {
    pub fn into_document(self) -> NoticeDocument {
        NoticeDocument {
            notices: self.notices,
        }
    }
}

/// Converts the raw ledger text into notices, in line order.
///
/// Blank lines are dropped without a trace. Every other line that does not
/// have 3 or 4 fields is reported in `skipped` and logged, but never fails
/// the conversion.
pub fn convert_notices(text: &str) -> NoticeConversion {
    let mut res = NoticeConversion::default();
    let non_empty = text
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty());

    for (position, (idx, line)) in non_empty.enumerate() {
        let line_number = idx + 1;
        let fields: Vec<&str> = line.split(DELIMITER).map(|f| f.trim()).collect();
        let reason = match fields.len() {
            n if n < MIN_FIELDS => Some(SkipReason::TooFewFields(n)),
            n if n > MAX_FIELDS => Some(SkipReason::DelimiterInContent(n)),
            _ => None,
        };
        if let Some(reason) = reason {
            warn!(
                "convert_notices: skipping line {}: {:?}: {:?}",
                line_number, reason, line
            );
            res.skipped.push(SkippedLine {
                line_number,
                reason,
            });
            continue;
        }

        let pdf = fields
            .get(3)
            .filter(|f| !f.is_empty())
            .map(|f| f.to_string());
        let notice = Notice {
            id: format!("notice{}", position + 1),
            date: fields[0].to_string(),
            title: fields[1].to_string(),
            content: fields[2].to_string(),
            pdf,
        };
        debug!("convert_notices: line {}: {:?}", line_number, notice);
        res.notices.push(notice);
    }
    res
}

/// Parses the date forms accepted in the ledger.
///
/// Offsets are dropped after conversion to the stated wall-clock time, so a
/// date-only entry and a timestamp compare on the same naive timeline.
pub fn parse_notice_date(raw: &str) -> Option<NaiveDateTime> {
    let s = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_local());
    }
    const DATETIME_FORMATS: [&str; 4] = [
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
    ];
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// The moment a notice was posted, for ordering. Unlike `parse_notice_date`,
/// an explicit offset is applied, so `09:00+05:30` comes before `05:00Z`.
/// Dates without an offset are taken as they are.
pub fn notice_instant(raw: &str) -> Option<NaiveDateTime> {
    match DateTime::parse_from_rfc3339(raw.trim()) {
        Ok(dt) => Some(dt.naive_utc()),
        Err(_) => parse_notice_date(raw),
    }
}

/// Sorts latest first. The sort is stable: equal dates keep their parse
/// order, and notices with unreadable dates go last in parse order.
pub fn sort_notices_latest_first(notices: &mut [Notice]) {
    notices.sort_by_cached_key(|n| std::cmp::Reverse(notice_instant(&n.date)));
}

#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum DateStyle {
    /// `Jan 15, 2024`, used by the compact list.
    Short,
    /// `January 15, 2024 at 09:30 AM`, used by the full cards.
    Long,
}

pub fn format_notice_date(raw: &str, style: DateStyle) -> String {
    match parse_notice_date(raw) {
        Some(dt) => match style {
            DateStyle::Short => dt.format("%b %-d, %Y").to_string(),
            DateStyle::Long => dt.format("%B %-d, %Y at %I:%M %p").to_string(),
        },
        None => raw.trim().to_string(),
    }
}
