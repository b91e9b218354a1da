//! Record normalizer: validate dates and ids, then order by date.
//!
//! Policy: records whose date is not a real calendar date, and records that
//! repeat an earlier id, are skipped with a warning. Survivors are sorted
//! ascending by date; equal dates keep archive order.

use std::collections::HashSet;

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::notes::ResolvedNote;

/// Canonical form used for every normalized date.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parses a record date: `YYYY-MM-DD`, optionally followed by a time
/// (`YYYY-MM-DDTHH:MM:SS` with or without an offset). Only the calendar date is kept.
pub fn parse_note_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, DATE_FORMAT) {
        return Some(date);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|dt| dt.date())
}

/// Drops invalid records, rewrites dates to `YYYY-MM-DD` and sorts ascending.
pub fn normalize(notes: Vec<ResolvedNote>) -> Vec<ResolvedNote> {
    let mut seen = HashSet::with_capacity(notes.len());
    let mut dated: Vec<(NaiveDate, ResolvedNote)> = Vec::with_capacity(notes.len());
    for mut note in notes {
        let Some(date) = parse_note_date(&note.date) else {
            tracing::warn!(note = %note.id, date = %note.date, "skipping note with invalid date");
            continue;
        };
        if !seen.insert(note.id.clone()) {
            tracing::warn!(note = %note.id, "skipping note with duplicate id");
            continue;
        }
        note.date = date.format(DATE_FORMAT).to_string();
        dated.push((date, note));
    }
    // Stable: equal dates keep archive order.
    dated.sort_by_key(|(date, _)| *date);
    dated.into_iter().map(|(_, note)| note).collect()
}
