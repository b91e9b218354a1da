//! Read-side view over the normalized notes: lookup by calendar day and
//! wrap-around navigation between days.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::normalize::parse_note_date;
use crate::notes::ResolvedNote;

#[derive(Debug, Clone, Default)]
pub struct NoteCatalog {
    notes: Vec<ResolvedNote>,
    /// First note index for each day.
    by_date: BTreeMap<NaiveDate, usize>,
}

impl NoteCatalog {
    /// `notes` should come out of [`normalize`](crate::normalize::normalize);
    /// notes with unparsable dates are kept but cannot be looked up by day.
    pub fn new(notes: Vec<ResolvedNote>) -> Self {
        let mut by_date = BTreeMap::new();
        for (index, note) in notes.iter().enumerate() {
            if let Some(date) = parse_note_date(&note.date) {
                by_date.entry(date).or_insert(index);
            }
        }
        Self { notes, by_date }
    }

    pub fn notes(&self) -> &[ResolvedNote] {
        &self.notes
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// Days that have a note, ascending.
    pub fn dates(&self) -> Vec<NaiveDate> {
        self.by_date.keys().copied().collect()
    }

    /// Days whose note carries an image.
    pub fn image_dates(&self) -> Vec<NaiveDate> {
        self.by_date
            .iter()
            .filter(|(_, &i)| self.notes[i].has_image())
            .map(|(d, _)| *d)
            .collect()
    }

    pub fn find_by_date(&self, date: NaiveDate) -> Option<&ResolvedNote> {
        self.by_date.get(&date).map(|&i| &self.notes[i])
    }

    pub fn find_by_id(&self, id: &str) -> Option<&ResolvedNote> {
        self.notes.iter().find(|n| n.id == id)
    }

    /// Note after the one on `date`, wrapping to the first. None with fewer than two notes.
    pub fn next(&self, date: NaiveDate) -> Option<&ResolvedNote> {
        self.step(date, 1)
    }

    /// Note before the one on `date`, wrapping to the last.
    pub fn previous(&self, date: NaiveDate) -> Option<&ResolvedNote> {
        self.step(date, self.notes.len().saturating_sub(1))
    }

    fn step(&self, date: NaiveDate, offset: usize) -> Option<&ResolvedNote> {
        let len = self.notes.len();
        if len <= 1 {
            return None;
        }
        let current = *self.by_date.get(&date)?;
        self.notes.get((current + offset) % len)
    }
}
