//! Occurrence view: one concrete calendar appearance of an event or holiday.
//!
//! # Invariants
//! - Occurrences are rebuilt for every resolution pass and never stored.
//! - Holiday occurrences are always all-day and never editable.

use crate::model::event::Event;
use crate::model::holiday::HolidayEntry;
use chrono::NaiveDate;

/// Record an occurrence was projected from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OccurrenceSource<'a> {
    Event(&'a Event),
    Holiday(&'a HolidayEntry),
}

/// `(source, date)` pair produced by the resolver or aggregator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Occurrence<'a> {
    pub source: OccurrenceSource<'a>,
    pub date: NaiveDate,
}

impl<'a> Occurrence<'a> {
    pub fn of_event(event: &'a Event, date: NaiveDate) -> Self {
        Self {
            source: OccurrenceSource::Event(event),
            date,
        }
    }

    pub fn of_holiday(holiday: &'a HolidayEntry) -> Self {
        Self {
            source: OccurrenceSource::Holiday(holiday),
            date: holiday.date,
        }
    }

    /// Display title: event title or holiday name.
    pub fn title(&self) -> &'a str {
        match self.source {
            OccurrenceSource::Event(event) => event.title.as_str(),
            OccurrenceSource::Holiday(holiday) => holiday.name.as_str(),
        }
    }

    /// Source event, or `None` for holiday projections.
    pub fn event(&self) -> Option<&'a Event> {
        match self.source {
            OccurrenceSource::Event(event) => Some(event),
            OccurrenceSource::Holiday(_) => None,
        }
    }

    pub fn is_holiday(&self) -> bool {
        matches!(self.source, OccurrenceSource::Holiday(_))
    }

    pub fn all_day(&self) -> bool {
        match self.source {
            OccurrenceSource::Event(event) => event.all_day,
            OccurrenceSource::Holiday(_) => true,
        }
    }

    /// Whether the rendering boundary may offer edit/delete affordances.
    pub fn editable(&self) -> bool {
        !self.is_holiday()
    }
}
