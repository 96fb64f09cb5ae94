//! Occurrence resolution: does an event appear on a given date?
//!
//! # Responsibility
//! - Decide per-date membership for single, spanning and repeating events.
//! - Enumerate `(event, date)` occurrences over a bounded date window.
//!
//! # Invariants
//! - Repeats never project before `start_date`.
//! - Weekly repeats anchor on the event's own start weekday.
//! - Repeating multi-day events only produce single-day occurrences matched
//!   from `start_date`; their span is not expanded.
//! - Events missing either date never match.

use crate::config::MonthlyPolicy;
use crate::model::event::{Event, Repeat};
use crate::model::occurrence::Occurrence;
use chrono::{Datelike, NaiveDate};

/// Returns whether `event` appears on `target` under the default skip policy.
pub fn matches(event: &Event, target: NaiveDate) -> bool {
    matches_with_policy(event, target, MonthlyPolicy::Skip)
}

/// Returns whether `event` appears on `target` using the given monthly policy.
pub fn matches_with_policy(event: &Event, target: NaiveDate, policy: MonthlyPolicy) -> bool {
    let Some((start, end)) = event.date_range() else {
        return false;
    };

    match event.repeat {
        Repeat::None => start <= target && target <= end,
        _ if target < start => false,
        Repeat::Daily => true,
        Repeat::Weekly => (target - start).num_days() % 7 == 0,
        Repeat::Monthly => monthly_matches(start, target, policy),
        Repeat::Yearly => target.day() == start.day() && target.month() == start.month(),
    }
}

fn monthly_matches(start: NaiveDate, target: NaiveDate, policy: MonthlyPolicy) -> bool {
    match policy {
        MonthlyPolicy::Skip => target.day() == start.day(),
        MonthlyPolicy::ClampToMonthEnd => {
            let anchor = start.day().min(days_in_month(target));
            target.day() == anchor
        }
    }
}

/// Number of days in the month containing `date`.
pub(crate) fn days_in_month(date: NaiveDate) -> u32 {
    let (year, month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|first_of_next| first_of_next.pred_opt())
        .map(|last| last.day())
        .unwrap_or(31)
}

/// Lazily enumerates occurrences of `events` within `from..=to`.
///
/// The returned value is a cheap, copyable description of the window; every
/// call to `iter` starts a fresh enumeration with identical results.
pub fn occurrences_in_range(events: &[Event], from: NaiveDate, to: NaiveDate) -> OccurrenceRange<'_> {
    OccurrenceRange {
        events,
        from,
        to,
        policy: MonthlyPolicy::Skip,
    }
}

/// Restartable occurrence window over a borrowed event snapshot.
#[derive(Debug, Clone, Copy)]
pub struct OccurrenceRange<'a> {
    events: &'a [Event],
    from: NaiveDate,
    to: NaiveDate,
    policy: MonthlyPolicy,
}

impl<'a> OccurrenceRange<'a> {
    pub fn with_policy(mut self, policy: MonthlyPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn iter(&self) -> OccurrenceIter<'a> {
        OccurrenceIter {
            range: *self,
            event_index: 0,
            cursor: None,
        }
    }
}

impl<'a> IntoIterator for OccurrenceRange<'a> {
    type Item = Occurrence<'a>;
    type IntoIter = OccurrenceIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a> IntoIterator for &OccurrenceRange<'a> {
    type Item = Occurrence<'a>;
    type IntoIter = OccurrenceIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator state for one enumeration of an `OccurrenceRange`.
#[derive(Debug, Clone)]
pub struct OccurrenceIter<'a> {
    range: OccurrenceRange<'a>,
    event_index: usize,
    /// Next date to test for the current event; `None` before the event is entered.
    cursor: Option<NaiveDate>,
}

impl<'a> OccurrenceIter<'a> {
    fn first_candidate(&self, event: &Event) -> Option<NaiveDate> {
        let (start, _) = event.date_range()?;
        let first = start.max(self.range.from);
        (first <= self.range.to).then_some(first)
    }
}

impl<'a> Iterator for OccurrenceIter<'a> {
    type Item = Occurrence<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let events = self.range.events;
        loop {
            let event = events.get(self.event_index)?;
            let date = match self.cursor {
                Some(date) if date <= self.range.to => date,
                Some(_) => {
                    self.event_index += 1;
                    self.cursor = None;
                    continue;
                }
                None => match self.first_candidate(event) {
                    Some(date) => date,
                    None => {
                        self.event_index += 1;
                        continue;
                    }
                },
            };

            match date.succ_opt() {
                Some(next) => self.cursor = Some(next),
                None => {
                    self.event_index += 1;
                    self.cursor = None;
                }
            }

            if matches_with_policy(event, date, self.range.policy) {
                return Some(Occurrence::of_event(event, date));
            }
        }
    }
}
