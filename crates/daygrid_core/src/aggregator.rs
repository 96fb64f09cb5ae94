//! Per-date aggregation of events and holidays into render lanes.
//!
//! # Responsibility
//! - Combine resolver output with external holiday entries for one date.
//! - Split occurrences into the all-day lane and the timed grid lane.
//! - Attach grid positions to timed occurrences.
//!
//! # Invariants
//! - All-day lane order is holidays first, then user events, each in input order.
//! - Timed occurrences are passed through in input order; grouping sorts them.
//! - Inputs are borrowed read-only; callers' collections are never mutated.

use crate::config::GridConfig;
use crate::grouper::{group_overlaps, OverlapGroup};
use crate::mapper::{parse_clock_time, ClockTime, GridPosition};
use crate::model::event::Event;
use crate::model::holiday::HolidayEntry;
use crate::model::occurrence::Occurrence;
use crate::resolver::matches_with_policy;
use chrono::NaiveDate;

const DAYS_PER_WEEK: usize = 7;

/// Timed occurrence with its parsed clock interval and grid placement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimedOccurrence<'a> {
    pub occurrence: Occurrence<'a>,
    pub start: ClockTime,
    pub end: ClockTime,
    pub position: GridPosition,
}

impl<'a> TimedOccurrence<'a> {
    /// Builds a timed occurrence from the event's clock strings.
    ///
    /// Missing or unparseable times fall back to the grid top.
    pub fn from_event(event: &'a Event, date: NaiveDate, config: &GridConfig) -> Self {
        let start = parse_clock_time(event.start_time.as_deref().unwrap_or_default());
        let end = parse_clock_time(event.end_time.as_deref().unwrap_or_default());
        Self {
            occurrence: Occurrence::of_event(event, date),
            start,
            end,
            position: GridPosition::between(
                start,
                end,
                config.row_height,
                config.minimum_visible_height,
            ),
        }
    }

    pub fn start_minute(&self) -> u32 {
        self.start.grid_minutes()
    }

    pub fn end_minute(&self) -> u32 {
        self.end.grid_minutes()
    }

    /// Half-open `[start, end)` overlap test in grid minutes.
    pub fn overlaps(&self, other: &TimedOccurrence<'_>) -> bool {
        self.start_minute() < other.end_minute() && self.end_minute() > other.start_minute()
    }
}

/// Lanes for one date before overlap grouping.
#[derive(Debug, Clone, PartialEq)]
pub struct DayEntries<'a> {
    pub date: NaiveDate,
    /// Holidays, then all-day and multi-day events.
    pub spanning: Vec<Occurrence<'a>>,
    pub timed: Vec<TimedOccurrence<'a>>,
}

impl DayEntries<'_> {
    pub fn is_empty(&self) -> bool {
        self.spanning.is_empty() && self.timed.is_empty()
    }
}

/// Render-ready layout for one date.
#[derive(Debug, Clone, PartialEq)]
pub struct DayLayout<'a> {
    pub date: NaiveDate,
    pub spanning: Vec<Occurrence<'a>>,
    pub groups: Vec<OverlapGroup<'a>>,
}

/// Stateless aggregator parameterized by grid configuration.
#[derive(Debug, Clone, Default)]
pub struct DayAggregator {
    config: GridConfig,
}

impl DayAggregator {
    pub fn new(config: GridConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    /// Collects the all-day and timed lanes for `date`.
    pub fn for_date<'a>(
        &self,
        date: NaiveDate,
        events: &'a [Event],
        holidays: &'a [HolidayEntry],
    ) -> DayEntries<'a> {
        let mut spanning = holidays
            .iter()
            .filter(|holiday| holiday.falls_on(date))
            .map(Occurrence::of_holiday)
            .collect::<Vec<_>>();
        let mut timed = Vec::new();
        let mut unschedulable = 0usize;

        for event in events {
            if !event.is_schedulable() {
                unschedulable += 1;
                continue;
            }
            if !matches_with_policy(event, date, self.config.monthly_policy) {
                continue;
            }
            if event.is_spanning() {
                spanning.push(Occurrence::of_event(event, date));
            } else {
                timed.push(TimedOccurrence::from_event(event, date, &self.config));
            }
        }

        if unschedulable > 0 {
            log::debug!(
                "event=day_aggregate module=aggregator status=skip date={date} unschedulable={unschedulable}"
            );
        }

        DayEntries {
            date,
            spanning,
            timed,
        }
    }

    /// Aggregates every date in `from..=to`; empty when `from > to`.
    pub fn for_range<'a>(
        &self,
        from: NaiveDate,
        to: NaiveDate,
        events: &'a [Event],
        holidays: &'a [HolidayEntry],
    ) -> Vec<DayEntries<'a>> {
        from.iter_days()
            .take_while(|date| *date <= to)
            .map(|date| self.for_date(date, events, holidays))
            .collect()
    }

    /// Aggregates `date` and groups its timed lane into columns.
    pub fn layout_day<'a>(
        &self,
        date: NaiveDate,
        events: &'a [Event],
        holidays: &'a [HolidayEntry],
    ) -> DayLayout<'a> {
        let entries = self.for_date(date, events, holidays);
        DayLayout {
            date,
            groups: group_overlaps(&entries.timed),
            spanning: entries.spanning,
        }
    }

    /// Lays out the seven days starting at `anchor`.
    pub fn layout_week<'a>(
        &self,
        anchor: NaiveDate,
        events: &'a [Event],
        holidays: &'a [HolidayEntry],
    ) -> Vec<DayLayout<'a>> {
        week_dates(anchor)
            .into_iter()
            .map(|date| self.layout_day(date, events, holidays))
            .collect()
    }
}

/// Seven consecutive dates starting at `anchor`.
pub fn week_dates(anchor: NaiveDate) -> Vec<NaiveDate> {
    anchor.iter_days().take(DAYS_PER_WEEK).collect()
}

#[cfg(test)]
mod tests {
    use super::{week_dates, DayAggregator, TimedOccurrence};
    use crate::config::GridConfig;
    use crate::model::event::{Event, Repeat};
    use crate::model::holiday::HolidayEntry;
    use chrono::NaiveDate;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn multi_day_timed_event_goes_to_spanning_lane() {
        let mut event = Event::spanning("Conference", day(2025, 4, 1), day(2025, 4, 3));
        event.start_time = Some("9:00 AM".to_string());
        event.end_time = Some("5:00 PM".to_string());
        let events = vec![event];

        let entries = DayAggregator::default().for_date(day(2025, 4, 2), &events, &[]);
        assert_eq!(entries.spanning.len(), 1);
        assert!(entries.timed.is_empty());
    }

    #[test]
    fn repeating_multi_day_event_only_matches_anchor_pattern() {
        let events =
            vec![Event::spanning("Sprint", day(2025, 3, 3), day(2025, 3, 5)).with_repeat(Repeat::Weekly)];
        let aggregator = DayAggregator::default();

        assert_eq!(aggregator.for_date(day(2025, 3, 4), &events, &[]).spanning.len(), 0);
        assert_eq!(aggregator.for_date(day(2025, 3, 10), &events, &[]).spanning.len(), 1);
        assert_eq!(aggregator.for_date(day(2025, 3, 11), &events, &[]).spanning.len(), 0);
    }

    #[test]
    fn unschedulable_events_are_excluded() {
        let events = vec![Event::new("Someday")];
        let entries = DayAggregator::default().for_date(day(2025, 1, 1), &events, &[]);
        assert!(entries.is_empty());
    }

    #[test]
    fn timed_occurrence_uses_configured_row_height() {
        let event = Event::timed("Review", day(2025, 2, 2), "2:00 AM", "3:00 AM");
        let config = GridConfig::default().with_row_height(30.0);
        let timed = TimedOccurrence::from_event(&event, day(2025, 2, 2), &config);
        assert_eq!(timed.position.offset, 30.0);
        assert_eq!(timed.position.height, 30.0);
    }

    #[test]
    fn holidays_on_other_dates_are_ignored() {
        let holidays = vec![HolidayEntry::new(day(2025, 1, 26), "Republic Day")];
        let entries = DayAggregator::default().for_date(day(2025, 1, 27), &[], &holidays);
        assert!(entries.spanning.is_empty());
    }

    #[test]
    fn week_has_seven_consecutive_days() {
        let dates = week_dates(day(2025, 12, 29));
        assert_eq!(dates.len(), 7);
        assert_eq!(dates[6], day(2026, 1, 4));
    }
}
