//! Core calendar-grid logic for the week/day view.
//! This crate is the single source of truth for occurrence and layout rules.

pub mod aggregator;
pub mod config;
pub mod cursor;
pub mod grouper;
pub mod logging;
pub mod mapper;
pub mod model;
pub mod resolver;

pub use aggregator::{week_dates, DayAggregator, DayEntries, DayLayout, TimedOccurrence};
pub use config::{ConfigError, GridConfig, MonthlyPolicy};
pub use cursor::{tick, Clock, CursorError, CursorState, LiveTimeCursor, SystemClock};
pub use grouper::{
    group_overlaps, ColumnPlacement, GroupLayout, OverflowMarker, OverlapGroup,
};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use mapper::{
    format_clock_time, interval_height, parse_clock_time, row_index_of, rows, to_grid_offset,
    try_parse_clock_time, ClockTime, GridPosition, HOUR_ORDER,
};
pub use model::event::{Event, EventId, EventValidationError, Reminder, Repeat};
pub use model::holiday::HolidayEntry;
pub use model::occurrence::{Occurrence, OccurrenceSource};
pub use resolver::{matches, matches_with_policy, occurrences_in_range, OccurrenceRange};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
