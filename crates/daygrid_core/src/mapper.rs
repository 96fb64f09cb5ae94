//! Time-of-day mapping onto the fixed-order hour grid.
//!
//! # Responsibility
//! - Parse 12-hour clock strings into 24-hour `(hour, minute)` pairs.
//! - Convert clock times into vertical grid offsets and block heights.
//!
//! # Invariants
//! - Rows follow `HOUR_ORDER`: 1 AM first, midnight last.
//! - Parsing never fails; unparseable input maps to 1:00 (offset 0).
//! - Block heights never drop below the configured visible floor.

use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt::{Display, Formatter};

/// Display order of hour rows. Midnight is the last row.
pub const HOUR_ORDER: [u32; 24] = [
    1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16, 17, 18, 19, 20, 21, 22, 23, 0,
];

const MINUTES_PER_ROW: u32 = 60;

static CLOCK_TIME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(\d{1,2}):(\d{2})\s*([AaPp])\.?\s*[Mm]\.?\s*$").expect("valid clock regex")
});

/// Wall-clock time in 24-hour form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClockTime {
    pub hour: u32,
    pub minute: u32,
}

impl ClockTime {
    /// Value used when a time string cannot be parsed; sits at grid offset 0.
    pub const FALLBACK: ClockTime = ClockTime { hour: 1, minute: 0 };

    pub fn new(hour: u32, minute: u32) -> Self {
        Self { hour, minute }
    }

    /// Minutes from the top of the grid (`row * 60 + minute`).
    pub fn grid_minutes(self) -> u32 {
        (row_index_of(self.hour) as u32 * MINUTES_PER_ROW).saturating_add(self.minute)
    }

    pub fn grid_offset(self, row_height: f64) -> f64 {
        to_grid_offset(self.hour, self.minute, row_height)
    }
}

impl Display for ClockTime {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&format_clock_time(self.hour, self.minute))
    }
}

/// Vertical placement of a timed block.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridPosition {
    pub offset: f64,
    pub height: f64,
}

impl GridPosition {
    /// Places `start..end` on the grid, flooring the height at `minimum_height`.
    pub fn between(start: ClockTime, end: ClockTime, row_height: f64, minimum_height: f64) -> Self {
        let offset = start.grid_offset(row_height);
        let end_offset = end.grid_offset(row_height);
        Self {
            offset,
            height: interval_height(offset, end_offset, minimum_height),
        }
    }

    /// Bottom edge of the block.
    pub fn bottom(&self) -> f64 {
        self.offset + self.height
    }
}

/// Parses a strict 12-hour time such as `"10:30 AM"`.
///
/// Returns `None` for anything outside `1..=12` hours / `0..=59` minutes.
pub fn try_parse_clock_time(input: &str) -> Option<ClockTime> {
    let captures = CLOCK_TIME_RE.captures(input)?;
    let hour12: u32 = captures.get(1)?.as_str().parse().ok()?;
    let minute: u32 = captures.get(2)?.as_str().parse().ok()?;
    if !(1..=12).contains(&hour12) || minute > 59 {
        return None;
    }
    let is_pm = captures
        .get(3)
        .map(|meridiem| meridiem.as_str().eq_ignore_ascii_case("p"))?;

    let hour = match (hour12, is_pm) {
        (12, false) => 0,
        (12, true) => 12,
        (hour, true) => hour + 12,
        (hour, false) => hour,
    };
    Some(ClockTime { hour, minute })
}

/// Parses a 12-hour time, falling back to `ClockTime::FALLBACK` on bad input.
pub fn parse_clock_time(input: &str) -> ClockTime {
    try_parse_clock_time(input).unwrap_or_else(|| {
        log::debug!(
            "event=clock_parse module=mapper status=skip input_len={}",
            input.len()
        );
        ClockTime::FALLBACK
    })
}

/// Formats a 24-hour time as `h:mm AM`.
pub fn format_clock_time(hour24: u32, minute: u32) -> String {
    let hour24 = hour24 % 24;
    let (hour12, meridiem) = match hour24 {
        0 => (12, "AM"),
        1..=11 => (hour24, "AM"),
        12 => (12, "PM"),
        _ => (hour24 - 12, "PM"),
    };
    format!("{hour12}:{minute:02} {meridiem}")
}

/// Position of `hour24` within `HOUR_ORDER`; out-of-range hours map to row 0.
pub fn row_index_of(hour24: u32) -> usize {
    HOUR_ORDER
        .iter()
        .position(|hour| *hour == hour24)
        .unwrap_or(0)
}

/// Vertical offset of `hour24:minute` in layout units.
pub fn to_grid_offset(hour24: u32, minute: u32, row_height: f64) -> f64 {
    let minutes = (row_index_of(hour24) as u32 * MINUTES_PER_ROW) as f64 + f64::from(minute);
    minutes * row_height / f64::from(MINUTES_PER_ROW)
}

/// Height between two offsets, never below `minimum_visible_height`.
pub fn interval_height(start_offset: f64, end_offset: f64, minimum_visible_height: f64) -> f64 {
    (end_offset - start_offset).max(minimum_visible_height)
}

/// Row labels in display order, e.g. `("1 AM", 1)` ... `("12 AM", 0)`.
pub fn rows() -> impl Iterator<Item = (String, u32)> {
    HOUR_ORDER.into_iter().map(|hour| {
        let label = format_clock_time(hour, 0).replace(":00", "");
        (label, hour)
    })
}
