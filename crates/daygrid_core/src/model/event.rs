//! Event snapshot model.
//!
//! # Responsibility
//! - Define the event record owned by the CRUD collaborator.
//! - Provide classification helpers used by resolver and aggregator.
//!
//! # Invariants
//! - `id` is stable and never reused for another event.
//! - `end_date` should not be earlier than `start_date` when both are set.
//! - An event without both dates is not schedulable and never resolves.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for an event record.
pub type EventId = Uuid;

/// Default ARGB color used when the host does not pick one.
pub const DEFAULT_EVENT_COLOR: u32 = 0xFF21_96F3;

/// Recurrence rule attached to an event.
///
/// Wire values are `none|daily|weekly|monthly|yearly`. Unknown values decode
/// to `Repeat::None` so newer rule types never break older cores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", from = "String")]
pub enum Repeat {
    /// Single occurrence covering `start_date..=end_date`.
    #[default]
    None,
    Daily,
    /// Same weekday as `start_date`.
    Weekly,
    /// Same day-of-month as `start_date`.
    Monthly,
    /// Same day and month as `start_date`.
    Yearly,
}

impl Repeat {
    /// Stable wire string.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
        }
    }

    /// Parses a wire value, falling back to `Repeat::None` for anything unknown.
    pub fn parse_lenient(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "daily" => Self::Daily,
            "weekly" => Self::Weekly,
            "monthly" => Self::Monthly,
            "yearly" => Self::Yearly,
            "none" | "" => Self::None,
            other => {
                log::debug!("event=repeat_parse module=model status=skip value={other}");
                Self::None
            }
        }
    }

    pub fn is_recurring(self) -> bool {
        self != Self::None
    }
}

impl From<String> for Repeat {
    fn from(value: String) -> Self {
        Self::parse_lenient(value.as_str())
    }
}

impl From<&str> for Repeat {
    fn from(value: &str) -> Self {
        Self::parse_lenient(value)
    }
}

/// One reminder attached to an event, relative to its start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Reminder {
    pub minutes_before: u32,
}

impl Reminder {
    pub fn minutes_before(minutes: u32) -> Self {
        Self {
            minutes_before: minutes,
        }
    }
}

/// Calendar event snapshot.
///
/// Time fields hold 12-hour clock strings such as `"10:30 AM"` and are only
/// meaningful when `all_day` is false.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Missing dates mark the event as not yet schedulable.
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub end_time: Option<String>,
    #[serde(default)]
    pub all_day: bool,
    #[serde(default)]
    pub repeat: Repeat,
    /// Kept in the order the user entered them.
    #[serde(default)]
    pub reminders: Vec<Reminder>,
    #[serde(default = "default_color")]
    pub color: u32,
}

fn default_color() -> u32 {
    DEFAULT_EVENT_COLOR
}

impl Event {
    /// Creates an unscheduled event with a generated stable ID.
    pub fn new(title: impl Into<String>) -> Self {
        Self::with_id(Uuid::new_v4(), title)
    }

    /// Creates an unscheduled event with a caller-provided stable ID.
    ///
    /// Used by sync/import paths where identity already exists externally.
    pub fn with_id(id: EventId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            description: String::new(),
            start_date: None,
            end_date: None,
            start_time: None,
            end_time: None,
            all_day: false,
            repeat: Repeat::None,
            reminders: Vec::new(),
            color: DEFAULT_EVENT_COLOR,
        }
    }

    /// Single-day timed event, e.g. `timed("Standup", day, "9:00 AM", "9:15 AM")`.
    pub fn timed(
        title: impl Into<String>,
        date: NaiveDate,
        start_time: impl Into<String>,
        end_time: impl Into<String>,
    ) -> Self {
        let mut event = Self::new(title);
        event.start_date = Some(date);
        event.end_date = Some(date);
        event.start_time = Some(start_time.into());
        event.end_time = Some(end_time.into());
        event
    }

    /// Single-day all-day event.
    pub fn all_day_on(title: impl Into<String>, date: NaiveDate) -> Self {
        let mut event = Self::new(title);
        event.start_date = Some(date);
        event.end_date = Some(date);
        event.all_day = true;
        event
    }

    /// Event covering `start..=end` without time fields.
    pub fn spanning(title: impl Into<String>, start: NaiveDate, end: NaiveDate) -> Self {
        let mut event = Self::new(title);
        event.start_date = Some(start);
        event.end_date = Some(end);
        event
    }

    pub fn with_repeat(mut self, repeat: Repeat) -> Self {
        self.repeat = repeat;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_reminder(mut self, reminder: Reminder) -> Self {
        self.reminders.push(reminder);
        self
    }

    pub fn with_color(mut self, color: u32) -> Self {
        self.color = color;
        self
    }

    /// Returns `(start_date, end_date)` when both are present.
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        Some((self.start_date?, self.end_date?))
    }

    pub fn is_schedulable(&self) -> bool {
        self.date_range().is_some()
    }

    pub fn is_multi_day(&self) -> bool {
        matches!(self.date_range(), Some((start, end)) if start != end)
    }

    /// Whether the event belongs to the all-day lane rather than the time grid.
    pub fn is_spanning(&self) -> bool {
        self.all_day || self.is_multi_day()
    }

    /// Validates intake invariants for the CRUD boundary.
    ///
    /// Resolution never calls this; malformed records degrade to empty
    /// results there instead.
    pub fn validate(&self) -> Result<(), EventValidationError> {
        if self.id.is_nil() {
            return Err(EventValidationError::NilId);
        }
        if self.title.trim().is_empty() {
            return Err(EventValidationError::BlankTitle);
        }
        if let Some((start, end)) = self.date_range() {
            if end < start {
                return Err(EventValidationError::InvalidDateRange { start, end });
            }
        }
        Ok(())
    }
}

/// Validation errors for event intake.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventValidationError {
    NilId,
    BlankTitle,
    InvalidDateRange { start: NaiveDate, end: NaiveDate },
}

impl Display for EventValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NilId => write!(f, "event id must not be nil"),
            Self::BlankTitle => write!(f, "event title must not be blank"),
            Self::InvalidDateRange { start, end } => {
                write!(f, "end_date ({end}) must be >= start_date ({start})")
            }
        }
    }
}

impl Error for EventValidationError {}
