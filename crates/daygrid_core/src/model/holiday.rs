//! Holiday entries supplied by the external holiday source.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One pre-fetched, deduplicated holiday for a single date.
///
/// Read-only for the core: projected into the all-day lane, never edited.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HolidayEntry {
    pub date: NaiveDate,
    pub name: String,
}

impl HolidayEntry {
    pub fn new(date: NaiveDate, name: impl Into<String>) -> Self {
        Self {
            date,
            name: name.into(),
        }
    }

    pub fn falls_on(&self, date: NaiveDate) -> bool {
        self.date == date
    }
}
