//! Read-only calendar records consumed by the grid core.
//!
//! # Responsibility
//! - Define the event snapshot shape handed over by the CRUD layer.
//! - Define the external holiday entry shape.
//! - Define the per-pass `Occurrence` view shared by resolver and layout.
//!
//! # Invariants
//! - Core code never mutates `Event` or `HolidayEntry` values it receives.
//! - `Occurrence` borrows its source and lives for one resolution pass only.

pub mod event;
pub mod holiday;
pub mod occurrence;
