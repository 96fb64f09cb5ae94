//! Flutter-facing bindings for the day grid core.

pub mod api;
