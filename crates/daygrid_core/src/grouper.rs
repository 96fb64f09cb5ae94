//! Overlap grouping and column assignment for one date's timed lane.
//!
//! # Responsibility
//! - Cluster timed occurrences into overlap groups.
//! - Assign at most two visible columns per group plus an overflow marker.
//!
//! # Invariants
//! - Members are ordered by start minute; ties keep input order.
//! - An occurrence joins the first group (creation order) holding any member
//!   it overlaps. Groups are chain closures, so two members may share a group
//!   without overlapping each other directly.
//! - Only the first two members are placed; the rest are counted in
//!   `hidden_count` and surfaced through one overflow marker.

use crate::aggregator::TimedOccurrence;

/// Members laid out side by side before overflow kicks in.
pub const MAX_VISIBLE_COLUMNS: usize = 2;

/// One visible member with its column slot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnPlacement<'a> {
    pub occurrence: TimedOccurrence<'a>,
    pub column_index: usize,
    /// Fraction of the day column width: `1.0` alone, `0.5` side by side.
    pub column_width: f64,
    /// Members of the same group not rendered individually.
    pub hidden_count: usize,
}

/// "+N more" marker placed under the second visible member.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverflowMarker {
    pub hidden_count: usize,
    /// Grid offset of the second visible member's bottom edge.
    pub top: f64,
}

/// Column layout for one overlap group.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupLayout<'a> {
    pub placements: Vec<ColumnPlacement<'a>>,
    pub overflow: Option<OverflowMarker>,
}

/// Transitive cluster of overlapping timed occurrences.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlapGroup<'a> {
    members: Vec<TimedOccurrence<'a>>,
}

impl<'a> OverlapGroup<'a> {
    fn seeded(first: TimedOccurrence<'a>) -> Self {
        Self {
            members: vec![first],
        }
    }

    fn touches(&self, candidate: &TimedOccurrence<'_>) -> bool {
        self.members.iter().any(|member| member.overlaps(candidate))
    }

    /// All members in sorted order, including hidden ones.
    pub fn members(&self) -> &[TimedOccurrence<'a>] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn visible_members(&self) -> &[TimedOccurrence<'a>] {
        &self.members[..self.members.len().min(MAX_VISIBLE_COLUMNS)]
    }

    pub fn hidden_members(&self) -> &[TimedOccurrence<'a>] {
        &self.members[self.members.len().min(MAX_VISIBLE_COLUMNS)..]
    }

    pub fn hidden_count(&self) -> usize {
        self.members.len().saturating_sub(MAX_VISIBLE_COLUMNS)
    }

    /// Visible members with their column index, width and group hidden count.
    pub fn placements(&self) -> Vec<ColumnPlacement<'a>> {
        let visible = self.visible_members();
        let column_width = 1.0 / visible.len().max(1) as f64;
        let hidden_count = self.hidden_count();
        visible
            .iter()
            .enumerate()
            .map(|(column_index, occurrence)| ColumnPlacement {
                occurrence: *occurrence,
                column_index,
                column_width,
                hidden_count,
            })
            .collect()
    }

    /// Overflow marker when more than two members exist.
    pub fn overflow(&self) -> Option<OverflowMarker> {
        let hidden_count = self.hidden_count();
        if hidden_count == 0 {
            return None;
        }
        let anchor = self.visible_members().last()?;
        Some(OverflowMarker {
            hidden_count,
            top: anchor.position.bottom(),
        })
    }

    pub fn layout(&self) -> GroupLayout<'a> {
        GroupLayout {
            placements: self.placements(),
            overflow: self.overflow(),
        }
    }
}

/// Clusters `timed` into overlap groups using greedy first-fit closure.
pub fn group_overlaps<'a>(timed: &[TimedOccurrence<'a>]) -> Vec<OverlapGroup<'a>> {
    let mut sorted = timed.to_vec();
    // `sort_by_key` is stable, so equal starts keep input order.
    sorted.sort_by_key(|occurrence| occurrence.start_minute());

    let mut groups: Vec<OverlapGroup<'a>> = Vec::new();
    for occurrence in sorted {
        match groups.iter_mut().find(|group| group.touches(&occurrence)) {
            Some(group) => group.members.push(occurrence),
            None => groups.push(OverlapGroup::seeded(occurrence)),
        }
    }

    log::trace!(
        "event=group_overlaps module=grouper status=ok timed={} groups={}",
        timed.len(),
        groups.len()
    );
    groups
}
