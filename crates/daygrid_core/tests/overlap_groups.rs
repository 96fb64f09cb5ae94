use chrono::NaiveDate;
use daygrid_core::{group_overlaps, DayAggregator, Event, OverlapGroup, TimedOccurrence};

fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 7, 1).unwrap()
}

fn timed_lane(events: &[Event]) -> Vec<TimedOccurrence<'_>> {
    DayAggregator::default().for_date(day(), events, &[]).timed
}

fn titles<'a>(group: &OverlapGroup<'a>) -> Vec<&'a str> {
    group
        .members()
        .iter()
        .map(|member| member.occurrence.title())
        .collect()
}

#[test]
fn chained_overlaps_form_one_group_with_overflow() {
    let events = vec![
        Event::timed("A", day(), "9:00 AM", "10:00 AM"),
        Event::timed("B", day(), "9:30 AM", "11:00 AM"),
        Event::timed("C", day(), "10:30 AM", "11:30 AM"),
    ];
    let lane = timed_lane(&events);
    let groups = group_overlaps(&lane);

    assert_eq!(groups.len(), 1);
    let group = &groups[0];
    assert_eq!(titles(group), vec!["A", "B", "C"]);
    // A and C do not overlap directly; the chain through B still joins them.
    assert!(!group.members()[0].overlaps(&group.members()[2]));

    let layout = group.layout();
    assert_eq!(layout.placements.len(), 2);
    assert_eq!(layout.placements[0].occurrence.occurrence.title(), "A");
    assert_eq!(layout.placements[0].column_index, 0);
    assert_eq!(layout.placements[1].occurrence.occurrence.title(), "B");
    assert_eq!(layout.placements[1].column_index, 1);
    for placement in &layout.placements {
        assert_eq!(placement.column_width, 0.5);
        assert_eq!(placement.hidden_count, 1);
    }

    assert_eq!(group.hidden_members().len(), 1);
    assert_eq!(group.hidden_members()[0].occurrence.title(), "C");

    let overflow = layout.overflow.expect("third member should overflow");
    assert_eq!(overflow.hidden_count, 1);
    // Bottom of B: 11:00 AM sits in row 10 at 60 units per row.
    assert_eq!(overflow.top, 11.0 * 60.0);
}

#[test]
fn sorting_happens_before_grouping() {
    let events = vec![
        Event::timed("Late", day(), "10:30 AM", "11:30 AM"),
        Event::timed("Early", day(), "9:00 AM", "10:00 AM"),
        Event::timed("Bridge", day(), "9:30 AM", "11:00 AM"),
    ];
    let lane = timed_lane(&events);
    let groups = group_overlaps(&lane);

    assert_eq!(groups.len(), 1);
    assert_eq!(titles(&groups[0]), vec!["Early", "Bridge", "Late"]);
}

#[test]
fn first_matching_group_wins() {
    let events = vec![
        Event::timed("Morning", day(), "8:00 AM", "9:00 AM"),
        Event::timed("Noon", day(), "12:00 PM", "1:00 PM"),
        Event::timed("Overlaps noon", day(), "12:30 PM", "2:00 PM"),
        Event::timed("Evening", day(), "6:00 PM", "7:00 PM"),
    ];
    let lane = timed_lane(&events);
    let groups = group_overlaps(&lane);

    assert_eq!(groups.len(), 3);
    assert_eq!(titles(&groups[0]), vec!["Morning"]);
    assert_eq!(titles(&groups[1]), vec!["Noon", "Overlaps noon"]);
    assert_eq!(titles(&groups[2]), vec!["Evening"]);
    assert!(groups[1].overflow().is_none());
    assert!(groups[1]
        .placements()
        .iter()
        .all(|placement| placement.hidden_count == 0));
}

#[test]
fn members_of_different_groups_never_intersect() {
    let events = vec![
        Event::timed("1", day(), "1:00 AM", "2:30 AM"),
        Event::timed("2", day(), "2:00 AM", "3:00 AM"),
        Event::timed("3", day(), "3:00 AM", "4:00 AM"),
        Event::timed("4", day(), "3:15 AM", "3:45 AM"),
        Event::timed("5", day(), "3:50 AM", "5:00 AM"),
        Event::timed("6", day(), "7:00 AM", "8:00 AM"),
        Event::timed("7", day(), "11:00 PM", "12:00 AM"),
        Event::timed("8", day(), "12:00 AM", "12:30 AM"),
    ];
    let lane = timed_lane(&events);
    let groups = group_overlaps(&lane);

    let total = groups.iter().map(OverlapGroup::len).sum::<usize>();
    assert_eq!(total, events.len());

    for (i, left) in groups.iter().enumerate() {
        for right in groups.iter().skip(i + 1) {
            for a in left.members() {
                for b in right.members() {
                    assert!(
                        !a.overlaps(b),
                        "{} and {} intersect across groups",
                        a.occurrence.title(),
                        b.occurrence.title()
                    );
                }
            }
        }
    }
}

#[test]
fn large_group_reports_total_hidden_count() {
    let events = (0..5)
        .map(|i| Event::timed(format!("E{i}"), day(), "9:00 AM", "10:00 AM"))
        .collect::<Vec<_>>();
    let lane = timed_lane(&events);
    let groups = group_overlaps(&lane);

    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].hidden_count(), 3);
    assert_eq!(groups[0].overflow().map(|marker| marker.hidden_count), Some(3));
}

#[test]
fn day_layout_groups_timed_lane() {
    let events = vec![
        Event::timed("A", day(), "9:00 AM", "10:00 AM"),
        Event::timed("B", day(), "9:30 AM", "10:30 AM"),
        Event::all_day_on("Holiday prep", day()),
    ];
    let layout = DayAggregator::default().layout_day(day(), &events, &[]);

    assert_eq!(layout.spanning.len(), 1);
    assert_eq!(layout.groups.len(), 1);
    assert_eq!(layout.groups[0].len(), 2);
}
