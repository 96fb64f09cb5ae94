//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `daygrid_core` linkage.
//! - Print a deterministic sample day layout for quick sanity checks.

use chrono::NaiveDate;
use daygrid_core::{DayAggregator, Event, HolidayEntry};

fn main() {
    println!("daygrid_core ping={}", daygrid_core::ping());
    println!("daygrid_core version={}", daygrid_core::core_version());

    let Some(date) = NaiveDate::from_ymd_opt(2025, 1, 26) else {
        return;
    };
    let events = vec![
        Event::timed("A", date, "9:00 AM", "10:00 AM"),
        Event::timed("B", date, "9:30 AM", "11:00 AM"),
        Event::timed("C", date, "10:30 AM", "11:30 AM"),
        Event::all_day_on("Parade", date),
    ];
    let holidays = vec![HolidayEntry::new(date, "Republic Day")];

    let layout = DayAggregator::default().layout_day(date, &events, &holidays);
    println!("date={}", layout.date);
    for occurrence in &layout.spanning {
        println!(
            "spanning title={} holiday={} editable={}",
            occurrence.title(),
            occurrence.is_holiday(),
            occurrence.editable()
        );
    }
    for (index, group) in layout.groups.iter().enumerate() {
        let group_layout = group.layout();
        for placement in &group_layout.placements {
            println!(
                "group={index} title={} column={} width={} offset={} height={}",
                placement.occurrence.occurrence.title(),
                placement.column_index,
                placement.column_width,
                placement.occurrence.position.offset,
                placement.occurrence.position.height
            );
        }
        if let Some(marker) = group_layout.overflow {
            println!("group={index} more={} top={}", marker.hidden_count, marker.top);
        }
    }
}
