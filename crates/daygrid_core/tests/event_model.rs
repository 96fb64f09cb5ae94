use chrono::NaiveDate;
use daygrid_core::{Event, EventValidationError, Reminder, Repeat};
use uuid::Uuid;

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn event_new_sets_defaults() {
    let event = Event::new("Dentist");

    assert!(!event.id.is_nil());
    assert_eq!(event.title, "Dentist");
    assert_eq!(event.repeat, Repeat::None);
    assert_eq!(event.start_date, None);
    assert!(!event.all_day);
    assert!(event.reminders.is_empty());
    assert!(!event.is_schedulable());
}

#[test]
fn event_serialization_uses_expected_wire_fields() {
    let id = Uuid::parse_str("11111111-2222-4333-8444-555555555555").unwrap();
    let mut event = Event::with_id(id, "Sprint review")
        .with_repeat(Repeat::Weekly)
        .with_description("Demo + retro")
        .with_reminder(Reminder::minutes_before(10))
        .with_reminder(Reminder::minutes_before(60))
        .with_color(0xFF4C_AF50);
    event.start_date = Some(day(2025, 3, 7));
    event.end_date = Some(day(2025, 3, 7));
    event.start_time = Some("3:00 PM".to_string());
    event.end_time = Some("4:00 PM".to_string());

    let json = serde_json::to_value(&event).unwrap();
    assert_eq!(json["id"], id.to_string());
    assert_eq!(json["repeat"], "weekly");
    assert_eq!(json["start_date"], "2025-03-07");
    assert_eq!(json["start_time"], "3:00 PM");
    assert_eq!(json["all_day"], false);
    assert_eq!(json["reminders"][0]["minutes_before"], 10);
    assert_eq!(json["reminders"][1]["minutes_before"], 60);

    let decoded: Event = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, event);
}

#[test]
fn sparse_wire_records_decode_with_defaults() {
    let event: Event = serde_json::from_value(serde_json::json!({
        "id": "11111111-2222-4333-8444-555555555555",
        "title": "Imported"
    }))
    .unwrap();

    assert_eq!(event.repeat, Repeat::None);
    assert!(!event.is_schedulable());
    assert!(event.description.is_empty());
}

#[test]
fn validate_rejects_reversed_date_range() {
    let event = Event::spanning("Backwards", day(2025, 5, 10), day(2025, 5, 1));

    assert_eq!(
        event.validate().unwrap_err(),
        EventValidationError::InvalidDateRange {
            start: day(2025, 5, 10),
            end: day(2025, 5, 1),
        }
    );
    assert!(event
        .validate()
        .unwrap_err()
        .to_string()
        .contains("end_date (2025-05-01) must be >= start_date (2025-05-10)"));
}

#[test]
fn validate_rejects_nil_id_and_blank_title() {
    assert_eq!(
        Event::with_id(Uuid::nil(), "x").validate().unwrap_err(),
        EventValidationError::NilId
    );
    assert_eq!(
        Event::new("   ").validate().unwrap_err(),
        EventValidationError::BlankTitle
    );
    assert!(Event::all_day_on("Fine", day(2025, 1, 1)).validate().is_ok());
}
