//! FFI use-case API for the Flutter week/day view.
//!
//! # Responsibility
//! - Expose day/week layout and the live time cursor to Dart via FRB.
//! - Convert string/primitive wire shapes into core types.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - One malformed event or holiday never fails the whole layout; it is
//!   skipped and counted in the response message.
//! - Dates cross the boundary as `YYYY-MM-DD` strings.
//! - Event ids are opaque to this layer and echoed back unchanged.

use chrono::NaiveDate;
use daygrid_core::{
    core_version as core_version_inner, format_clock_time, init_logging as init_logging_inner,
    ping as ping_inner, tick, DayAggregator, DayLayout, Event, EventId, GridConfig,
    HolidayEntry, LiveTimeCursor, Occurrence, Reminder, Repeat,
};
use flutter_rust_bridge::DartFnFuture;
use futures::executor::block_on;
use std::collections::HashMap;
use std::future::Future;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;
use uuid::Uuid;

const DATE_FORMAT: &str = "%Y-%m-%d";
const FORWARDER_THREAD_NAME: &str = "daygrid-cursor-forward";

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// Event snapshot as sent by the Dart CRUD layer.
#[derive(Debug, Clone, PartialEq)]
pub struct EventInput {
    /// Caller-owned id in any format; echoed back in layout items.
    pub id: String,
    pub title: String,
    pub description: String,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    /// 12-hour clock string, e.g. `10:30 AM`.
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub all_day: bool,
    /// `none|daily|weekly|monthly|yearly`; unknown values mean `none`.
    pub repeat: String,
    pub reminder_minutes: Vec<u32>,
    pub color: u32,
}

/// Holiday entry as fetched by the Dart holiday source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HolidayInput {
    pub date: String,
    pub name: String,
}

/// Item in the all-day lane.
#[derive(Debug, Clone, PartialEq)]
pub struct SpanningItem {
    /// `None` for holidays.
    pub event_id: Option<String>,
    pub title: String,
    pub is_holiday: bool,
    pub editable: bool,
    pub color: Option<u32>,
}

/// Visible timed block.
#[derive(Debug, Clone, PartialEq)]
pub struct TimedItem {
    pub event_id: String,
    pub title: String,
    pub group_index: u32,
    pub offset: f64,
    pub height: f64,
    pub column_index: u32,
    pub column_width: f64,
    pub hidden_count: u32,
    pub start_label: String,
    pub end_label: String,
    pub color: u32,
}

/// "+N more" marker for one overlap group.
#[derive(Debug, Clone, PartialEq)]
pub struct OverflowItem {
    pub group_index: u32,
    pub hidden_count: u32,
    pub top: f64,
}

/// Layout envelope for one date.
#[derive(Debug, Clone, PartialEq)]
pub struct DayLayoutResponse {
    pub ok: bool,
    pub date: String,
    pub spanning: Vec<SpanningItem>,
    pub timed: Vec<TimedItem>,
    pub overflow: Vec<OverflowItem>,
    /// Human-readable diagnostics (skipped records, bad input).
    pub message: String,
}

impl DayLayoutResponse {
    fn failure(date: String, message: impl Into<String>) -> Self {
        Self {
            ok: false,
            date,
            spanning: Vec::new(),
            timed: Vec::new(),
            overflow: Vec::new(),
            message: message.into(),
        }
    }
}

/// Lays out one date of the day view.
///
/// # FFI contract
/// - Sync call, pure computation.
/// - `row_height` overrides the default row height when positive.
/// - Never panics; invalid `date` returns `ok=false`.
#[flutter_rust_bridge::frb(sync)]
pub fn day_layout(
    date: String,
    events: Vec<EventInput>,
    holidays: Vec<HolidayInput>,
    row_height: Option<f64>,
) -> DayLayoutResponse {
    let Some(target) = parse_date(&date) else {
        return DayLayoutResponse::failure(date, "day_layout failed: date must be YYYY-MM-DD");
    };
    let aggregator = match build_aggregator(row_height) {
        Ok(aggregator) => aggregator,
        Err(message) => return DayLayoutResponse::failure(date, message),
    };
    let intake = Intake::from_inputs(events, holidays);
    let layout = aggregator.layout_day(target, &intake.events, &intake.holidays);
    to_response(&layout, &intake.ids, intake.message())
}

/// Lays out seven consecutive dates starting at `anchor_date`.
///
/// # FFI contract
/// - Sync call, pure computation.
/// - Invalid `anchor_date` returns a single `ok=false` envelope.
#[flutter_rust_bridge::frb(sync)]
pub fn week_layout(
    anchor_date: String,
    events: Vec<EventInput>,
    holidays: Vec<HolidayInput>,
    row_height: Option<f64>,
) -> Vec<DayLayoutResponse> {
    let Some(anchor) = parse_date(&anchor_date) else {
        return vec![DayLayoutResponse::failure(
            anchor_date,
            "week_layout failed: anchor_date must be YYYY-MM-DD",
        )];
    };
    let aggregator = match build_aggregator(row_height) {
        Ok(aggregator) => aggregator,
        Err(message) => return vec![DayLayoutResponse::failure(anchor_date, message)],
    };
    let intake = Intake::from_inputs(events, holidays);
    let message = intake.message();
    aggregator
        .layout_week(anchor, &intake.events, &intake.holidays)
        .iter()
        .map(|layout| to_response(layout, &intake.ids, message.clone()))
        .collect()
}

/// Current-time marker offset computed from the device clock.
///
/// An unusable `row_height` falls back to the default row height.
#[flutter_rust_bridge::frb(sync)]
pub fn now_offset(row_height: Option<f64>) -> f64 {
    tick(chrono::Local::now().time(), usable_config(row_height).row_height)
}

/// Owned live cursor handle; Dart disposes it with the view.
#[flutter_rust_bridge::frb(opaque)]
pub struct TimeCursorSession {
    cursor: LiveTimeCursor,
}

impl TimeCursorSession {
    /// Starts a ticking cursor refreshed every `tick_seconds`.
    ///
    /// `on_tick` receives the current offset once on start and then after
    /// every tick; Dart re-renders the marker from it.
    ///
    /// # FFI contract
    /// - Returns an error message when the ticker cannot start.
    /// - Callbacks are dispatched off the ticker thread, so `stop` never
    ///   waits on Dart.
    pub fn start(
        tick_seconds: u64,
        row_height: Option<f64>,
        on_tick: impl Fn(f64) -> DartFnFuture<()> + Send + Sync + 'static,
    ) -> Result<Self, String> {
        let config = config_for(row_height).with_tick_interval(Duration::from_secs(tick_seconds));
        forward_ticks(LiveTimeCursor::new(config), on_tick)
    }

    /// Latest offset maintained by the ticker.
    #[flutter_rust_bridge::frb(sync)]
    pub fn offset(&self) -> f64 {
        self.cursor.offset()
    }

    /// Stops the ticker. Returns empty string on success.
    #[flutter_rust_bridge::frb(sync)]
    pub fn stop(&mut self) -> String {
        match self.cursor.stop() {
            Ok(()) => String::new(),
            Err(err) => format!("time cursor stop failed: {err}"),
        }
    }
}

/// Starts `cursor` and relays every offset to `on_tick` on a forwarding thread.
///
/// The forwarder drains until the ticker drops its sender, so a slow or
/// unresponsive listener never blocks `stop`.
fn forward_ticks<F, Fut>(mut cursor: LiveTimeCursor, on_tick: F) -> Result<TimeCursorSession, String>
where
    F: Fn(f64) -> Fut + Send + 'static,
    Fut: Future<Output = ()> + 'static,
{
    let (tick_tx, tick_rx) = mpsc::channel::<f64>();
    thread::Builder::new()
        .name(FORWARDER_THREAD_NAME.to_string())
        .spawn(move || {
            for offset in tick_rx {
                block_on(on_tick(offset));
            }
            log::debug!("event=cursor_forward module=ffi status=closed");
        })
        .map_err(|err| format!("time cursor start failed: {err}"))?;

    // Receiver gone means the forwarder already exited.
    let _ = tick_tx.send(cursor.refresh());
    cursor
        .start(move |offset| {
            let _ = tick_tx.send(offset);
        })
        .map_err(|err| format!("time cursor start failed: {err}"))?;
    Ok(TimeCursorSession { cursor })
}

struct Intake {
    events: Vec<Event>,
    holidays: Vec<HolidayEntry>,
    /// Internal id -> caller id.
    ids: HashMap<EventId, String>,
    skipped_events: usize,
    skipped_holidays: usize,
}

impl Intake {
    fn from_inputs(events: Vec<EventInput>, holidays: Vec<HolidayInput>) -> Self {
        let total_events = events.len();
        let total_holidays = holidays.len();
        let mut ids = HashMap::with_capacity(total_events);
        let events = events
            .into_iter()
            .filter_map(to_event)
            .map(|(event, caller_id)| {
                ids.insert(event.id, caller_id);
                event
            })
            .collect::<Vec<_>>();
        let holidays = holidays
            .into_iter()
            .filter_map(to_holiday)
            .collect::<Vec<_>>();
        let intake = Self {
            skipped_events: total_events - events.len(),
            skipped_holidays: total_holidays - holidays.len(),
            events,
            holidays,
            ids,
        };
        if intake.skipped_events > 0 || intake.skipped_holidays > 0 {
            log::warn!(
                "event=layout_intake module=ffi status=skip events={} holidays={}",
                intake.skipped_events,
                intake.skipped_holidays
            );
        }
        intake
    }

    fn message(&self) -> String {
        if self.skipped_events == 0 && self.skipped_holidays == 0 {
            return "ok".to_string();
        }
        format!(
            "skipped {} malformed event(s) and {} malformed holiday(s)",
            self.skipped_events, self.skipped_holidays
        )
    }
}

/// Converts one wire event; `None` when a supplied date cannot be parsed.
fn to_event(input: EventInput) -> Option<(Event, String)> {
    let start_date = parse_optional_date(input.start_date.as_deref())?;
    let end_date = parse_optional_date(input.end_date.as_deref())?;
    // Caller ids are opaque; a UUID-shaped id is reused, anything else gets a fresh one.
    let id = Uuid::parse_str(input.id.trim()).unwrap_or_else(|_| Uuid::new_v4());
    let mut event = Event::with_id(id, input.title)
        .with_description(input.description)
        .with_repeat(Repeat::parse_lenient(&input.repeat))
        .with_color(input.color);
    event.start_date = start_date;
    event.end_date = end_date;
    event.start_time = input.start_time;
    event.end_time = input.end_time;
    event.all_day = input.all_day;
    event.reminders = input
        .reminder_minutes
        .into_iter()
        .map(Reminder::minutes_before)
        .collect();
    Some((event, input.id))
}

fn to_holiday(input: HolidayInput) -> Option<HolidayEntry> {
    Some(HolidayEntry::new(parse_date(&input.date)?, input.name))
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).ok()
}

/// Absent or blank means no date; anything else must parse.
fn parse_optional_date(value: Option<&str>) -> Option<Option<NaiveDate>> {
    match value.map(str::trim) {
        None | Some("") => Some(None),
        Some(text) => parse_date(text).map(Some),
    }
}

fn config_for(row_height: Option<f64>) -> GridConfig {
    match row_height {
        Some(value) => GridConfig::default().with_row_height(value),
        None => GridConfig::default(),
    }
}

fn usable_config(row_height: Option<f64>) -> GridConfig {
    let config = config_for(row_height);
    match config.validate() {
        Ok(()) => config,
        Err(err) => {
            log::debug!("event=now_offset module=ffi status=fallback error={err}");
            GridConfig::default()
        }
    }
}

fn build_aggregator(row_height: Option<f64>) -> Result<DayAggregator, String> {
    let config = config_for(row_height);
    config
        .validate()
        .map_err(|err| format!("layout config rejected: {err}"))?;
    Ok(DayAggregator::new(config))
}

fn caller_id(ids: &HashMap<EventId, String>, event: &Event) -> String {
    ids.get(&event.id)
        .cloned()
        .unwrap_or_else(|| event.id.to_string())
}

fn to_response(
    layout: &DayLayout<'_>,
    ids: &HashMap<EventId, String>,
    message: String,
) -> DayLayoutResponse {
    let spanning = layout
        .spanning
        .iter()
        .map(|occurrence| to_spanning_item(occurrence, ids))
        .collect();
    let mut timed = Vec::new();
    let mut overflow = Vec::new();

    for (group_index, group) in layout.groups.iter().enumerate() {
        let group_index = group_index as u32;
        let group_layout = group.layout();
        for placement in &group_layout.placements {
            let item = &placement.occurrence;
            let Some(event) = item.occurrence.event() else {
                continue;
            };
            timed.push(TimedItem {
                event_id: caller_id(ids, event),
                title: event.title.clone(),
                group_index,
                offset: item.position.offset,
                height: item.position.height,
                column_index: placement.column_index as u32,
                column_width: placement.column_width,
                hidden_count: placement.hidden_count as u32,
                start_label: format_clock_time(item.start.hour, item.start.minute),
                end_label: format_clock_time(item.end.hour, item.end.minute),
                color: event.color,
            });
        }
        if let Some(marker) = group_layout.overflow {
            overflow.push(OverflowItem {
                group_index,
                hidden_count: marker.hidden_count as u32,
                top: marker.top,
            });
        }
    }

    DayLayoutResponse {
        ok: true,
        date: layout.date.format(DATE_FORMAT).to_string(),
        spanning,
        timed,
        overflow,
        message,
    }
}

fn to_spanning_item(occurrence: &Occurrence<'_>, ids: &HashMap<EventId, String>) -> SpanningItem {
    let event = occurrence.event();
    SpanningItem {
        event_id: event.map(|event| caller_id(ids, event)),
        title: occurrence.title().to_string(),
        is_holiday: occurrence.is_holiday(),
        editable: occurrence.editable(),
        color: event.map(|event| event.color),
    }
}
