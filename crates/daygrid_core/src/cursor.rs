//! Live "now" marker for the day grid.
//!
//! # Responsibility
//! - Compute the current-time grid offset with a pure `tick` function.
//! - Own a background ticker that refreshes the offset on a fixed interval.
//!
//! # Invariants
//! - The cursor is either `Idle` (no worker, offset stale) or `Ticking`.
//! - The ticker is owned by the `LiveTimeCursor` handle; dropping the handle
//!   stops it, so no ticker outlives its view.
//! - Nothing is persisted; a new process starts from the live clock.

use crate::config::{ConfigError, GridConfig};
use crate::mapper::to_grid_offset;
use chrono::{Local, NaiveTime, Timelike};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};

const WORKER_THREAD_NAME: &str = "daygrid-time-cursor";

/// Source of the current wall-clock time.
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveTime;
}

/// Local system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveTime {
        Local::now().time()
    }
}

/// Grid offset for `now` at minute precision.
pub fn tick(now: NaiveTime, row_height: f64) -> f64 {
    to_grid_offset(now.hour(), now.minute(), row_height)
}

/// Lifecycle state of a `LiveTimeCursor`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorState {
    Idle,
    Ticking,
}

/// Timer lifecycle errors surfaced to the view owner.
#[derive(Debug)]
pub enum CursorError {
    AlreadyRunning,
    NotRunning,
    InvalidConfig(ConfigError),
    SpawnFailed(std::io::Error),
    WorkerPanicked,
}

impl Display for CursorError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AlreadyRunning => write!(f, "time cursor is already ticking"),
            Self::NotRunning => write!(f, "time cursor is not ticking"),
            Self::InvalidConfig(err) => write!(f, "invalid time cursor config: {err}"),
            Self::SpawnFailed(err) => write!(f, "failed to start time cursor ticker: {err}"),
            Self::WorkerPanicked => write!(f, "time cursor ticker panicked"),
        }
    }
}

impl Error for CursorError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidConfig(err) => Some(err),
            Self::SpawnFailed(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ConfigError> for CursorError {
    fn from(value: ConfigError) -> Self {
        Self::InvalidConfig(value)
    }
}

struct Ticker {
    stop_tx: Sender<()>,
    join_handle: JoinHandle<()>,
}

/// Owned handle for the live time cursor.
pub struct LiveTimeCursor {
    config: GridConfig,
    clock: Arc<dyn Clock>,
    offset: Arc<Mutex<f64>>,
    ticker: Option<Ticker>,
}

impl LiveTimeCursor {
    /// Creates an idle cursor backed by the local system clock.
    pub fn new(config: GridConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Creates an idle cursor backed by `clock`.
    pub fn with_clock(config: GridConfig, clock: Arc<dyn Clock>) -> Self {
        let offset = tick(clock.now(), config.row_height);
        Self {
            config,
            clock,
            offset: Arc::new(Mutex::new(offset)),
            ticker: None,
        }
    }

    pub fn state(&self) -> CursorState {
        if self.ticker.is_some() {
            CursorState::Ticking
        } else {
            CursorState::Idle
        }
    }

    /// Last computed offset. Stale while `Idle`.
    pub fn offset(&self) -> f64 {
        *self.offset.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Recomputes the offset from the clock immediately.
    pub fn refresh(&self) -> f64 {
        let value = tick(self.clock.now(), self.config.row_height);
        store_offset(&self.offset, value);
        value
    }

    /// Transitions `Idle -> Ticking`.
    ///
    /// The offset is refreshed right away; afterwards `on_tick` runs on the
    /// ticker thread with every recomputed offset.
    ///
    /// # Errors
    /// - `AlreadyRunning` when a ticker is active.
    /// - `InvalidConfig` when row height or tick interval are unusable.
    /// - `SpawnFailed` when the ticker thread cannot be created.
    pub fn start<F>(&mut self, on_tick: F) -> Result<(), CursorError>
    where
        F: Fn(f64) + Send + 'static,
    {
        if self.ticker.is_some() {
            return Err(CursorError::AlreadyRunning);
        }
        self.config.validate()?;
        self.refresh();

        let (stop_tx, stop_rx) = mpsc::channel::<()>();
        let clock = Arc::clone(&self.clock);
        let offset = Arc::clone(&self.offset);
        let interval = self.config.tick_interval;
        let row_height = self.config.row_height;

        let join_handle = thread::Builder::new()
            .name(WORKER_THREAD_NAME.to_string())
            .spawn(move || loop {
                match stop_rx.recv_timeout(interval) {
                    Err(RecvTimeoutError::Timeout) => {
                        let value = tick(clock.now(), row_height);
                        store_offset(&offset, value);
                        on_tick(value);
                    }
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                }
            })
            .map_err(CursorError::SpawnFailed)?;

        self.ticker = Some(Ticker {
            stop_tx,
            join_handle,
        });
        log::info!(
            "event=cursor_start module=cursor status=ok interval_ms={}",
            interval.as_millis()
        );
        Ok(())
    }

    /// Transitions `Ticking -> Idle` and waits for the ticker to exit.
    ///
    /// # Errors
    /// - `NotRunning` when the cursor is idle.
    /// - `WorkerPanicked` when the tick callback panicked.
    pub fn stop(&mut self) -> Result<(), CursorError> {
        let ticker = self.ticker.take().ok_or(CursorError::NotRunning)?;
        // A send error means the worker already exited; join reports why.
        let _ = ticker.stop_tx.send(());
        match ticker.join_handle.join() {
            Ok(()) => {
                log::info!("event=cursor_stop module=cursor status=ok");
                Ok(())
            }
            Err(_) => {
                log::error!("event=cursor_stop module=cursor status=error reason=worker_panicked");
                Err(CursorError::WorkerPanicked)
            }
        }
    }
}

impl Drop for LiveTimeCursor {
    fn drop(&mut self) {
        if self.ticker.is_some() {
            if let Err(err) = self.stop() {
                log::warn!("event=cursor_drop module=cursor status=error error={err}");
            }
        }
    }
}

fn store_offset(slot: &Mutex<f64>, value: f64) {
    *slot.lock().unwrap_or_else(PoisonError::into_inner) = value;
}

#[cfg(test)]
mod tests {
    use super::{tick, CursorState, LiveTimeCursor};
    use crate::config::GridConfig;
    use chrono::NaiveTime;

    #[test]
    fn tick_maps_through_hour_order() {
        let one_am = NaiveTime::from_hms_opt(1, 0, 0).unwrap();
        let midnight = NaiveTime::from_hms_opt(0, 0, 0).unwrap();
        assert_eq!(tick(one_am, 60.0), 0.0);
        assert_eq!(tick(midnight, 60.0), 23.0 * 60.0);
    }

    #[test]
    fn tick_ignores_seconds() {
        let a = NaiveTime::from_hms_opt(14, 5, 0).unwrap();
        let b = NaiveTime::from_hms_opt(14, 5, 59).unwrap();
        assert_eq!(tick(a, 60.0), tick(b, 60.0));
    }

    #[test]
    fn new_cursor_is_idle() {
        let cursor = LiveTimeCursor::new(GridConfig::default());
        assert_eq!(cursor.state(), CursorState::Idle);
    }
}
