use chrono::{DateTime, Duration, Local};
use std::cell::Cell;
use std::rc::Rc;

/// Source of wall-clock time for the timing engine
pub trait Clock {
    fn now(&self) -> DateTime<Local>;
}

/// The real local clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// A clock that only moves when told to
///
/// Clones share the same instant, so a test can keep a handle while the store
/// owns another.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Rc<Cell<DateTime<Local>>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Local>) -> Self {
        Self {
            now: Rc::new(Cell::new(start)),
        }
    }

    pub fn set(&self, at: DateTime<Local>) {
        self.now.set(at);
    }

    /// Move forward by a (possibly fractional) number of seconds
    pub fn advance(&self, seconds: f64) {
        let millis = (seconds * 1000.0).round() as i64;
        self.now.set(self.now.get() + Duration::milliseconds(millis));
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new(Local::now())
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Local> {
        self.now.get()
    }
}

/// Seconds from `start` to `end`, clamped at zero
pub fn seconds_between(start: DateTime<Local>, end: DateTime<Local>) -> f64 {
    let millis = end.signed_duration_since(start).num_milliseconds();
    (millis.max(0) as f64) / 1000.0
}
