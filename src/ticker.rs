use std::time::Duration;

/// Interval at which live elapsed values are redrawn
pub const DISPLAY_TICK_MS: u64 = 1000;

/// Interval of the seconds-colon blink while a task runs
pub const BLINK_TICK_MS: u64 = 500;

pub fn display_tick() -> Duration {
    Duration::from_millis(DISPLAY_TICK_MS)
}

pub fn blink_tick() -> Duration {
    Duration::from_millis(BLINK_TICK_MS)
}

/// Colon visibility for the running task's elapsed display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Blink {
    show_colons: bool,
}

impl Default for Blink {
    fn default() -> Self {
        Self { show_colons: true }
    }
}

impl Blink {
    pub fn show_colons(&self) -> bool {
        self.show_colons
    }

    /// Advance one blink tick; colons stay lit while nothing runs
    pub fn tick(&mut self, has_active: bool) -> bool {
        self.show_colons = if has_active { !self.show_colons } else { true };
        self.show_colons
    }
}
