use std::time::Duration;

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum TimerState {
    Idle,
    Running,
    Paused,
}

/// Countdown timer for the Tools view.
///
/// Frame-driven: the caller measures elapsed wall time and feeds it to
/// [`CountdownTimer::advance`]. In interval mode the timer reloads its full
/// duration on expiry and keeps running, giving a repeating chime.
#[derive(Debug)]
pub struct CountdownTimer {
    total: Duration,
    remaining: Duration,
    interval_mode: bool,
    state: TimerState,
}

impl Default for CountdownTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl CountdownTimer {
    pub fn new() -> Self {
        Self {
            total: Duration::ZERO,
            remaining: Duration::ZERO,
            interval_mode: false,
            state: TimerState::Idle,
        }
    }

    /// Arms and starts the countdown. A zero duration resets to idle
    /// instead of arming a timer that would expire immediately.
    pub fn start(&mut self, total: Duration, interval_mode: bool) {
        if total.is_zero() {
            self.reset();
            return;
        }
        self.total = total;
        self.remaining = total;
        self.interval_mode = interval_mode;
        self.state = TimerState::Running;
    }

    pub fn pause(&mut self) {
        if self.state == TimerState::Running {
            self.state = TimerState::Paused;
        }
    }

    pub fn resume(&mut self) {
        if self.state == TimerState::Paused {
            self.state = TimerState::Running;
        }
    }

    /// Clears everything, including interval mode.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Advances the countdown by the elapsed frame time. Returns true when
    /// the countdown expired during this step.
    pub fn advance(&mut self, delta: Duration) -> bool {
        if self.state != TimerState::Running {
            return false;
        }
        self.remaining = self.remaining.saturating_sub(delta);
        if !self.remaining.is_zero() {
            return false;
        }
        if self.interval_mode {
            self.remaining = self.total;
        } else {
            self.reset();
        }
        true
    }

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn remaining(&self) -> Duration {
        self.remaining
    }

    pub fn total(&self) -> Duration {
        self.total
    }

    pub fn is_interval_mode(&self) -> bool {
        self.interval_mode
    }

    /// Elapsed fraction of the armed duration, for ring display.
    pub fn progress(&self) -> f64 {
        if self.total.is_zero() {
            return 0.0;
        }
        (self.total - self.remaining).as_secs_f64() / self.total.as_secs_f64()
    }
}
