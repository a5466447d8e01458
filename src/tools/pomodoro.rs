use std::time::Duration;

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum PomodoroPhase {
    Work,
    ShortBreak,
    LongBreak,
}

/// Work/break session timer for the Tools view.
///
/// Frame-driven like [`crate::tools::timer::CountdownTimer`]: the caller
/// feeds elapsed wall time into [`Pomodoro::advance`], which reports the
/// phase that just began whenever the current one expires. Every fourth
/// completed work session earns the long break.
#[derive(Debug)]
pub struct Pomodoro {
    work: Duration,
    short_break: Duration,
    long_break: Duration,
    phase: PomodoroPhase,
    remaining: Duration,
    cycles: u32,
    running: bool,
}

const DEFAULT_WORK: Duration = Duration::from_secs(25 * 60);
const DEFAULT_SHORT_BREAK: Duration = Duration::from_secs(5 * 60);
const DEFAULT_LONG_BREAK: Duration = Duration::from_secs(15 * 60);

impl Default for Pomodoro {
    fn default() -> Self {
        Self::new()
    }
}

impl Pomodoro {
    pub fn new() -> Self {
        Self::with_durations(DEFAULT_WORK, DEFAULT_SHORT_BREAK, DEFAULT_LONG_BREAK)
    }

    pub fn with_durations(work: Duration, short_break: Duration, long_break: Duration) -> Self {
        Self {
            work,
            short_break,
            long_break,
            phase: PomodoroPhase::Work,
            remaining: work,
            cycles: 0,
            running: false,
        }
    }

    /// Starts (or resumes) the session. Starting on an expired phase begins
    /// the next phase immediately rather than sitting at zero.
    pub fn start(&mut self) -> Option<PomodoroPhase> {
        if self.running {
            return None;
        }
        self.running = true;
        if self.remaining.is_zero() {
            return Some(self.begin_next_phase());
        }
        None
    }

    pub fn pause(&mut self) {
        self.running = false;
    }

    /// Back to a fresh, stopped work session with the cycle count cleared.
    pub fn reset(&mut self) {
        self.running = false;
        self.phase = PomodoroPhase::Work;
        self.cycles = 0;
        self.remaining = self.work;
    }

    /// Advances by the elapsed frame time while running. Returns the phase
    /// that just began when the current one expired during this step.
    pub fn advance(&mut self, delta: Duration) -> Option<PomodoroPhase> {
        if !self.running {
            return None;
        }
        self.remaining = self.remaining.saturating_sub(delta);
        if !self.remaining.is_zero() {
            return None;
        }
        Some(self.begin_next_phase())
    }

    fn begin_next_phase(&mut self) -> PomodoroPhase {
        let next = match self.phase {
            PomodoroPhase::Work => {
                self.cycles += 1;
                if self.cycles % 4 == 0 {
                    PomodoroPhase::LongBreak
                } else {
                    PomodoroPhase::ShortBreak
                }
            }
            // Any break hands back to work.
            PomodoroPhase::ShortBreak | PomodoroPhase::LongBreak => PomodoroPhase::Work,
        };
        self.phase = next;
        self.remaining = match next {
            PomodoroPhase::Work => self.work,
            PomodoroPhase::ShortBreak => self.short_break,
            PomodoroPhase::LongBreak => self.long_break,
        };
        next
    }

    pub fn phase(&self) -> PomodoroPhase {
        self.phase
    }

    pub fn remaining(&self) -> Duration {
        self.remaining
    }

    pub fn cycles(&self) -> u32 {
        self.cycles
    }

    pub fn is_running(&self) -> bool {
        self.running
    }
}
