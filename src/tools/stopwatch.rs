use std::time::Duration;

/// Stopwatch with an optional repeating interval chime mark.
///
/// Frame-driven like [`crate::tools::timer::CountdownTimer`]: the caller
/// feeds elapsed wall time into [`Stopwatch::advance`], which reports how
/// many interval marks were crossed so a coarse tick cannot skip one.
#[derive(Debug)]
pub struct Stopwatch {
    elapsed: Duration,
    running: bool,
    interval: Option<Duration>,
    next_mark: Duration,
}

impl Default for Stopwatch {
    fn default() -> Self {
        Self::new()
    }
}

impl Stopwatch {
    pub fn new() -> Self {
        Self {
            elapsed: Duration::ZERO,
            running: false,
            interval: None,
            next_mark: Duration::ZERO,
        }
    }

    pub fn start(&mut self) {
        self.running = true;
    }

    pub fn pause(&mut self) {
        self.running = false;
    }

    /// Clears elapsed time and re-arms the first interval mark.
    pub fn reset(&mut self) {
        self.elapsed = Duration::ZERO;
        self.running = false;
        self.next_mark = self.interval.unwrap_or(Duration::ZERO);
    }

    /// Arms (or disarms with `None`) the interval chime. A zero period is
    /// treated as disarmed. The next mark lands one period from the
    /// current elapsed time.
    pub fn set_interval(&mut self, interval: Option<Duration>) {
        self.interval = interval.filter(|period| !period.is_zero());
        self.next_mark = match self.interval {
            Some(period) => self.elapsed + period,
            None => Duration::ZERO,
        };
    }

    /// Advances by the elapsed frame time while running. Returns the number
    /// of interval marks crossed during this step.
    pub fn advance(&mut self, delta: Duration) -> u32 {
        if !self.running {
            return 0;
        }
        self.elapsed += delta;
        let Some(period) = self.interval else {
            return 0;
        };
        let mut marks = 0;
        while self.elapsed >= self.next_mark {
            marks += 1;
            self.next_mark += period;
        }
        marks
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn is_running(&self) -> bool {
        self.running
    }
}
