use chrono::{Datelike, Duration, NaiveDateTime, Timelike};
use tracing::{debug, info};

use crate::alarm::model::{AlarmError, AlarmId, AlarmRecord};

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Outcome of one minute-tick evaluation pass.
///
/// `needs_save` is set when the pass auto-disabled a temporary alarm and the
/// caller should hand the record list to the persistence store.
#[derive(Debug, Clone, Default)]
pub struct FireResult {
    pub fired: Vec<AlarmId>,
    pub needs_save: bool,
}

/// Countdown to an alarm's next occurrence, for ring display.
///
/// `progress` is `1 - remaining / window` with a 24-hour window, stretched
/// to the true remaining duration when the alarm is further than 24h away,
/// so the ring stays meaningful for both near and far alarms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Countdown {
    pub next: NaiveDateTime,
    pub remaining: Duration,
    pub progress: f64,
}

/// Owns the alarm list and answers the two wall-clock queries: which alarms
/// fire at this instant, and when a given alarm next fires.
///
/// Single-threaded and frame-driven; callers hold the instance explicitly
/// and drive it from one scheduling call site.
pub struct AlarmScheduler {
    alarms: Vec<AlarmRecord>,
    tracked: Option<AlarmId>,
    last_minute_checked: Option<NaiveDateTime>,
}

impl AlarmScheduler {
    pub fn new(mut alarms: Vec<AlarmRecord>) -> Self {
        alarms.sort_by_key(|alarm| alarm.created_at);
        Self {
            alarms,
            tracked: None,
            last_minute_checked: None,
        }
    }

    pub fn alarms(&self) -> &[AlarmRecord] {
        &self.alarms
    }

    pub fn len(&self) -> usize {
        self.alarms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.alarms.is_empty()
    }

    pub fn get(&self, id: &str) -> Result<&AlarmRecord, AlarmError> {
        self.alarms
            .iter()
            .find(|alarm| alarm.id == id)
            .ok_or_else(|| AlarmError::UnknownAlarmId(id.to_string()))
    }

    /// Adds a record after validating it; the list is unchanged on error.
    /// Id uniqueness is the caller's concern (ids are minted at creation;
    /// the store rejects duplicates at load). The record lands at its
    /// `created_at` sort position.
    pub fn add_alarm(&mut self, mut alarm: AlarmRecord) -> Result<(), AlarmError> {
        alarm.validate()?;
        alarm.normalize_days();
        let index = self
            .alarms
            .partition_point(|existing| existing.created_at <= alarm.created_at);
        self.alarms.insert(index, alarm);
        Ok(())
    }

    /// Replaces the record with the same id wholesale. Validation happens
    /// before the swap, so a rejected edit leaves the list untouched.
    pub fn replace_alarm(&mut self, id: &str, mut alarm: AlarmRecord) -> Result<(), AlarmError> {
        alarm.validate()?;
        alarm.normalize_days();
        let slot = self
            .alarms
            .iter_mut()
            .find(|existing| existing.id == id)
            .ok_or_else(|| AlarmError::UnknownAlarmId(id.to_string()))?;
        *slot = alarm;
        Ok(())
    }

    /// Synchronously removes the record; clears the tracked selection when
    /// it pointed at the removed record.
    pub fn remove_alarm(&mut self, id: &str) -> Result<AlarmRecord, AlarmError> {
        let index = self
            .alarms
            .iter()
            .position(|alarm| alarm.id == id)
            .ok_or_else(|| AlarmError::UnknownAlarmId(id.to_string()))?;
        if self.tracked.as_deref() == Some(id) {
            self.tracked = None;
        }
        Ok(self.alarms.remove(index))
    }

    /// User-driven enable/disable. Disabling the tracked alarm clears the
    /// tracked selection.
    pub fn set_enabled(&mut self, id: &str, enabled: bool) -> Result<(), AlarmError> {
        let alarm = self
            .alarms
            .iter_mut()
            .find(|alarm| alarm.id == id)
            .ok_or_else(|| AlarmError::UnknownAlarmId(id.to_string()))?;
        alarm.enabled = enabled;
        if !enabled && self.tracked.as_deref() == Some(id) {
            self.tracked = None;
        }
        Ok(())
    }

    /// Selects the alarm shown as a countdown ring. A display selection,
    /// not a scheduling input.
    pub fn track(&mut self, id: &str) -> Result<(), AlarmError> {
        self.get(id)?;
        self.tracked = Some(id.to_string());
        Ok(())
    }

    pub fn untrack(&mut self) {
        self.tracked = None;
    }

    pub fn tracked_id(&self) -> Option<&str> {
        self.tracked.as_deref()
    }

    /// Evaluates every enabled alarm against the current wall-clock minute.
    ///
    /// Safe to call at any cadence: the scheduler remembers the last minute
    /// it evaluated and returns an empty result without re-scanning inside
    /// that minute, so no alarm fires twice for the same minute tick. The
    /// only mutation performed is auto-disabling fired temporary alarms.
    pub fn tick(&mut self, now: NaiveDateTime) -> FireResult {
        let minute = truncate_to_minute(now);
        if self.last_minute_checked == Some(minute) {
            return FireResult::default();
        }
        self.last_minute_checked = Some(minute);

        let weekday = weekday_index(now);
        let mut result = FireResult::default();
        for alarm in &mut self.alarms {
            if !alarm.enabled {
                continue;
            }
            let matches = alarm.fires_on(weekday)
                && alarm.hour24() == now.hour()
                && alarm.minute == now.minute();
            if !matches {
                continue;
            }
            debug!(id = %alarm.id, "alarm fired");
            result.fired.push(alarm.id.clone());
            if alarm.is_temporary {
                alarm.enabled = false;
                result.needs_save = true;
                info!(id = %alarm.id, "temporary alarm auto-disabled after firing");
            }
        }
        result
    }

    pub fn next_occurrence_of(
        &self,
        id: &str,
        now: NaiveDateTime,
    ) -> Result<NaiveDateTime, AlarmError> {
        Ok(next_occurrence(self.get(id)?, now))
    }

    pub fn countdown(&self, id: &str, now: NaiveDateTime) -> Result<Countdown, AlarmError> {
        Ok(countdown_for(self.get(id)?, now))
    }

    /// Countdown for the tracked alarm, if one is selected and enabled.
    pub fn tracked_countdown(&self, now: NaiveDateTime) -> Option<Countdown> {
        let id = self.tracked.as_deref()?;
        let alarm = self.get(id).ok()?;
        if !alarm.enabled {
            return None;
        }
        Some(countdown_for(alarm, now))
    }
}

/// The next future instant at which the alarm's fire condition holds.
///
/// Pure over `(alarm, now)`: ignores `enabled` and `is_temporary`, mutates
/// nothing, and recomputes from scratch each call so a per-frame caller
/// cannot accumulate drift.
pub fn next_occurrence(alarm: &AlarmRecord, now: NaiveDateTime) -> NaiveDateTime {
    let today_candidate = now.date().and_time(alarm.time_of_day());
    if alarm.days.is_empty() {
        // No day restriction: today if still ahead, otherwise tomorrow.
        return if today_candidate <= now {
            today_candidate + Duration::days(1)
        } else {
            today_candidate
        };
    }

    let today = weekday_index(now);
    for offset in 0..=7u8 {
        let day = (today + offset) % 7;
        if !alarm.days.contains(&day) {
            continue;
        }
        if offset == 0 && today_candidate <= now {
            // Today's slot already passed; offset 7 picks it up next week.
            continue;
        }
        return today_candidate + Duration::days(i64::from(offset));
    }

    // Unreachable for validated records: some offset in 0..=7 matches any
    // non-empty day set.
    today_candidate + Duration::days(7)
}

pub fn countdown_for(alarm: &AlarmRecord, now: NaiveDateTime) -> Countdown {
    let next = next_occurrence(alarm, now);
    let remaining = next - now;
    let remaining_seconds = remaining.num_milliseconds() as f64 / 1_000.0;
    let window_seconds = remaining_seconds.max(SECONDS_PER_DAY);
    let progress = (1.0 - remaining_seconds / window_seconds).clamp(0.0, 1.0);
    Countdown {
        next,
        remaining,
        progress,
    }
}

fn truncate_to_minute(now: NaiveDateTime) -> NaiveDateTime {
    now.with_second(0)
        .and_then(|instant| instant.with_nanosecond(0))
        .unwrap_or(now)
}

fn weekday_index(now: NaiveDateTime) -> u8 {
    now.weekday().num_days_from_sunday() as u8
}
