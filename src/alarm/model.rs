use std::fmt;

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Opaque alarm identifier, assigned at creation and stable for the
/// record's lifetime.
pub type AlarmId = String;

#[derive(Debug, Error)]
pub enum AlarmError {
    #[error("invalid alarm time: {0}")]
    InvalidAlarmTime(String),
    #[error("unknown alarm id: {0}")]
    UnknownAlarmId(AlarmId),
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub enum Meridiem {
    #[serde(rename = "AM")]
    Am,
    #[serde(rename = "PM")]
    Pm,
}

impl fmt::Display for Meridiem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Meridiem::Am => write!(f, "AM"),
            Meridiem::Pm => write!(f, "PM"),
        }
    }
}

/// Converts a 12-hour display value plus AM/PM to 24-hour form.
///
/// PM adds 12 except for noon (`12 PM` stays 12); `12 AM` is midnight.
pub fn normalize_hour(hour: u32, ampm: Meridiem) -> Result<u32, AlarmError> {
    if !(1..=12).contains(&hour) {
        return Err(AlarmError::InvalidAlarmTime(format!(
            "hour {hour} out of range 1-12 for {ampm} time"
        )));
    }
    Ok(match ampm {
        Meridiem::Pm if hour < 12 => hour + 12,
        Meridiem::Am if hour == 12 => 0,
        _ => hour,
    })
}

/// A single alarm definition as entered by the user and persisted.
///
/// `hour` is kept in the form it was entered (1-12 with `ampm`, or 0-23
/// without) so the record round-trips exactly; all scheduling math goes
/// through [`AlarmRecord::hour24`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlarmRecord {
    pub id: AlarmId,
    pub hour: u32,
    pub minute: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ampm: Option<Meridiem>,
    /// Weekday indices 0 (Sunday) through 6 (Saturday). Empty means no day
    /// restriction: the alarm matches every day at its set time.
    #[serde(default)]
    pub days: Vec<u8>,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default)]
    pub is_temporary: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sound: Option<String>,
    /// Creation instant as unix milliseconds; used only for default sort
    /// order.
    #[serde(default)]
    pub created_at: i64,
}

fn default_enabled() -> bool {
    true
}

impl AlarmRecord {
    /// Creates a validated record with display metadata left empty.
    pub fn new(
        id: impl Into<AlarmId>,
        hour: u32,
        minute: u32,
        ampm: Option<Meridiem>,
        days: Vec<u8>,
    ) -> Result<Self, AlarmError> {
        let mut record = Self {
            id: id.into(),
            hour,
            minute,
            ampm,
            days,
            enabled: true,
            is_temporary: false,
            label: None,
            description: None,
            group: None,
            color: None,
            sound: None,
            created_at: chrono::Local::now().timestamp_millis(),
        };
        record.validate()?;
        record.normalize_days();
        Ok(record)
    }

    /// Checks the construction-time invariants: hour within the convention
    /// implied by `ampm`, minute 0-59, weekday indices 0-6.
    pub fn validate(&self) -> Result<(), AlarmError> {
        match self.ampm {
            Some(ampm) => {
                normalize_hour(self.hour, ampm)?;
            }
            None => {
                if self.hour > 23 {
                    return Err(AlarmError::InvalidAlarmTime(format!(
                        "hour {} out of range 0-23",
                        self.hour
                    )));
                }
            }
        }
        if self.minute > 59 {
            return Err(AlarmError::InvalidAlarmTime(format!(
                "minute {} out of range 0-59",
                self.minute
            )));
        }
        if let Some(day) = self.days.iter().find(|day| **day > 6) {
            return Err(AlarmError::InvalidAlarmTime(format!(
                "weekday index {day} out of range 0-6"
            )));
        }
        Ok(())
    }

    /// Collapses duplicate weekday entries and fixes their order.
    pub fn normalize_days(&mut self) {
        self.days.sort_unstable();
        self.days.dedup();
    }

    /// The alarm hour in 24-hour form regardless of entry convention.
    pub fn hour24(&self) -> u32 {
        match self.ampm {
            Some(Meridiem::Pm) if self.hour < 12 => self.hour + 12,
            Some(Meridiem::Am) if self.hour == 12 => 0,
            _ => self.hour,
        }
    }

    /// True when the alarm may fire on the given weekday (0 = Sunday).
    pub fn fires_on(&self, weekday: u8) -> bool {
        self.days.is_empty() || self.days.contains(&weekday)
    }

    pub(crate) fn time_of_day(&self) -> NaiveTime {
        // In range for any record that passed validate().
        NaiveTime::from_hms_opt(self.hour24(), self.minute, 0).unwrap_or(NaiveTime::MIN)
    }

    /// Time-of-day formatted in the convention it was entered in.
    pub fn display_time(&self) -> String {
        match self.ampm {
            Some(ampm) => format!("{}:{:02} {}", self.hour, self.minute, ampm),
            None => format!("{:02}:{:02}", self.hour, self.minute),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_hour_handles_noon_and_midnight() {
        assert_eq!(normalize_hour(12, Meridiem::Am).expect("valid"), 0);
        assert_eq!(normalize_hour(12, Meridiem::Pm).expect("valid"), 12);
    }

    #[test]
    fn normalize_hour_offsets_pm_and_keeps_am() {
        for hour in 1..=11 {
            assert_eq!(normalize_hour(hour, Meridiem::Pm).expect("valid"), hour + 12);
            assert_eq!(normalize_hour(hour, Meridiem::Am).expect("valid"), hour);
        }
    }

    #[test]
    fn normalize_hour_rejects_out_of_domain_values() {
        assert!(normalize_hour(0, Meridiem::Am).is_err());
        assert!(normalize_hour(13, Meridiem::Pm).is_err());
    }

    #[test]
    fn twenty_four_hour_records_skip_normalization() {
        let record = AlarmRecord::new("r", 23, 15, None, vec![]).expect("valid");
        assert_eq!(record.hour24(), 23);
        let record = AlarmRecord::new("r", 0, 0, None, vec![]).expect("valid");
        assert_eq!(record.hour24(), 0);
    }

    #[test]
    fn new_rejects_invalid_minute_and_hour() {
        assert!(AlarmRecord::new("r", 7, 60, None, vec![]).is_err());
        assert!(AlarmRecord::new("r", 24, 0, None, vec![]).is_err());
        assert!(AlarmRecord::new("r", 0, 0, Some(Meridiem::Am), vec![]).is_err());
    }

    #[test]
    fn new_rejects_weekday_out_of_range() {
        let err = AlarmRecord::new("r", 7, 0, None, vec![1, 7]).expect_err("day 7 invalid");
        assert!(err.to_string().contains("weekday index 7"));
    }

    #[test]
    fn duplicate_days_are_collapsed_in_order() {
        let record = AlarmRecord::new("r", 7, 0, None, vec![5, 1, 3, 1, 5]).expect("valid");
        assert_eq!(record.days, vec![1, 3, 5]);
    }

    #[test]
    fn empty_days_matches_every_weekday() {
        let record = AlarmRecord::new("r", 7, 0, None, vec![]).expect("valid");
        for day in 0..=6 {
            assert!(record.fires_on(day));
        }
    }

    #[test]
    fn display_time_respects_entry_convention() {
        let twelve_hour =
            AlarmRecord::new("r", 7, 5, Some(Meridiem::Pm), vec![]).expect("valid");
        assert_eq!(twelve_hour.display_time(), "7:05 PM");
        let twenty_four_hour = AlarmRecord::new("r", 19, 5, None, vec![]).expect("valid");
        assert_eq!(twenty_four_hour.display_time(), "19:05");
    }
}
