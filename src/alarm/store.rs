use std::collections::HashSet;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

use crate::alarm::model::AlarmRecord;

pub const ALARM_FILE_VERSION: u32 = 1;

#[derive(Debug, Deserialize)]
struct AlarmFile {
    version: u32,
    alarms: Vec<AlarmRecord>,
}

#[derive(Serialize)]
struct AlarmFileRef<'a> {
    version: u32,
    alarms: &'a [AlarmRecord],
}

pub fn load_alarms(path: &Path) -> Result<Vec<AlarmRecord>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("unable to read alarm file {}", path.display()))?;
    parse_alarms_text(&content)
}

pub fn parse_alarms_text(content: &str) -> Result<Vec<AlarmRecord>> {
    let raw = serde_json::from_str::<AlarmFile>(content).map_err(|err| {
        let line = err.line();
        let column = err.column();
        anyhow::anyhow!("invalid JSON at line {line}, column {column}: {err}")
    })?;

    if raw.version != ALARM_FILE_VERSION {
        bail!(
            "unsupported alarm file version {}; expected version {ALARM_FILE_VERSION}",
            raw.version
        );
    }

    let mut ids = HashSet::new();
    let mut alarms = raw.alarms;
    for alarm in &mut alarms {
        if !ids.insert(alarm.id.clone()) {
            bail!("duplicate alarm id found: {}", alarm.id);
        }
        alarm
            .validate()
            .with_context(|| format!("alarm '{}' is malformed", alarm.id))?;
        alarm.normalize_days();
    }
    Ok(alarms)
}

pub fn save_alarms(path: &Path, alarms: &[AlarmRecord]) -> Result<()> {
    let text = render_alarms_text(alarms)?;
    fs::write(path, text)
        .with_context(|| format!("unable to write alarm file {}", path.display()))?;
    Ok(())
}

pub fn render_alarms_text(alarms: &[AlarmRecord]) -> Result<String> {
    let payload = AlarmFileRef {
        version: ALARM_FILE_VERSION,
        alarms,
    };
    let text = serde_json::to_string_pretty(&payload)?;
    Ok(format!("{text}\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alarm::model::Meridiem;

    fn valid_json() -> &'static str {
        r#"
{
  "version": 1,
  "alarms": [
    {
      "id": "wake-1",
      "hour": 7,
      "minute": 30,
      "ampm": "AM",
      "days": [1, 2, 3, 4, 5],
      "enabled": true,
      "isTemporary": false,
      "label": "weekday wakeup",
      "createdAt": 1700000000000
    },
    {
      "id": "nap",
      "hour": 14,
      "minute": 0,
      "days": [],
      "isTemporary": true,
      "createdAt": 1700000001000
    }
  ]
}
"#
    }

    #[test]
    fn parses_valid_alarm_file() {
        let alarms = parse_alarms_text(valid_json()).expect("valid file");
        assert_eq!(alarms.len(), 2);
        assert_eq!(alarms[0].id, "wake-1");
        assert_eq!(alarms[0].ampm, Some(Meridiem::Am));
        assert_eq!(alarms[0].hour24(), 7);
        assert_eq!(alarms[0].days, vec![1, 2, 3, 4, 5]);
        assert_eq!(alarms[0].label.as_deref(), Some("weekday wakeup"));
        // Omitted fields take their defaults.
        assert!(alarms[1].enabled);
        assert!(alarms[1].is_temporary);
        assert!(alarms[1].ampm.is_none());
        assert!(alarms[1].days.is_empty());
    }

    #[test]
    fn rejects_malformed_json_with_position() {
        let err = parse_alarms_text("{ not-valid-json ").expect_err("should fail");
        assert!(err.to_string().contains("invalid JSON"));
    }

    #[test]
    fn rejects_unsupported_version() {
        let err = parse_alarms_text(r#"{ "version": 2, "alarms": [] }"#).expect_err("should fail");
        assert!(err.to_string().contains("unsupported alarm file version 2"));
    }

    #[test]
    fn rejects_duplicate_ids() {
        let json = r#"
{
  "version": 1,
  "alarms": [
    { "id": "dup", "hour": 7, "minute": 0 },
    { "id": "dup", "hour": 8, "minute": 0 }
  ]
}
"#;
        let err = parse_alarms_text(json).expect_err("should fail");
        assert!(err.to_string().contains("duplicate alarm id"));
    }

    #[test]
    fn rejects_out_of_range_time_on_load() {
        let json = r#"
{
  "version": 1,
  "alarms": [
    { "id": "bad", "hour": 25, "minute": 0 }
  ]
}
"#;
        let err = parse_alarms_text(json).expect_err("should fail");
        assert!(format!("{err:#}").contains("invalid alarm time"));
    }

    #[test]
    fn collapses_duplicate_days_on_load() {
        let json = r#"
{
  "version": 1,
  "alarms": [
    { "id": "a", "hour": 7, "minute": 0, "days": [5, 1, 5, 3] }
  ]
}
"#;
        let alarms = parse_alarms_text(json).expect("valid file");
        assert_eq!(alarms[0].days, vec![1, 3, 5]);
    }

    #[test]
    fn record_fields_round_trip_exactly() {
        let alarms = parse_alarms_text(valid_json()).expect("valid file");
        let rendered = render_alarms_text(&alarms).expect("render");
        let value: serde_json::Value = serde_json::from_str(&rendered).expect("valid JSON");

        let first = &value["alarms"][0];
        assert_eq!(first["hour"], 7);
        assert_eq!(first["minute"], 30);
        assert_eq!(first["ampm"], "AM");
        assert_eq!(first["days"], serde_json::json!([1, 2, 3, 4, 5]));
        assert_eq!(first["enabled"], true);
        assert_eq!(first["isTemporary"], false);
        assert_eq!(first["createdAt"], 1_700_000_000_000_i64);

        // A 24-hour record stays 24-hour: no ampm key is invented.
        let second = &value["alarms"][1];
        assert!(second.get("ampm").is_none());

        let reparsed = parse_alarms_text(&rendered).expect("round trip");
        assert_eq!(reparsed.len(), alarms.len());
        assert_eq!(reparsed[0].id, alarms[0].id);
        assert_eq!(reparsed[1].is_temporary, alarms[1].is_temporary);
    }
}
