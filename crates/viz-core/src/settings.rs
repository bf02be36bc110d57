//! Flat settings record exchanged with the host's persistence layer.
//!
//! Loading is lenient: every field is read on its own and a missing, unknown
//! or malformed field is skipped, leaving the built-in default in place.

use crate::state::EngineState;
use serde::Serialize;
use serde_json::Value;

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sensitivity: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub particles: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_cycle: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_cycle_seconds: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cycle_order: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode_filter: Option<Vec<String>>,
}

impl Settings {
    pub fn from_json_lenient(text: &str) -> Self {
        let value: Value = match serde_json::from_str(text) {
            Ok(v) => v,
            Err(e) => {
                log::warn!("[settings] ignoring unreadable record: {}", e);
                return Self::default();
            }
        };
        let Some(obj) = value.as_object() else {
            log::warn!("[settings] ignoring non-object record");
            return Self::default();
        };
        Self {
            mode: obj.get("mode").and_then(Value::as_str).map(str::to_string),
            sensitivity: obj
                .get("sensitivity")
                .and_then(Value::as_f64)
                .map(|v| v as f32)
                .filter(|v| v.is_finite()),
            particles: obj.get("particles").and_then(Value::as_bool),
            auto_cycle: obj.get("autoCycle").and_then(Value::as_bool),
            auto_cycle_seconds: obj
                .get("autoCycleSeconds")
                .and_then(Value::as_f64)
                .filter(|v| v.is_finite() && *v >= 0.0)
                .map(|v| v.round().min(u32::MAX as f64) as u32),
            cycle_order: obj
                .get("cycleOrder")
                .and_then(Value::as_str)
                .map(str::to_string),
            mode_filter: obj.get("modeFilter").and_then(Value::as_array).map(|ids| {
                ids.iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            }),
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }
}

impl From<&EngineState> for Settings {
    fn from(state: &EngineState) -> Self {
        Self {
            mode: Some(state.mode.id().to_string()),
            sensitivity: Some(state.sensitivity),
            particles: Some(state.particles),
            auto_cycle: Some(state.auto_cycle),
            auto_cycle_seconds: Some(state.cycle_interval_sec),
            cycle_order: Some(state.cycle_order.id().to_string()),
            mode_filter: Some(state.filter.iter().map(|m| m.id().to_string()).collect()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn garbage_yields_defaults() {
        assert_eq!(Settings::from_json_lenient("not json"), Settings::default());
        assert_eq!(Settings::from_json_lenient("[1,2]"), Settings::default());
    }

    #[test]
    fn malformed_fields_are_skipped_individually() {
        let s = Settings::from_json_lenient(
            r#"{"mode":"tunnel","sensitivity":"loud","particles":false,
                "autoCycleSeconds":12,"modeFilter":["bars",3,"wave"],"extra":true}"#,
        );
        assert_eq!(s.mode.as_deref(), Some("tunnel"));
        assert_eq!(s.sensitivity, None);
        assert_eq!(s.particles, Some(false));
        assert_eq!(s.auto_cycle_seconds, Some(12));
        assert_eq!(s.auto_cycle, None);
        assert_eq!(s.mode_filter, Some(vec!["bars".to_string(), "wave".to_string()]));
    }

    #[test]
    fn serializes_camel_case() {
        let s = Settings {
            auto_cycle: Some(true),
            cycle_order: Some("ordered".into()),
            ..Default::default()
        };
        let back = Settings::from_json_lenient(&s.to_json());
        assert_eq!(back, s);
        assert!(s.to_json().contains("autoCycle"));
    }
}
