//! Scenario definition for headless picker runs.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use wheel_core::Index;

/// Ordered list of gestures, programmatic moves and assertions.
#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    pub steps: Vec<ScenarioStep>,
}

impl Scenario {
    pub fn from_json(input: &str) -> Result<Self> {
        Ok(serde_json::from_str(input)?)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read scenario {}", path.display()))?;
        Self::from_json(&raw).with_context(|| format!("invalid scenario {}", path.display()))
    }
}

/// One scenario step. Pointer coordinates are viewport pixels, velocities px/s.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScenarioStep {
    StartDrag { y: f32 },
    Drag { y: f32 },
    Release {
        #[serde(default)]
        velocity: f32,
    },
    Tap { y: f32 },
    Tick { frames: u32 },
    Settle,
    Jump { index: Index },
    ScrollTo { index: Index },
    ScrollToValue { value: String },
    ScrollBy { steps: i64 },
    SetWrap { enabled: bool },
    AssertValue { value: String },
    AssertIndex { index: Index },
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parses_tagged_steps() {
        let scenario = Scenario::from_json(
            r#"{
                "steps": [
                    { "type": "start_drag", "y": 100.0 },
                    { "type": "drag", "y": 40 },
                    { "type": "release" },
                    { "type": "settle" },
                    { "type": "set_wrap", "enabled": true },
                    { "type": "assert_value", "value": "07" }
                ]
            }"#,
        )
        .expect("scenario parses");

        assert_eq!(
            scenario.steps,
            vec![
                ScenarioStep::StartDrag { y: 100.0 },
                ScenarioStep::Drag { y: 40.0 },
                ScenarioStep::Release { velocity: 0.0 },
                ScenarioStep::Settle,
                ScenarioStep::SetWrap { enabled: true },
                ScenarioStep::AssertValue {
                    value: "07".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_rejects_unknown_step_type() {
        let err = Scenario::from_json(r#"{ "steps": [ { "type": "pinch" } ] }"#);
        assert!(err.is_err());
    }
}
