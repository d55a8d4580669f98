//! Scenario runner driving a picker at a fixed frame rate.

use crate::report::{Report, RunState};
use crate::scenario::{Scenario, ScenarioStep};
use anyhow::Result;
use std::cell::RefCell;
use std::rc::Rc;
use wheel_core::{PickerConfig, ValueChange, WheelPicker};

/// Fixed frame length for every simulated tick.
pub const TICK_MS: u64 = 16;

/// Frames a single `settle` step may take before the run fails.
pub const SETTLE_FRAME_LIMIT: u32 = 10_000;

/// Final outcome of a scenario run.
#[derive(Debug, Clone)]
pub enum RunOutcome {
    Passed { report: Report },
    Failed { report: Report },
}

impl RunOutcome {
    pub fn report(&self) -> &Report {
        match self {
            RunOutcome::Passed { report } => report,
            RunOutcome::Failed { report } => report,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, RunOutcome::Failed { .. })
    }
}

/// Execute a pre-loaded scenario against a picker built from `config`.
pub fn run_loaded_scenario(config: &PickerConfig, scenario: &Scenario) -> Result<RunOutcome> {
    let mut picker = WheelPicker::from_config(config)?;
    let mut run = Run::new(&mut picker);

    for (step_index, step) in scenario.steps.iter().enumerate() {
        tracing::debug!(step_index, ?step, "running step");
        if let Some((assertion, message)) = run.step(step) {
            tracing::info!(step_index, assertion, "{message}");
            let report = Report::failed(assertion, step_index, message, run.finish());
            return Ok(RunOutcome::Failed { report });
        }
    }

    let report = Report::passed(run.finish());
    tracing::info!(
        frames = report.elapsed_frames,
        changes = report.changes.len(),
        "scenario passed"
    );
    Ok(RunOutcome::Passed { report })
}

struct Run<'a> {
    picker: &'a mut WheelPicker,
    changes: Rc<RefCell<Vec<ValueChange>>>,
    elapsed_frames: u64,
}

impl<'a> Run<'a> {
    fn new(picker: &'a mut WheelPicker) -> Self {
        let changes = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&changes);
        picker.on_selection_changed(move |change| sink.borrow_mut().push(change.clone()));
        Self {
            picker,
            changes,
            elapsed_frames: 0,
        }
    }

    /// Run one step; returns the failed assertion and its message
    fn step(&mut self, step: &ScenarioStep) -> Option<(&'static str, String)> {
        match step {
            ScenarioStep::StartDrag { y } => self.picker.start_drag(*y),
            ScenarioStep::Drag { y } => self.picker.drag_to(*y),
            ScenarioStep::Release { velocity } => self.picker.end_drag(*velocity),
            ScenarioStep::Tap { y } => self.picker.tap_at(*y),
            ScenarioStep::Tick { frames } => {
                for _ in 0..*frames {
                    self.frame();
                }
            }
            ScenarioStep::Settle => {
                let mut frames = 0;
                while self.picker.driver().is_animating() {
                    if frames == SETTLE_FRAME_LIMIT {
                        return Some((
                            "settle",
                            format!(
                                "still {} after {SETTLE_FRAME_LIMIT} frames",
                                self.picker.state().name()
                            ),
                        ));
                    }
                    self.frame();
                    frames += 1;
                }
            }
            ScenarioStep::Jump { index } => {
                self.picker.jump_to(*index);
            }
            ScenarioStep::ScrollTo { index } => self.picker.smooth_scroll_to(*index),
            ScenarioStep::ScrollToValue { value } => self.picker.smooth_scroll_to_value(value),
            ScenarioStep::ScrollBy { steps } => self.picker.scroll_by_steps(*steps),
            ScenarioStep::SetWrap { enabled } => self.picker.set_wrap_enabled(*enabled),
            ScenarioStep::AssertValue { value } => {
                let actual = self.picker.current_value();
                if actual != *value {
                    return Some((
                        "assert_value",
                        format!("expected value {value:?}, found {actual:?}"),
                    ));
                }
            }
            ScenarioStep::AssertIndex { index } => {
                let actual = self.picker.current_index();
                if actual != *index {
                    return Some((
                        "assert_index",
                        format!("expected index {index}, found {actual}"),
                    ));
                }
            }
        }
        None
    }

    fn frame(&mut self) {
        self.picker.tick(TICK_MS as f32 / 1000.0);
        self.elapsed_frames += 1;
    }

    fn finish(self) -> RunState {
        RunState {
            elapsed_frames: self.elapsed_frames,
            elapsed_ms: self.elapsed_frames * TICK_MS,
            final_index: self.picker.current_index(),
            final_value: self.picker.current_value(),
            changes: self.changes.take(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::ReportStatus;
    use pretty_assertions::assert_eq;

    fn run_scenario(config: &PickerConfig, input: &str) -> Result<RunOutcome> {
        run_loaded_scenario(config, &Scenario::from_json(input)?)
    }

    fn hours(wrap: bool) -> PickerConfig {
        PickerConfig::from_toml_str(&format!("adapter = \"hours\"\nwrap = {wrap}\n"))
            .expect("valid config")
    }

    #[test]
    fn test_smooth_scroll_settles_on_target() {
        let outcome = run_scenario(
            &hours(false),
            r#"{ "steps": [
                { "type": "scroll_to", "index": 9 },
                { "type": "settle" },
                { "type": "assert_value", "value": "09" },
                { "type": "assert_index", "index": 9 }
            ] }"#,
        )
        .expect("run");

        assert!(!outcome.is_failed(), "{:?}", outcome.report());
        let report = outcome.report();
        assert!(report.elapsed_frames > 0);
        assert_eq!(report.elapsed_ms, report.elapsed_frames * TICK_MS);
        assert_eq!(report.final_value, "09");
        let last = report.changes.last().map(|c| c.new_value.as_str());
        assert_eq!(last, Some("09"));
    }

    #[test]
    fn test_failed_assertion_stops_the_run() {
        let outcome = run_scenario(
            &hours(false),
            r#"{ "steps": [
                { "type": "jump", "index": 5 },
                { "type": "assert_index", "index": 6 },
                { "type": "tick", "frames": 10 }
            ] }"#,
        )
        .expect("run");

        assert!(outcome.is_failed());
        let report = outcome.report();
        assert_eq!(report.status, ReportStatus::Failed);
        assert_eq!(report.failed_step_index, Some(1));
        assert_eq!(report.assertion.as_deref(), Some("assert_index"));
        assert_eq!(report.elapsed_frames, 0);
        // Jumps are silent
        assert!(report.changes.is_empty());
    }

    #[test]
    fn test_drag_crosses_midnight_when_wrapping() {
        let outcome = run_scenario(
            &hours(true),
            r#"{ "steps": [
                { "type": "jump", "index": 23 },
                { "type": "start_drag", "y": 100 },
                { "type": "drag", "y": 32 },
                { "type": "release", "velocity": 0 },
                { "type": "settle" },
                { "type": "assert_value", "value": "00" }
            ] }"#,
        )
        .expect("run");

        assert!(!outcome.is_failed(), "{:?}", outcome.report());
        let changes = &outcome.report().changes;
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].old_value, "23");
        assert_eq!(changes[0].new_value, "00");
    }

    #[test]
    fn test_settle_without_motion_takes_no_frames() {
        let outcome = run_scenario(&hours(false), r#"{ "steps": [ { "type": "settle" } ] }"#)
            .expect("run");
        assert_eq!(outcome.report().elapsed_frames, 0);
    }

    #[test]
    fn test_invalid_config_is_an_error() {
        let mut config = hours(false);
        config.visible_count = 0;
        assert!(run_scenario(&config, r#"{ "steps": [] }"#).is_err());
    }
}
