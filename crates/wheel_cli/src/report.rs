//! Report output model for headless picker runs.

use anyhow::{bail, Context, Result};
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::{Component, Path};
use wheel_core::{Index, ValueChange};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    Passed,
    Failed,
}

/// Machine-readable result of a scenario run.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub status: ReportStatus,
    pub failed_step_index: Option<usize>,
    pub assertion: Option<String>,
    pub message: Option<String>,
    pub elapsed_frames: u64,
    pub elapsed_ms: u64,
    pub final_index: Index,
    pub final_value: String,
    pub changes: Vec<ValueChange>,
}

/// Where the picker ended up when the run stopped.
#[derive(Debug, Clone, Default)]
pub struct RunState {
    pub elapsed_frames: u64,
    pub elapsed_ms: u64,
    pub final_index: Index,
    pub final_value: String,
    pub changes: Vec<ValueChange>,
}

impl Report {
    pub fn passed(state: RunState) -> Self {
        Self {
            status: ReportStatus::Passed,
            failed_step_index: None,
            assertion: None,
            message: None,
            elapsed_frames: state.elapsed_frames,
            elapsed_ms: state.elapsed_ms,
            final_index: state.final_index,
            final_value: state.final_value,
            changes: state.changes,
        }
    }

    pub fn failed(
        assertion: &str,
        failed_step_index: usize,
        message: String,
        state: RunState,
    ) -> Self {
        Self {
            status: ReportStatus::Failed,
            failed_step_index: Some(failed_step_index),
            assertion: Some(assertion.to_string()),
            message: Some(message),
            ..Self::passed(state)
        }
    }

    /// Pretty JSON with a trailing newline
    pub fn to_json(&self) -> Result<String> {
        let mut payload = serde_json::to_string_pretty(self)?;
        payload.push('\n');
        Ok(payload)
    }

    pub fn write_to_writer<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_all(self.to_json()?.as_bytes())?;
        Ok(())
    }

    /// Write below the working directory, creating missing parents
    pub fn write_to_path(&self, path: &Path) -> Result<()> {
        ensure_relative(path)?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        let mut file = File::create(path)?;
        self.write_to_writer(&mut file)
    }
}

/// Reports may only land below the working directory
fn ensure_relative(path: &Path) -> Result<()> {
    if path.as_os_str().is_empty() {
        bail!("report path is empty");
    }
    for component in path.components() {
        match component {
            Component::Normal(_) | Component::CurDir => {}
            other => bail!(
                "report path {} leaves the working directory at {other:?}",
                path.display()
            ),
        }
    }
    Ok(())
}
