//! Report output model for scenario replays.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::Path;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    Passed,
    Failed,
}

/// A runtime call made by a `call` step and how the relay answered it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CallRecord {
    pub step_index: usize,
    pub method: String,
    /// `success`, `error`, or `not_implemented`.
    pub reply: String,
    /// Success value, or the error code and message.
    #[serde(default)]
    pub value: serde_json::Value,
}

/// Machine-readable result of a scenario replay.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioReport {
    pub status: ReportStatus,
    pub channel: String,
    pub failed_step_index: Option<usize>,
    pub message: Option<String>,
    /// URLs pushed to the runtime, in order.
    pub pushes: Vec<String>,
    /// Results of every pull, in order.
    pub pulls: Vec<Option<String>>,
    /// Replies to `call` steps, in order.
    pub calls: Vec<CallRecord>,
}

impl ScenarioReport {
    pub fn new(channel: impl Into<String>) -> Self {
        Self {
            status: ReportStatus::Passed,
            channel: channel.into(),
            failed_step_index: None,
            message: None,
            pushes: Vec::new(),
            pulls: Vec::new(),
            calls: Vec::new(),
        }
    }

    pub fn fail(&mut self, step_index: usize, message: impl Into<String>) {
        self.status = ReportStatus::Failed;
        self.failed_step_index = Some(step_index);
        self.message = Some(message.into());
    }

    pub fn is_failed(&self) -> bool {
        self.status == ReportStatus::Failed
    }

    pub fn write_to_path(&self, path: &Path) -> Result<()> {
        let payload = serde_json::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, payload)?;
        Ok(())
    }

    pub fn write_to_writer<W: Write>(&self, writer: &mut W) -> Result<()> {
        let payload = serde_json::to_string_pretty(self)?;
        writer.write_all(payload.as_bytes())?;
        writer.write_all(b"\n")?;
        Ok(())
    }
}
