//! Scenario definition for deep-link replays.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use linkrelay_core::ActivationKind;

/// Ordered host and runtime actions to replay against a relay.
#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    /// App id to build the relay channel from, unless overridden.
    #[serde(default)]
    pub app_id: Option<String>,
    pub steps: Vec<ScenarioStep>,
}

impl Scenario {
    /// Load a scenario from JSON text.
    pub fn from_json(input: &str) -> Result<Self> {
        Ok(serde_json::from_str(input)?)
    }

    /// Load a scenario from file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read scenario {}", path.display()))?;
        Self::from_json(&raw).with_context(|| format!("invalid scenario {}", path.display()))
    }
}

/// Entry point an activation comes through.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
    #[default]
    Launch,
    NewIntent,
}

impl From<StepKind> for ActivationKind {
    fn from(kind: StepKind) -> Self {
        match kind {
            StepKind::Launch => ActivationKind::Launch,
            StepKind::NewIntent => ActivationKind::NewIntent,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScenarioStep {
    /// OS activation, with or without a link.
    Activate {
        #[serde(default)]
        url: Option<String>,
        #[serde(default)]
        kind: StepKind,
    },
    /// The runtime's messenger becomes available.
    Connect,
    /// The runtime pulls the held link; the result is recorded.
    Pull,
    /// Pull and require the given result (`null` for absent).
    ExpectPull {
        #[serde(default)]
        url: Option<String>,
    },
    /// The runtime calls `method`; the reply is recorded.
    Call {
        method: String,
        #[serde(default)]
        args: serde_json::Value,
    },
    /// Require that the latest push carried `url`.
    ExpectPushed { url: String },
    /// Require that calling `method` is answered "not implemented".
    ExpectNotImplemented { method: String },
    /// Make runtime sends fail (or succeed again).
    SetSendFailure { enabled: bool },
}
