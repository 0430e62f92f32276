//! Replays a scenario against a relay wired to an in-memory runtime.

use anyhow::Result;
use serde_json::{json, Value};
use tracing::{debug, info};

use linkrelay_core::{
    ActivationEvent, DeepLinkRelay, InMemoryMessenger, MethodResponse, RelayConfig,
};

use crate::report::{CallRecord, ScenarioReport};
use crate::scenario::{Scenario, ScenarioStep};

struct Replay {
    relay: DeepLinkRelay<InMemoryMessenger>,
    runtime: InMemoryMessenger,
    channel: String,
    report: ScenarioReport,
}

/// Run every step in order, stopping at the first failed expectation.
pub fn run_scenario(scenario: &Scenario, config: RelayConfig) -> Result<ScenarioReport> {
    let relay = DeepLinkRelay::new(config)?;
    let channel = relay.channel_name();
    let mut replay = Replay {
        relay,
        runtime: InMemoryMessenger::new(),
        report: ScenarioReport::new(channel.clone()),
        channel,
    };

    for (index, step) in scenario.steps.iter().enumerate() {
        debug!(index, ?step, "replaying step");
        if let Some(message) = replay.step(index, step)? {
            info!(index, %message, "scenario failed");
            replay.report.fail(index, message);
            break;
        }
    }

    replay.report.pushes = replay.pushes();
    Ok(replay.report)
}

impl Replay {
    /// Returns a failure message when an expectation does not hold.
    fn step(&mut self, index: usize, step: &ScenarioStep) -> Result<Option<String>> {
        match step {
            ScenarioStep::Activate { url, kind } => {
                let event = ActivationEvent::new((*kind).into(), url.clone());
                let outcome = self.relay.on_activation_event(&event);
                debug!(?outcome, "activation handled");
            }
            ScenarioStep::Connect => self.relay.on_runtime_ready(self.runtime.clone()),
            ScenarioStep::Pull => {
                if let Err(message) = self.pull()? {
                    return Ok(Some(message));
                }
            }
            ScenarioStep::ExpectPull { url } => match self.pull()? {
                Ok(actual) if actual == *url => {}
                Ok(actual) => {
                    return Ok(Some(format!(
                        "expected pull {:?}, got {:?}",
                        url, actual
                    )))
                }
                Err(message) => return Ok(Some(message)),
            },
            ScenarioStep::Call { method, args } => {
                let response = self.runtime.call(&self.channel, method, args.clone())?;
                let (reply, value) = match response {
                    MethodResponse::Success(value) => ("success", value),
                    MethodResponse::Error { code, message, .. } => {
                        ("error", json!({ "code": code, "message": message }))
                    }
                    MethodResponse::NotImplemented => ("not_implemented", Value::Null),
                };
                self.report.calls.push(CallRecord {
                    step_index: index,
                    method: method.clone(),
                    reply: reply.to_string(),
                    value,
                });
            }
            ScenarioStep::ExpectPushed { url } => {
                let pushes = self.pushes();
                match pushes.last() {
                    Some(last) if last == url => {}
                    Some(last) => {
                        return Ok(Some(format!("expected push {url:?}, last push was {last:?}")))
                    }
                    None => return Ok(Some(format!("expected push {url:?}, nothing was pushed"))),
                }
            }
            ScenarioStep::ExpectNotImplemented { method } => {
                let response = self.runtime.call(&self.channel, method, Value::Null)?;
                if response != MethodResponse::NotImplemented {
                    return Ok(Some(format!(
                        "expected '{method}' to be not implemented, got {response:?}"
                    )));
                }
            }
            ScenarioStep::SetSendFailure { enabled } => self.runtime.set_fail_sends(*enabled),
        }
        Ok(None)
    }

    /// Pull once as the runtime and record the result.
    fn pull(&mut self) -> Result<std::result::Result<Option<String>, String>> {
        let method = self.relay.config().pull_method.clone();
        let response = self.runtime.call(&self.channel, &method, Value::Null)?;
        let link = match response {
            MethodResponse::Success(Value::String(url)) => Some(url),
            MethodResponse::Success(Value::Null) => None,
            other => return Ok(Err(format!("pull answered {other:?}"))),
        };
        self.report.pulls.push(link.clone());
        Ok(Ok(link))
    }

    fn pushes(&self) -> Vec<String> {
        let push_method = &self.relay.config().push_method;
        self.runtime
            .sent_calls(&self.channel)
            .into_iter()
            .filter(|call| &call.method == push_method)
            .filter_map(|call| call.args.as_str().map(str::to_string))
            .collect()
    }
}
