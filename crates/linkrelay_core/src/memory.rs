//! In-process messenger standing in for the embedded runtime.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use serde_json::Value;
use tracing::debug;

use crate::channel::{
    BinaryMessageHandler, BinaryMessenger, HandlerRegistry, MethodCall, MethodResponse,
};
use crate::codec::JsonMethodCodec;
use crate::error::{RelayError, Result};

#[derive(Default)]
struct MessengerState {
    registry: HandlerRegistry,
    sent: RefCell<Vec<(String, Vec<u8>)>>,
    fail_sends: Cell<bool>,
}

/// A [`BinaryMessenger`] that records outbound frames and lets the caller
/// play the runtime side of a channel.
///
/// Clones share the same state.
#[derive(Clone, Default)]
pub struct InMemoryMessenger {
    state: Rc<MessengerState>,
}

impl InMemoryMessenger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent sends fail, as a detached runtime would.
    pub fn set_fail_sends(&self, fail: bool) {
        self.state.fail_sends.set(fail);
    }

    /// Every frame sent so far, in order.
    pub fn sent(&self) -> Vec<(String, Vec<u8>)> {
        self.state.sent.borrow().clone()
    }

    /// Decoded method calls sent on `channel`, in order.
    pub fn sent_calls(&self, channel: &str) -> Vec<MethodCall> {
        self.state
            .sent
            .borrow()
            .iter()
            .filter(|(name, _)| name == channel)
            .filter_map(|(_, frame)| JsonMethodCodec.decode_method_call(frame).ok())
            .collect()
    }

    pub fn clear_sent(&self) {
        self.state.sent.borrow_mut().clear();
    }

    pub fn has_handler(&self, channel: &str) -> bool {
        self.state.registry.contains(channel)
    }

    /// Deliver a raw frame from the runtime side.
    pub fn dispatch(&self, channel: &str, message: &[u8]) -> Option<Vec<u8>> {
        self.state.registry.dispatch(channel, message)
    }

    /// Make a method call from the runtime side and decode the reply.
    pub fn call(&self, channel: &str, method: &str, args: Value) -> Result<MethodResponse> {
        let codec = JsonMethodCodec;
        let frame = codec.encode_method_call(&MethodCall::new(method, args))?;
        match self.dispatch(channel, &frame) {
            Some(reply) => codec.decode_envelope(&reply),
            None => Ok(MethodResponse::NotImplemented),
        }
    }
}

impl BinaryMessenger for InMemoryMessenger {
    fn send(&self, channel: &str, message: Vec<u8>) -> Result<()> {
        if self.state.fail_sends.get() {
            return Err(RelayError::Messenger(format!(
                "runtime not attached to channel '{channel}'"
            )));
        }
        debug!(channel, bytes = message.len(), "in-memory send");
        self.state
            .sent
            .borrow_mut()
            .push((channel.to_string(), message));
        Ok(())
    }

    fn set_message_handler(&self, channel: &str, handler: Option<BinaryMessageHandler>) {
        self.state.registry.set(channel, handler);
    }
}
