//! Message channel boundary to the embedded runtime.
//!
//! The runtime is reached only through a [`BinaryMessenger`]: named channels
//! carrying opaque byte frames. [`MethodChannel`] layers verb/argument calls
//! on top using the [`JsonMethodCodec`].

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use serde_json::Value;
use tracing::{debug, warn};

use crate::codec::JsonMethodCodec;
use crate::error::Result;

/// Handler for inbound frames on one channel. `None` is the empty reply.
pub type BinaryMessageHandler = Box<dyn FnMut(&[u8]) -> Option<Vec<u8>> + 'static>;

/// Byte-level messenger connecting the host to the embedded runtime.
///
/// All calls happen on the host UI thread.
pub trait BinaryMessenger {
    /// Send a frame to the runtime without waiting for a reply.
    fn send(&self, channel: &str, message: Vec<u8>) -> Result<()>;

    /// Register or clear the handler for frames the runtime sends on `channel`.
    fn set_message_handler(&self, channel: &str, handler: Option<BinaryMessageHandler>);
}

/// Channel-keyed handler table shared by messenger implementations.
#[derive(Default)]
pub struct HandlerRegistry {
    handlers: RefCell<HashMap<String, Rc<RefCell<BinaryMessageHandler>>>>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, channel: &str, handler: Option<BinaryMessageHandler>) {
        let mut handlers = self.handlers.borrow_mut();
        match handler {
            Some(handler) => {
                handlers.insert(channel.to_string(), Rc::new(RefCell::new(handler)));
            }
            None => {
                handlers.remove(channel);
            }
        }
    }

    pub fn contains(&self, channel: &str) -> bool {
        self.handlers.borrow().contains_key(channel)
    }

    /// Deliver an inbound frame to the channel's handler.
    ///
    /// The table is not borrowed while the handler runs, so a handler may
    /// register or clear handlers itself. A frame dispatched to a channel
    /// whose handler is already running gets the empty reply.
    pub fn dispatch(&self, channel: &str, message: &[u8]) -> Option<Vec<u8>> {
        let handler = self.handlers.borrow().get(channel).cloned();
        let Some(handler) = handler else {
            debug!(channel, "no handler registered, replying empty");
            return None;
        };
        let Ok(mut handler) = handler.try_borrow_mut() else {
            warn!(channel, "handler re-entered from its own dispatch, replying empty");
            return None;
        };
        (&mut *handler)(message)
    }
}

/// A verb invocation with JSON arguments.
#[derive(Clone, Debug, PartialEq)]
pub struct MethodCall {
    pub method: String,
    pub args: Value,
}

impl MethodCall {
    pub fn new(method: impl Into<String>, args: Value) -> Self {
        Self {
            method: method.into(),
            args,
        }
    }
}

/// Structured reply to a [`MethodCall`].
#[derive(Clone, Debug, PartialEq)]
pub enum MethodResponse {
    /// The call succeeded; `Value::Null` means "absent".
    Success(Value),
    /// The call was understood but failed.
    Error {
        code: String,
        message: Option<String>,
        details: Value,
    },
    /// The verb is not handled on this channel.
    NotImplemented,
}

/// Named verb channel over a [`BinaryMessenger`].
pub struct MethodChannel<M: BinaryMessenger> {
    name: String,
    codec: JsonMethodCodec,
    messenger: M,
}

impl<M: BinaryMessenger> MethodChannel<M> {
    pub fn new(messenger: M, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            codec: JsonMethodCodec,
            messenger,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Give back the messenger. Handlers already registered stay in place.
    pub fn into_messenger(self) -> M {
        self.messenger
    }

    /// Send a one-way call. No reply is awaited.
    pub fn invoke_method(&self, method: &str, args: Value) -> Result<()> {
        let frame = self
            .codec
            .encode_method_call(&MethodCall::new(method, args))?;
        self.messenger.send(&self.name, frame)
    }

    /// Install the handler answering calls the runtime makes on this channel.
    ///
    /// Frames that fail to decode are answered with a `malformed_call` error
    /// envelope without reaching `handler`.
    pub fn set_method_call_handler<F>(&self, mut handler: F)
    where
        F: FnMut(&MethodCall) -> MethodResponse + 'static,
    {
        let codec = self.codec;
        let channel = self.name.clone();
        let binary: BinaryMessageHandler = Box::new(move |message| {
            let response = match codec.decode_method_call(message) {
                Ok(call) => handler(&call),
                Err(err) => {
                    warn!(channel = %channel, error = %err, "rejecting malformed method call");
                    MethodResponse::Error {
                        code: "malformed_call".to_string(),
                        message: Some(err.to_string()),
                        details: Value::Null,
                    }
                }
            };

            match codec.encode_envelope(&response) {
                Ok(reply) if reply.is_empty() => None,
                Ok(reply) => Some(reply),
                Err(err) => {
                    warn!(channel = %channel, error = %err, "failed to encode reply");
                    None
                }
            }
        });
        self.messenger.set_message_handler(&self.name, Some(binary));
    }

    pub fn clear_method_call_handler(&self) {
        self.messenger.set_message_handler(&self.name, None);
    }
}
