//! Deep-link relay between host activations and the embedded runtime.
//!
//! Links arrive from the OS through [`DeepLinkRelay::on_activation_event`].
//! Each one is held in a [`PendingLink`] slot until the runtime pulls it with
//! the pull verb, and is also pushed right away when the runtime channel is
//! connected. Pushing does not clear the slot.

use std::cell::RefCell;
use std::rc::Rc;

use serde_json::Value;
use tracing::{debug, warn};

use crate::activation::ActivationEvent;
use crate::channel::{BinaryMessenger, MethodCall, MethodChannel, MethodResponse};
use crate::config::RelayConfig;
use crate::error::Result;
use crate::link::PendingLink;

/// Slot shared between the relay and its channel handler.
pub type PendingLinkCell = Rc<RefCell<PendingLink>>;

/// What the relay did with an activation event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActivationOutcome {
    /// The event carried no URL.
    Ignored,
    /// Stored; no runtime channel is connected yet.
    Held,
    /// Stored and pushed to the runtime.
    Pushed,
    /// Stored, but the push was rejected by the messenger.
    PushFailed,
}

/// Bridges OS activation events to the embedded runtime.
pub struct DeepLinkRelay<M: BinaryMessenger> {
    config: RelayConfig,
    pending: PendingLinkCell,
    channel: Option<MethodChannel<M>>,
}

impl<M: BinaryMessenger> DeepLinkRelay<M> {
    /// Create a disconnected relay with an empty slot.
    pub fn new(config: RelayConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            pending: Rc::new(RefCell::new(PendingLink::new())),
            channel: None,
        })
    }

    pub fn config(&self) -> &RelayConfig {
        &self.config
    }

    pub fn channel_name(&self) -> String {
        self.config.channel_name()
    }

    pub fn is_connected(&self) -> bool {
        self.channel.is_some()
    }

    /// The held link, without consuming it.
    pub fn pending_link(&self) -> Option<String> {
        self.pending.borrow().peek().map(str::to_string)
    }

    /// Handle an OS activation.
    ///
    /// Never fails: a missing URL is a no-op and a failed push leaves the
    /// link held for a later pull.
    pub fn on_activation_event(&mut self, event: &ActivationEvent) -> ActivationOutcome {
        let Some(url) = event.url() else {
            debug!(kind = event.kind.as_str(), "activation without deep link");
            return ActivationOutcome::Ignored;
        };

        if let Some(dropped) = self.pending.borrow_mut().store(url) {
            debug!(dropped = %dropped, "replacing unread deep link");
        }
        debug!(kind = event.kind.as_str(), url, "deep link held");

        let Some(channel) = &self.channel else {
            return ActivationOutcome::Held;
        };

        match channel.invoke_method(&self.config.push_method, Value::String(url.to_string())) {
            Ok(()) => {
                debug!(channel = channel.name(), url, "deep link pushed");
                ActivationOutcome::Pushed
            }
            Err(err) => {
                warn!(channel = channel.name(), error = %err, "deep link push failed, kept for pull");
                ActivationOutcome::PushFailed
            }
        }
    }

    /// Connect to the runtime once its messenger is available.
    ///
    /// Registers the pull handler on the relay channel. Calling this again
    /// replaces the earlier connection.
    pub fn on_runtime_ready(&mut self, messenger: M) {
        if let Some(previous) = self.channel.take() {
            debug!(channel = previous.name(), "replacing runtime connection");
            previous.clear_method_call_handler();
        }

        let channel = MethodChannel::new(messenger, self.config.channel_name());
        let pending = Rc::clone(&self.pending);
        let pull_method = self.config.pull_method.clone();
        channel.set_method_call_handler(move |call| {
            handle_method_call(&pending, call, &pull_method)
        });

        debug!(channel = channel.name(), "runtime channel connected");
        self.channel = Some(channel);
    }

    /// Tear the relay down, returning the runtime messenger if connected.
    ///
    /// The pull handler stays registered until the next relay connected to
    /// the same messenger replaces it.
    pub fn into_messenger(self) -> Option<M> {
        self.channel.map(MethodChannel::into_messenger)
    }
}

/// Answer a runtime call against the pending slot.
///
/// The pull verb returns the held link (or null) and clears the slot. Every
/// other verb is not implemented.
pub fn handle_method_call(
    pending: &RefCell<PendingLink>,
    call: &MethodCall,
    pull_method: &str,
) -> MethodResponse {
    if call.method != pull_method {
        debug!(method = %call.method, "unhandled relay verb");
        return MethodResponse::NotImplemented;
    }

    match pending.borrow_mut().take() {
        Some(url) => MethodResponse::Success(Value::String(url)),
        None => MethodResponse::Success(Value::Null),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activation::ActivationKind;
    use crate::memory::InMemoryMessenger;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    const CHANNEL: &str = "com.example.app/deeplink";

    fn relay() -> DeepLinkRelay<InMemoryMessenger> {
        DeepLinkRelay::new(RelayConfig::new("com.example.app")).unwrap()
    }

    fn pull(messenger: &InMemoryMessenger) -> MethodResponse {
        messenger
            .call(CHANNEL, "getInitialLink", Value::Null)
            .unwrap()
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let result = DeepLinkRelay::<InMemoryMessenger>::new(RelayConfig::new(""));
        assert!(result.is_err());
    }

    #[test]
    fn test_pull_returns_link_once() {
        let mut relay = relay();
        let messenger = InMemoryMessenger::new();
        relay.on_activation_event(&ActivationEvent::launch("myapp://open/item/42"));
        relay.on_runtime_ready(messenger.clone());

        assert_eq!(pull(&messenger), MethodResponse::Success(json!("myapp://open/item/42")));
        assert_eq!(pull(&messenger), MethodResponse::Success(Value::Null));
        assert_eq!(relay.pending_link(), None);
    }

    #[test]
    fn test_last_write_wins() {
        let mut relay = relay();
        let messenger = InMemoryMessenger::new();
        relay.on_activation_event(&ActivationEvent::launch("myapp://first"));
        relay.on_activation_event(&ActivationEvent::new_intent("myapp://second"));
        relay.on_runtime_ready(messenger.clone());

        assert_eq!(pull(&messenger), MethodResponse::Success(json!("myapp://second")));
        assert_eq!(pull(&messenger), MethodResponse::Success(Value::Null));
    }

    #[test]
    fn test_disconnected_activation_is_held() {
        let mut relay = relay();

        let outcome = relay.on_activation_event(&ActivationEvent::launch("myapp://x"));

        assert_eq!(outcome, ActivationOutcome::Held);
        assert!(!relay.is_connected());
        assert_eq!(relay.pending_link().as_deref(), Some("myapp://x"));
    }

    #[test]
    fn test_connected_activation_pushes_and_keeps_link() {
        let mut relay = relay();
        let messenger = InMemoryMessenger::new();
        relay.on_runtime_ready(messenger.clone());

        let outcome = relay.on_activation_event(&ActivationEvent::new_intent("myapp://y"));

        assert_eq!(outcome, ActivationOutcome::Pushed);
        assert_eq!(
            messenger.sent_calls(CHANNEL),
            vec![MethodCall::new("handleDeepLink", json!("myapp://y"))]
        );
        assert_eq!(pull(&messenger), MethodResponse::Success(json!("myapp://y")));
    }

    #[test]
    fn test_activation_without_url_changes_nothing() {
        let mut relay = relay();
        let messenger = InMemoryMessenger::new();
        relay.on_activation_event(&ActivationEvent::launch("myapp://kept"));
        relay.on_runtime_ready(messenger.clone());
        messenger.clear_sent();

        let outcome = relay.on_activation_event(&ActivationEvent::empty(ActivationKind::NewIntent));

        assert_eq!(outcome, ActivationOutcome::Ignored);
        assert!(messenger.sent().is_empty());
        assert_eq!(relay.pending_link().as_deref(), Some("myapp://kept"));
    }

    #[test]
    fn test_blank_url_is_held_and_pushed() {
        let mut relay = relay();
        let messenger = InMemoryMessenger::new();
        relay.on_runtime_ready(messenger.clone());

        let outcome = relay.on_activation_event(&ActivationEvent::launch(" "));

        assert_eq!(outcome, ActivationOutcome::Pushed);
        assert_eq!(relay.pending_link().as_deref(), Some(" "));
        assert_eq!(
            messenger.sent_calls(CHANNEL),
            vec![MethodCall::new("handleDeepLink", json!(" "))]
        );
    }

    #[test]
    fn test_failed_push_keeps_link_for_pull() {
        let mut relay = relay();
        let messenger = InMemoryMessenger::new();
        relay.on_runtime_ready(messenger.clone());
        messenger.set_fail_sends(true);

        let outcome = relay.on_activation_event(&ActivationEvent::new_intent("myapp://z"));

        assert_eq!(outcome, ActivationOutcome::PushFailed);
        assert_eq!(pull(&messenger), MethodResponse::Success(json!("myapp://z")));
    }

    #[test]
    fn test_unknown_verb_is_not_implemented() {
        let mut relay = relay();
        let messenger = InMemoryMessenger::new();
        relay.on_activation_event(&ActivationEvent::launch("myapp://held"));
        relay.on_runtime_ready(messenger.clone());

        let response = messenger.call(CHANNEL, "getLatestLink", Value::Null).unwrap();

        assert_eq!(response, MethodResponse::NotImplemented);
        assert_eq!(relay.pending_link().as_deref(), Some("myapp://held"));
    }

    #[test]
    fn test_reconnect_moves_handler_to_new_messenger() {
        let mut relay = relay();
        let first = InMemoryMessenger::new();
        let second = InMemoryMessenger::new();
        relay.on_runtime_ready(first.clone());
        relay.on_runtime_ready(second.clone());

        assert!(!first.has_handler(CHANNEL));
        assert!(second.has_handler(CHANNEL));
    }

    #[test]
    fn test_into_messenger_hands_connection_to_next_relay() {
        let mut first = relay();
        let messenger = InMemoryMessenger::new();
        first.on_activation_event(&ActivationEvent::launch("myapp://stale"));
        first.on_runtime_ready(messenger.clone());

        let engine = first.into_messenger().unwrap();
        let mut second = relay();
        second.on_runtime_ready(engine);
        second.on_activation_event(&ActivationEvent::launch("myapp://fresh"));

        assert_eq!(pull(&messenger), MethodResponse::Success(json!("myapp://fresh")));
        assert!(relay().into_messenger().is_none());
    }

    #[test]
    fn test_handle_method_call_uses_configured_pull_verb() {
        let pending = RefCell::new(PendingLink::new());
        pending.borrow_mut().store("myapp://custom");

        let default_verb = MethodCall::new("getInitialLink", Value::Null);
        assert_eq!(
            handle_method_call(&pending, &default_verb, "consumeLink"),
            MethodResponse::NotImplemented
        );

        let custom_verb = MethodCall::new("consumeLink", Value::Null);
        assert_eq!(
            handle_method_call(&pending, &custom_verb, "consumeLink"),
            MethodResponse::Success(json!("myapp://custom"))
        );
    }
}
