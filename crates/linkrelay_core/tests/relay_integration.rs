//! Integration tests for the deep-link relay
//!
//! These tests drive the relay only through its public surface:
//! activation events on the host side and encoded channel frames on the
//! runtime side.

use linkrelay_core::{
    ActivationEvent, ActivationKind, ActivationOutcome, DeepLinkRelay, InMemoryMessenger,
    JsonMethodCodec, MethodCall, MethodResponse, RelayConfig,
};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

const APP_ID: &str = "com.example.ygit_app";
const CHANNEL: &str = "com.example.ygit_app/deeplink";

fn pull(runtime: &InMemoryMessenger) -> MethodResponse {
    runtime.call(CHANNEL, "getInitialLink", Value::Null).unwrap()
}

/// Cold start with a link, runtime boots later and pulls twice
#[test]
fn test_cold_start_then_pull_twice() {
    let mut relay = DeepLinkRelay::new(RelayConfig::new(APP_ID)).unwrap();
    let outcome = relay.on_activation_event(&ActivationEvent::launch("myapp://open/item/42"));
    assert_eq!(outcome, ActivationOutcome::Held);

    let runtime = InMemoryMessenger::new();
    relay.on_runtime_ready(runtime.clone());

    // Nothing is pushed for a link that arrived before the channel existed
    assert!(runtime.sent().is_empty());
    assert_eq!(pull(&runtime), MethodResponse::Success(json!("myapp://open/item/42")));
    assert_eq!(pull(&runtime), MethodResponse::Success(Value::Null));
}

/// Warm activations push immediately and stay pullable
#[test]
fn test_warm_activations_push_each_link() {
    let mut relay = DeepLinkRelay::new(RelayConfig::new(APP_ID)).unwrap();
    let runtime = InMemoryMessenger::new();
    relay.on_runtime_ready(runtime.clone());

    relay.on_activation_event(&ActivationEvent::new_intent("myapp://a"));
    relay.on_activation_event(&ActivationEvent::empty(ActivationKind::NewIntent));
    relay.on_activation_event(&ActivationEvent::new_intent("myapp://b"));

    assert_eq!(
        runtime.sent_calls(CHANNEL),
        vec![
            MethodCall::new("handleDeepLink", json!("myapp://a")),
            MethodCall::new("handleDeepLink", json!("myapp://b")),
        ]
    );
    assert_eq!(pull(&runtime), MethodResponse::Success(json!("myapp://b")));
}

#[test]
fn test_pull_with_nothing_pending() {
    let mut relay = DeepLinkRelay::new(RelayConfig::new(APP_ID)).unwrap();
    let runtime = InMemoryMessenger::new();
    relay.on_runtime_ready(runtime.clone());

    assert_eq!(pull(&runtime), MethodResponse::Success(Value::Null));
}

#[test]
fn test_raw_frames_on_the_wire() {
    let mut relay = DeepLinkRelay::new(RelayConfig::new(APP_ID)).unwrap();
    let runtime = InMemoryMessenger::new();
    relay.on_runtime_ready(runtime.clone());
    relay.on_activation_event(&ActivationEvent::new_intent("myapp://wire"));

    let (channel, frame) = runtime.sent().remove(0);
    assert_eq!(channel, CHANNEL);
    assert_eq!(
        serde_json::from_slice::<Value>(&frame).unwrap(),
        json!({ "method": "handleDeepLink", "args": "myapp://wire" })
    );

    let reply = runtime
        .dispatch(CHANNEL, br#"{"method":"getInitialLink","args":null}"#)
        .unwrap();
    assert_eq!(reply, br#"["myapp://wire"]"#.to_vec());

    // Unknown verbs get the empty reply
    assert_eq!(
        runtime.dispatch(CHANNEL, br#"{"method":"reset"}"#),
        None
    );
}

#[test]
fn test_malformed_frame_leaves_slot_untouched() {
    let mut relay = DeepLinkRelay::new(RelayConfig::new(APP_ID)).unwrap();
    let runtime = InMemoryMessenger::new();
    relay.on_activation_event(&ActivationEvent::launch("myapp://safe"));
    relay.on_runtime_ready(runtime.clone());

    let reply = runtime.dispatch(CHANNEL, b"{\"method\":").unwrap();
    let response = JsonMethodCodec.decode_envelope(&reply).unwrap();

    assert!(matches!(response, MethodResponse::Error { .. }));
    assert_eq!(relay.pending_link().as_deref(), Some("myapp://safe"));
}

#[test]
fn test_custom_verbs_from_config() {
    let config = RelayConfig::from_toml_str(
        r#"
        [relay]
        app_id = "org.example.reader"
        channel_suffix = "links"
        push_method = "onLink"
        pull_method = "takeLink"
        "#,
    )
    .unwrap();
    let mut relay = DeepLinkRelay::new(config).unwrap();
    let runtime = InMemoryMessenger::new();
    relay.on_runtime_ready(runtime.clone());

    relay.on_activation_event(&ActivationEvent::new_intent("reader://book/7"));

    assert_eq!(
        runtime.sent_calls("org.example.reader/links"),
        vec![MethodCall::new("onLink", json!("reader://book/7"))]
    );
    assert_eq!(
        runtime
            .call("org.example.reader/links", "takeLink", Value::Null)
            .unwrap(),
        MethodResponse::Success(json!("reader://book/7"))
    );
    assert_eq!(
        runtime
            .call("org.example.reader/links", "getInitialLink", Value::Null)
            .unwrap(),
        MethodResponse::NotImplemented
    );
}
