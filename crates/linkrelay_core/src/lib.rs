//! Linkrelay Core
//!
//! Captures deep links delivered to a host activity and hands them to an
//! embedded application runtime over a named message channel:
//!
//! - **Pending slot**: the most recent unread link, last write wins
//! - **Push delivery**: `handleDeepLink(url)` sent as soon as the runtime is connected
//! - **Pull delivery**: `getInitialLink` returns the held link once, then clears it
//!
//! # Example
//!
//! ```rust
//! use linkrelay_core::{ActivationEvent, DeepLinkRelay, InMemoryMessenger, MethodResponse, RelayConfig};
//! use serde_json::{json, Value};
//!
//! let mut relay = DeepLinkRelay::new(RelayConfig::new("com.example.app")).unwrap();
//! relay.on_activation_event(&ActivationEvent::launch("myapp://open/item/42"));
//!
//! let runtime = InMemoryMessenger::new();
//! relay.on_runtime_ready(runtime.clone());
//!
//! let first = runtime.call("com.example.app/deeplink", "getInitialLink", Value::Null).unwrap();
//! assert_eq!(first, MethodResponse::Success(json!("myapp://open/item/42")));
//!
//! let second = runtime.call("com.example.app/deeplink", "getInitialLink", Value::Null).unwrap();
//! assert_eq!(second, MethodResponse::Success(Value::Null));
//! ```

pub mod activation;
pub mod channel;
pub mod codec;
pub mod config;
pub mod error;
pub mod link;
pub mod memory;
pub mod relay;

pub use activation::{ActivationEvent, ActivationKind};
pub use channel::{
    BinaryMessageHandler, BinaryMessenger, HandlerRegistry, MethodCall, MethodChannel,
    MethodResponse,
};
pub use codec::JsonMethodCodec;
pub use config::RelayConfig;
pub use error::{RelayError, Result};
pub use link::PendingLink;
pub use memory::InMemoryMessenger;
pub use relay::{handle_method_call, ActivationOutcome, DeepLinkRelay, PendingLinkCell};
