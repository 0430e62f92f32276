//! Linkrelay Android Platform
//!
//! Host activity lifecycle and JNI bridge for the deep-link relay.

pub mod activity;
pub mod intent;
pub mod logging;

// Android-specific JNI exports
#[cfg(target_os = "android")]
pub mod jni_bridge;

pub use activity::{HostActivity, HostSlot};
pub use intent::{Intent, ACTION_VIEW};
pub use logging::init_logging;

#[cfg(target_os = "android")]
pub use jni_bridge::JniMessenger;
