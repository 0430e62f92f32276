//! JNI bridge for the Java host activity
//!
//! The Java side (`com.linkrelay.LinkRelayBridge`) forwards activity
//! callbacks and runtime channel traffic here. Every entry point runs on the
//! activity's main thread, so the host state lives in thread-locals.
//!
//! Call order: `nativeOnCreate` once per activity instance, and
//! `nativeConfigureEngine` once the engine exists. The two may come in either
//! order; the framework usually configures the engine first, from inside the
//! activity's own `onCreate`. `nativeOnNewIntent` is only honored after
//! `nativeOnCreate`. `nativeOnMessage` may arrive at any time.

use std::cell::RefCell;
use std::ptr;

use jni::objects::{GlobalRef, JByteArray, JClass, JObject, JString, JValue};
use jni::sys::jbyteArray;
use jni::{JNIEnv, JavaVM};
use linkrelay_core::{
    BinaryMessageHandler, BinaryMessenger, HandlerRegistry, RelayConfig, RelayError, Result,
};
use tracing::{debug, warn};

use crate::activity::HostSlot;
use crate::intent::Intent;
use crate::logging::init_logging;

const LOG_TAG: &str = "Linkrelay";

thread_local! {
    static HOST: RefCell<HostSlot<JniMessenger>> = const { RefCell::new(HostSlot::new()) };
    static HANDLERS: HandlerRegistry = HandlerRegistry::new();
}

fn messenger_error(err: jni::errors::Error) -> RelayError {
    RelayError::Messenger(err.to_string())
}

/// Messenger backed by the engine's Java `BinaryMessenger` wrapper.
///
/// The wrapper must expose `void send(String channel, byte[] message)`.
/// Inbound frames arrive through `nativeOnMessage`.
pub struct JniMessenger {
    vm: JavaVM,
    target: GlobalRef,
}

impl BinaryMessenger for JniMessenger {
    fn send(&self, channel: &str, message: Vec<u8>) -> Result<()> {
        let mut env = self.vm.attach_current_thread().map_err(messenger_error)?;
        let channel = env.new_string(channel).map_err(messenger_error)?;
        let bytes = env.byte_array_from_slice(&message).map_err(messenger_error)?;
        env.call_method(
            &self.target,
            "send",
            "(Ljava/lang/String;[B)V",
            &[JValue::Object(&channel), JValue::Object(&bytes)],
        )
        .map_err(messenger_error)?;
        Ok(())
    }

    fn set_message_handler(&self, channel: &str, handler: Option<BinaryMessageHandler>) {
        HANDLERS.with(|handlers| handlers.set(channel, handler));
    }
}

fn read_string(env: &mut JNIEnv, value: &JString) -> Option<String> {
    if value.is_null() {
        return None;
    }
    match env.get_string(value) {
        Ok(value) => Some(value.into()),
        Err(err) => {
            warn!(error = %err, "failed to read Java string");
            None
        }
    }
}

#[no_mangle]
pub extern "system" fn Java_com_linkrelay_LinkRelayBridge_nativeOnCreate<'local>(
    mut env: JNIEnv<'local>,
    _class: JClass<'local>,
    app_id: JString<'local>,
    action: JString<'local>,
    data: JString<'local>,
) {
    init_logging(LOG_TAG);

    let Some(app_id) = read_string(&mut env, &app_id) else {
        warn!("nativeOnCreate called without an app id, deep-link relay disabled");
        HOST.with(|slot| slot.borrow_mut().clear());
        return;
    };
    let intent = Intent::new(read_string(&mut env, &action), read_string(&mut env, &data));

    HOST.with(|slot| {
        match slot
            .borrow_mut()
            .on_create(RelayConfig::new(app_id), Some(intent))
        {
            Ok(outcome) => debug!(?outcome, "launch intent handled"),
            Err(err) => warn!(error = %err, "deep-link relay disabled"),
        }
    });
}

#[no_mangle]
pub extern "system" fn Java_com_linkrelay_LinkRelayBridge_nativeOnNewIntent<'local>(
    mut env: JNIEnv<'local>,
    _class: JClass<'local>,
    action: JString<'local>,
    data: JString<'local>,
) {
    let intent = Intent::new(read_string(&mut env, &action), read_string(&mut env, &data));
    HOST.with(|slot| match slot.borrow_mut().on_new_intent(intent) {
        Some(outcome) => debug!(?outcome, "new intent handled"),
        None => warn!("nativeOnNewIntent before nativeOnCreate"),
    });
}

#[no_mangle]
pub extern "system" fn Java_com_linkrelay_LinkRelayBridge_nativeConfigureEngine<'local>(
    env: JNIEnv<'local>,
    _class: JClass<'local>,
    messenger: JObject<'local>,
) {
    let vm = match env.get_java_vm() {
        Ok(vm) => vm,
        Err(err) => {
            warn!(error = %err, "no JavaVM for engine messenger");
            return;
        }
    };
    let target = match env.new_global_ref(&messenger) {
        Ok(target) => target,
        Err(err) => {
            warn!(error = %err, "failed to retain engine messenger");
            return;
        }
    };

    HOST.with(|slot| {
        slot.borrow_mut()
            .configure_engine(JniMessenger { vm, target })
    });
}

/// Deliver a runtime frame. Returns the reply, or null for the empty reply.
#[no_mangle]
pub extern "system" fn Java_com_linkrelay_LinkRelayBridge_nativeOnMessage<'local>(
    mut env: JNIEnv<'local>,
    _class: JClass<'local>,
    channel: JString<'local>,
    message: JByteArray<'local>,
) -> jbyteArray {
    let Some(channel) = read_string(&mut env, &channel) else {
        return ptr::null_mut();
    };
    let frame = if message.is_null() {
        Vec::new()
    } else {
        match env.convert_byte_array(&message) {
            Ok(frame) => frame,
            Err(err) => {
                warn!(channel = %channel, error = %err, "failed to read runtime frame");
                return ptr::null_mut();
            }
        }
    };

    let Some(reply) = HANDLERS.with(|handlers| handlers.dispatch(&channel, &frame)) else {
        return ptr::null_mut();
    };
    debug!(channel = %channel, bytes = reply.len(), "replying to runtime");
    match env.byte_array_from_slice(&reply) {
        Ok(array) => array.into_raw(),
        Err(err) => {
            warn!(error = %err, "failed to allocate reply");
            ptr::null_mut()
        }
    }
}
