//! Host activity lifecycle
//!
//! Mirrors the three activity callbacks that matter for deep links: the
//! launch intent, every later intent delivered to the running activity, and
//! the moment the embedded runtime's messenger becomes available. The last
//! two may arrive in either order; [`HostSlot`] reconciles them.

use linkrelay_core::{
    ActivationKind, ActivationOutcome, BinaryMessenger, DeepLinkRelay, RelayConfig, Result,
};
use tracing::debug;

use crate::intent::Intent;

/// Deep-link side of the host activity.
pub struct HostActivity<M: BinaryMessenger> {
    relay: DeepLinkRelay<M>,
    intent: Option<Intent>,
}

impl<M: BinaryMessenger> HostActivity<M> {
    pub fn new(config: RelayConfig) -> Result<Self> {
        Ok(Self {
            relay: DeepLinkRelay::new(config)?,
            intent: None,
        })
    }

    /// Activity created. The launch intent may be absent.
    pub fn on_create(&mut self, intent: Option<Intent>) -> ActivationOutcome {
        debug!(has_intent = intent.is_some(), "host activity created");
        self.intent = intent;
        match &self.intent {
            Some(intent) => self
                .relay
                .on_activation_event(&intent.to_activation(ActivationKind::Launch)),
            None => ActivationOutcome::Ignored,
        }
    }

    /// A new intent reached the running activity. It becomes the current intent.
    pub fn on_new_intent(&mut self, intent: Intent) -> ActivationOutcome {
        let event = intent.to_activation(ActivationKind::NewIntent);
        self.intent = Some(intent);
        self.relay.on_activation_event(&event)
    }

    /// The embedded runtime is running and its messenger can carry calls.
    pub fn configure_engine(&mut self, messenger: M) {
        self.relay.on_runtime_ready(messenger);
    }

    /// The intent the activity was last started or resumed with.
    pub fn current_intent(&self) -> Option<&Intent> {
        self.intent.as_ref()
    }

    pub fn relay(&self) -> &DeepLinkRelay<M> {
        &self.relay
    }

    /// Drop the activity state, keeping the engine messenger if one was configured.
    pub fn into_engine(self) -> Option<M> {
        self.relay.into_messenger()
    }
}

/// Holder for the current activity, tolerant of callback order.
///
/// The engine may be configured before the activity is created (the host
/// framework configures it while the activity is still being created), or
/// after. Whichever comes first, the relay ends up connected once both have
/// happened.
pub struct HostSlot<M: BinaryMessenger> {
    host: Option<HostActivity<M>>,
    engine: Option<M>,
}

impl<M: BinaryMessenger> Default for HostSlot<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: BinaryMessenger> HostSlot<M> {
    pub const fn new() -> Self {
        Self {
            host: None,
            engine: None,
        }
    }

    /// Install a fresh host for a newly created activity.
    ///
    /// Any previous host is dropped first; on error the slot is left empty.
    /// A configured engine carries over to the new host.
    pub fn on_create(
        &mut self,
        config: RelayConfig,
        intent: Option<Intent>,
    ) -> Result<ActivationOutcome> {
        let previous = self.host.take().and_then(HostActivity::into_engine);
        let engine = self.engine.take().or(previous);

        let mut host = match HostActivity::new(config) {
            Ok(host) => host,
            Err(err) => {
                self.engine = engine;
                return Err(err);
            }
        };
        if let Some(engine) = engine {
            host.configure_engine(engine);
        }
        let outcome = host.on_create(intent);
        self.host = Some(host);
        Ok(outcome)
    }

    /// Returns `None` when no activity has been created.
    pub fn on_new_intent(&mut self, intent: Intent) -> Option<ActivationOutcome> {
        self.host.as_mut().map(|host| host.on_new_intent(intent))
    }

    /// Connect the engine now, or hold it until the activity is created.
    pub fn configure_engine(&mut self, messenger: M) {
        match self.host.as_mut() {
            Some(host) => host.configure_engine(messenger),
            None => {
                debug!("engine configured before activity creation, deferring");
                self.engine = Some(messenger);
            }
        }
    }

    /// Forget the current activity. A configured engine is kept.
    pub fn clear(&mut self) {
        if let Some(engine) = self.host.take().and_then(HostActivity::into_engine) {
            self.engine = Some(engine);
        }
    }

    pub fn host(&self) -> Option<&HostActivity<M>> {
        self.host.as_ref()
    }
}
