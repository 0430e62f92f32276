//! OS activation events that may carry a deep link.

/// Which host entry point produced the activation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ActivationKind {
    /// Process cold start.
    Launch,
    /// An already-running activity was brought to the foreground with a new intent.
    NewIntent,
}

impl ActivationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivationKind::Launch => "launch",
            ActivationKind::NewIntent => "new_intent",
        }
    }
}

/// An activation delivered by the OS, with an optional URL payload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActivationEvent {
    pub kind: ActivationKind,
    url: Option<String>,
}

impl ActivationEvent {
    /// Create an activation event. Only `None` means "no link"; any text,
    /// blank included, is carried as-is.
    pub fn new(kind: ActivationKind, url: Option<String>) -> Self {
        Self { kind, url }
    }

    /// Cold start activation.
    pub fn launch(url: impl Into<String>) -> Self {
        Self::new(ActivationKind::Launch, Some(url.into()))
    }

    /// Foreground activation with a new intent.
    pub fn new_intent(url: impl Into<String>) -> Self {
        Self::new(ActivationKind::NewIntent, Some(url.into()))
    }

    /// Activation without a URL payload.
    pub fn empty(kind: ActivationKind) -> Self {
        Self { kind, url: None }
    }

    /// The URL carried by this activation, as delivered (unvalidated).
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }
}
