//! Activity intents as seen by the relay.

use linkrelay_core::{ActivationEvent, ActivationKind};

/// Standard action for "open this URI".
pub const ACTION_VIEW: &str = "android.intent.action.VIEW";

/// The parts of an Android `Intent` the relay reads.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Intent {
    /// Intent action, e.g. [`ACTION_VIEW`].
    pub action: Option<String>,
    /// Data URI string (`Intent.getDataString()`).
    pub data: Option<String>,
}

impl Intent {
    pub fn new(action: Option<String>, data: Option<String>) -> Self {
        Self { action, data }
    }

    /// A VIEW intent carrying `uri`.
    pub fn view(uri: impl Into<String>) -> Self {
        Self {
            action: Some(ACTION_VIEW.to_string()),
            data: Some(uri.into()),
        }
    }

    /// Convert to an activation event. The data URI is passed through as-is.
    pub fn to_activation(&self, kind: ActivationKind) -> ActivationEvent {
        ActivationEvent::new(kind, self.data.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_view_intent_carries_uri() {
        let event = Intent::view("myapp://open/item/42").to_activation(ActivationKind::Launch);

        assert_eq!(event.kind, ActivationKind::Launch);
        assert_eq!(event.url(), Some("myapp://open/item/42"));
    }

    #[test]
    fn test_main_launcher_intent_has_no_link() {
        let intent = Intent::new(Some("android.intent.action.MAIN".to_string()), None);

        assert_eq!(intent.to_activation(ActivationKind::Launch).url(), None);
    }
}
