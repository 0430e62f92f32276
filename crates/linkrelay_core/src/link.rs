//! The single-slot holder for a deep link awaiting pickup.

/// The most recent deep link the runtime has not pulled yet.
///
/// Holds at most one URL. A new link overwrites an unread one.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PendingLink {
    url: Option<String>,
}

impl PendingLink {
    /// Create an empty slot.
    pub const fn new() -> Self {
        Self { url: None }
    }

    /// Store a link, returning the unread link it replaced.
    pub fn store(&mut self, url: impl Into<String>) -> Option<String> {
        self.url.replace(url.into())
    }

    /// Look at the held link without consuming it.
    pub fn peek(&self) -> Option<&str> {
        self.url.as_deref()
    }

    /// Read and clear the held link.
    pub fn take(&mut self) -> Option<String> {
        self.url.take()
    }

    pub fn is_empty(&self) -> bool {
        self.url.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_slot_is_empty() {
        let mut link = PendingLink::new();

        assert!(link.is_empty());
        assert_eq!(link.peek(), None);
        assert_eq!(link.take(), None);
    }

    #[test]
    fn test_take_clears_slot() {
        let mut link = PendingLink::new();
        link.store("myapp://open/item/42");

        assert_eq!(link.take().as_deref(), Some("myapp://open/item/42"));
        assert!(link.is_empty());
        assert_eq!(link.take(), None);
    }

    #[test]
    fn test_store_overwrites_unread_link() {
        let mut link = PendingLink::new();

        assert_eq!(link.store("myapp://first"), None);
        assert_eq!(link.store("myapp://second").as_deref(), Some("myapp://first"));
        assert_eq!(link.peek(), Some("myapp://second"));
    }
}
