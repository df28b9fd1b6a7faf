//! The change-tracking capability.

/// Something that remembers whether it was modified since it was last saved.
///
/// Implemented by [`Proxy`](crate::Proxy). A fresh proxy is clean; setting
/// any non-key property marks it dirty; [`mark_clean`](Self::mark_clean)
/// resets it, typically after a successful save.
pub trait ChangeTracking {
    /// Has any tracked property been written since the last reset?
    fn is_dirty(&self) -> bool;

    /// Write the flag directly. This never marks anything else.
    fn set_dirty(&mut self, dirty: bool);

    fn mark_clean(&mut self) {
        self.set_dirty(false);
    }
}
