//! The cancellation-signal seam.
//!
//! A [`Signal`] is the coordinator's view of an external "token +
//! registration" cancellation primitive: a static fact (can it ever fire), a
//! point-in-time query (has it fired), and at-most-once callback delivery.
//! The production implementation over `tokio_util`'s `CancellationToken`
//! lives in [`crate::token`]; tests substitute their own.

/// A one-shot callback delivered when the signal fires.
pub type Callback = Box<dyn FnOnce() + Send>;

/// A cancellation signal as the coordinator consumes it.
///
/// # Delivery contract
///
/// Implementations must deliver a registered callback **at most once**, from
/// an arbitrary thread, and must **never invoke it synchronously inside
/// [`register`](Signal::register)**: the registering caller holds a lock the
/// callback also takes. In particular, if the signal fires between the
/// caller's [`has_fired`](Signal::has_fired) check and its `register` call
/// (or has already fired when `register` runs), the callback must still be
/// delivered, from another thread or task. A fire concurrent with
/// registration is therefore delayed, never lost.
pub trait Signal: Send + Sync {
    /// Whether this signal can ever fire. A `false` here is a static,
    /// per-signal fact that never changes.
    fn can_fire(&self) -> bool;

    /// Whether a cancellation has been requested on this signal.
    fn has_fired(&self) -> bool;

    /// Registers `callback` to run when (and if) the signal fires, returning
    /// a handle that unregisters it on drop.
    fn register(&self, callback: Callback) -> Registration;
}

/// Scoped handle to a callback registration.
///
/// Dropping it unregisters the callback if it has not yet been delivered; if
/// the callback already ran (or is running), dropping is a no-op. A
/// registration never blocks on drop.
pub struct Registration(Option<Box<dyn FnOnce() + Send>>);

impl Registration {
    /// A registration backed by `unregister`, run once on drop.
    pub fn new(unregister: impl FnOnce() + Send + 'static) -> Self {
        Self(Some(Box::new(unregister)))
    }

    /// A registration with nothing to release.
    pub fn none() -> Self {
        Self(None)
    }
}

impl Drop for Registration {
    fn drop(&mut self) {
        if let Some(unregister) = self.0.take() {
            unregister();
        }
    }
}

impl std::fmt::Debug for Registration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Registration")
            .field(&self.0.as_ref().map(|_| "active"))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn registration_runs_unregister_once_on_drop() {
        let count = Arc::new(AtomicUsize::new(0));
        let c = count.clone();
        let reg = Registration::new(move || {
            c.fetch_add(1, Ordering::SeqCst);
        });
        assert_eq!(count.load(Ordering::SeqCst), 0);
        drop(reg);
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn empty_registration_is_a_noop() {
        drop(Registration::none());
    }
}
