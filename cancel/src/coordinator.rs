//! Cancellation coordination for one in-flight overlapped operation.
//!
//! A [`CancelCoordinator`] sits between three parties that can touch the same
//! native `(handle, descriptor)` pair from different threads:
//!
//! - the operation's owning thread, which arms the coordinator once the
//!   request has been submitted to the OS and disarms it before freeing the
//!   descriptor;
//! - the thread delivering the cancellation signal, which requests a
//!   best-effort OS abort of the request;
//! - the OS itself, which completes the operation whenever it pleases.
//!
//! The pair lives in a single mutex-guarded slot and leaves it by
//! `Option::take` exactly once, so the abort path and the completion path can
//! never both act on it, and no abort request can start once
//! [`mark_completed`](CancelCoordinator::mark_completed) has returned.
//!
//! One coordinator covers one operation; it is not reusable.

use std::sync::{Arc, Mutex, Weak};

use trace_err::*;
use tracing::{debug, warn};

use crate::abort::{AbortIo, IoDescriptor, IoHandle};
use crate::error::{ContractError, Error};
use crate::signal::{Registration, Signal};

/// The final native status of the operation, as far as the coordinator
/// cares: either it completed (successfully or with an ordinary error the
/// caller translates elsewhere), or the OS reports it was aborted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionStatus {
    Completed,
    Aborted,
}

#[derive(Default)]
struct Inner {
    /// Set by the first `allow_cancellation`, never cleared. Arming is
    /// per-coordinator, not per-target.
    armed: bool,
    /// The exact pair an abort request must target. `Some` only between
    /// arming and whichever of {abort logic, `mark_completed`} takes it
    /// first.
    target: Option<(IoHandle, IoDescriptor)>,
    /// Live callback registration; set and cleared together with `target`.
    registration: Option<Registration>,
}

/// Coordinates cancellation of a single in-flight overlapped I/O operation.
///
/// # Protocol
///
/// 1. Construct with [`new`](CancelCoordinator::new) alongside the operation.
/// 2. Once the request has been submitted to the OS, arm with
///    [`allow_cancellation`](CancelCoordinator::allow_cancellation).
/// 3. When the operation finishes (success, native failure, or abort), call
///    [`mark_completed`](CancelCoordinator::mark_completed) **before**
///    freeing the handle or the descriptor, on every exit path.
/// 4. If the native status says the operation was aborted, ask
///    [`interpret_completion`](CancelCoordinator::interpret_completion)
///    whether that was the caller's cancellation or an external actor.
///
/// # Guarantees
///
/// - At most one platform abort request is ever issued, whether cancellation
///   arrived before arming, after arming, or raced with completion.
/// - Once `mark_completed` returns, no abort request is in flight and none
///   can start; the caller may free the handle and descriptor.
/// - An abort request is best-effort: the operation may still complete
///   normally, and a failed request is logged and dropped.
pub struct CancelCoordinator {
    signal: Arc<dyn Signal>,
    aborter: Arc<dyn AbortIo>,
    inner: Mutex<Inner>,
}

impl CancelCoordinator {
    /// Binds a new coordinator to `signal`. No side effects: nothing is
    /// registered until [`allow_cancellation`](Self::allow_cancellation).
    pub fn new(signal: Arc<dyn Signal>, aborter: Arc<dyn AbortIo>) -> Self {
        Self {
            signal,
            aborter,
            inner: Mutex::new(Inner::default()),
        }
    }

    /// A coordinator using the OS abort primitive (`CancelIoEx`).
    #[cfg(windows)]
    pub fn system(signal: Arc<dyn Signal>) -> Self {
        Self::new(signal, Arc::new(crate::windows::SystemAbort))
    }

    /// Arms the coordinator: from this moment until
    /// [`mark_completed`](Self::mark_completed), a firing signal will request
    /// an OS abort of the operation identified by `(handle, descriptor)`.
    ///
    /// `handle` must be open and `descriptor` must stay valid until
    /// `mark_completed` is called. If the signal can never fire this stores
    /// nothing and later calls are no-ops, but the coordinator still counts
    /// as armed. If the signal has already fired, the abort request is issued
    /// synchronously from this call.
    ///
    /// # Errors
    ///
    /// [`ContractError::InvalidHandle`] if `handle` is not a valid handle
    /// value, [`ContractError::AlreadyArmed`] on a second call; the first
    /// arming is left untouched.
    pub fn allow_cancellation(
        self: &Arc<Self>,
        handle: IoHandle,
        descriptor: IoDescriptor,
    ) -> Result<(), ContractError> {
        if !handle.is_valid() {
            return Err(ContractError::InvalidHandle);
        }

        let mut inner = self.inner.lock().trace_expect("coordinator lock poisoned");
        if inner.armed {
            return Err(ContractError::AlreadyArmed);
        }
        inner.armed = true;

        if !self.signal.can_fire() {
            return Ok(());
        }

        inner.target = Some((handle, descriptor));
        if self.signal.has_fired() {
            // The signal beat us to arming; registering now could be too
            // late, so run the abort logic inline instead.
            self.abort_locked(&mut inner);
        } else {
            let weak = Arc::downgrade(self);
            inner.registration = Some(self.signal.register(Box::new(move || {
                if let Some(coordinator) = Weak::upgrade(&weak) {
                    coordinator.signal_fired();
                }
            })));
        }
        Ok(())
    }

    /// Marks the operation complete and disarms the coordinator.
    ///
    /// Safe to call whether or not the coordinator was ever armed, and safe
    /// to call again. Once this returns, the abort logic can no longer touch
    /// the target and the caller may free the handle and descriptor. Must be
    /// called on every exit path of the operation, including failures.
    pub fn mark_completed(&self) {
        let registration = {
            let mut inner = self.inner.lock().trace_expect("coordinator lock poisoned");
            inner.target = None;
            inner.registration.take()
        };
        // Unregister outside the lock; the callback may be blocked on it.
        drop(registration);
    }

    /// Interprets the operation's final native status.
    ///
    /// An aborted status is [`Error::Canceled`] if the signal recorded a
    /// cancellation request, and [`Error::AbortedExternally`] otherwise:
    /// something other than this coordinator tore the operation down, and
    /// callers should not mistake that for a deliberate cancellation.
    pub fn interpret_completion(&self, status: CompletionStatus) -> Result<(), Error> {
        match status {
            CompletionStatus::Completed => Ok(()),
            CompletionStatus::Aborted if self.signal.has_fired() => Err(Error::Canceled),
            CompletionStatus::Aborted => Err(Error::AbortedExternally),
        }
    }

    /// Callback target: the signal fired while (possibly) armed.
    fn signal_fired(&self) {
        let mut inner = self.inner.lock().trace_expect("coordinator lock poisoned");
        self.abort_locked(&mut inner);
    }

    /// Takes the target and, if it was still present, requests the OS abort.
    ///
    /// Runs with the lock held so that `mark_completed` returning means no
    /// abort request is still executing. The request is best-effort and any
    /// failure is expected (the operation may have completed in between, or
    /// someone aborted it without our token); it is logged and dropped.
    fn abort_locked(&self, inner: &mut Inner) {
        if let Some((handle, descriptor)) = inner.target.take() {
            if let Err(e) = self.aborter.request_abort(handle, descriptor) {
                debug!("ignoring failed abort request: {e}");
            }
            inner.registration = None;
        }
    }
}

impl Drop for CancelCoordinator {
    fn drop(&mut self) {
        if let Ok(inner) = self.inner.get_mut() {
            if inner.target.is_some() {
                warn!("cancellation coordinator dropped while still armed; mark_completed was not called");
            }
        }
    }
}

impl std::fmt::Debug for CancelCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut s = f.debug_struct("CancelCoordinator");
        if let Ok(inner) = self.inner.lock() {
            s.field("armed", &inner.armed)
                .field("target", &inner.target);
        }
        s.finish()
    }
}
