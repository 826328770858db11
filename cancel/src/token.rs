//! [`Signal`] implementation over `tokio_util`'s `CancellationToken`.
//!
//! This is the production signal: cancellation is requested by calling
//! [`CancellationToken::cancel`] from anywhere, and delivery to the
//! coordinator happens on a spawned watcher task. Feature-gated on `tokio`
//! so alternative signal implementations can be used without pulling in a
//! runtime.
//!
//! # Example
//!
//! ```no_run
//! use skiff_cancel::{Signal, TokenSignal};
//! use tokio_util::sync::CancellationToken;
//!
//! let token = CancellationToken::new();
//! let signal = TokenSignal::new(token.clone());
//! assert!(signal.can_fire());
//!
//! token.cancel();
//! assert!(signal.has_fired());
//! ```

use crate::signal::{Callback, Registration, Signal};

pub use tokio_util::sync::CancellationToken;

/// A cancellation signal backed by a [`CancellationToken`].
///
/// [`TokenSignal::never`] is the non-cancellable signal, the equivalent of
/// binding an operation to no token at all: it never fires, and a
/// coordinator bound to it skips all abort machinery.
#[derive(Debug, Clone)]
pub struct TokenSignal {
    token: Option<CancellationToken>,
}

impl TokenSignal {
    pub fn new(token: CancellationToken) -> Self {
        Self { token: Some(token) }
    }

    /// A signal that can never fire.
    pub fn never() -> Self {
        Self { token: None }
    }
}

impl Signal for TokenSignal {
    fn can_fire(&self) -> bool {
        self.token.is_some()
    }

    fn has_fired(&self) -> bool {
        self.token.as_ref().is_some_and(|t| t.is_cancelled())
    }

    /// Spawns a watcher task that delivers `callback` when the token is
    /// cancelled. If the token is already cancelled, `cancelled()` resolves
    /// immediately and the callback is delivered promptly from the watcher
    /// task, never synchronously from this call.
    ///
    /// Must be called from within a tokio runtime.
    fn register(&self, callback: Callback) -> Registration {
        let Some(token) = self.token.clone() else {
            return Registration::none();
        };

        let handle = tokio::spawn(async move {
            token.cancelled().await;
            callback();
        });

        let abort = handle.abort_handle();
        Registration::new(move || abort.abort())
    }
}
