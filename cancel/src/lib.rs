//! Race-free cancellation coordination for overlapped I/O.
//!
//! The Skiff pipe transport issues asynchronous reads and writes against a
//! native handle with an associated completion descriptor, and lets callers
//! request cancellation from any thread. That leaves one genuinely hard
//! problem: the cancel path and the "operation completed, free everything"
//! path race against each other on the same native resources. This crate
//! contains the coordinator that closes that race.
//!
//! # Features
//!
//! - **CancelCoordinator**: arm-once/disarm-once state machine around a
//!   single in-flight operation, guaranteeing the abort request and the
//!   resource release can never overlap
//! - **Signal / Registration**: the capability interface for the external
//!   cancellation token, with a tokio-backed [`TokenSignal`] implementation
//! - **AbortIo**: the best-effort platform abort seam, implemented over
//!   `CancelIoEx` on Windows and injectable everywhere else
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use skiff_cancel::{
//!     AbortIo, CancelCoordinator, CompletionStatus, IoDescriptor, IoHandle, TokenSignal,
//! };
//!
//! # struct MyAbort;
//! # impl AbortIo for MyAbort {
//! #     fn request_abort(
//! #         &self,
//! #         _: IoHandle,
//! #         _: IoDescriptor,
//! #     ) -> Result<(), skiff_cancel::AbortFailed> {
//! #         Ok(())
//! #     }
//! # }
//! # async fn issue_read() -> (IoHandle, IoDescriptor) { todo!() }
//! # async fn await_read() -> CompletionStatus { todo!() }
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let token = tokio_util::sync::CancellationToken::new();
//! let coordinator = Arc::new(CancelCoordinator::new(
//!     Arc::new(TokenSignal::new(token.clone())),
//!     Arc::new(MyAbort),
//! ));
//!
//! // Submit the operation, then arm.
//! let (handle, descriptor) = issue_read().await;
//! coordinator.allow_cancellation(handle, descriptor)?;
//!
//! // ...the operation runs; `token.cancel()` may arrive from anywhere...
//!
//! // Disarm before freeing the handle/descriptor, on every exit path.
//! let status = await_read().await;
//! coordinator.mark_completed();
//! coordinator.interpret_completion(status)?;
//! # Ok(())
//! # }
//! ```

pub mod abort;
pub mod coordinator;
pub mod error;
pub mod signal;

#[cfg(feature = "tokio")]
pub mod token;

#[cfg(windows)]
pub mod windows;

// Re-export commonly used types at crate root
pub use abort::{AbortFailed, AbortIo, IoDescriptor, IoHandle};
pub use coordinator::{CancelCoordinator, CompletionStatus};
pub use error::{ContractError, Error};
pub use signal::{Callback, Registration, Signal};

#[cfg(feature = "tokio")]
pub use token::TokenSignal;
