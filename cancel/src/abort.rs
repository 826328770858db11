//! The platform abort seam: raw resource identifiers and the [`AbortIo`]
//! capability trait.
//!
//! The coordinator never dereferences the handle or the completion
//! descriptor; it only forwards the pair to an [`AbortIo`] implementation
//! while armed. Ownership of the underlying resources stays with the
//! operation's caller for their whole lifetime.

use thiserror::Error;

/// A raw OS resource handle, carried by value.
///
/// This is the numeric value of the native handle (`HANDLE` on Windows, a
/// file descriptor elsewhere), not an owned resource. Validity follows the
/// Win32 convention: null and `INVALID_HANDLE_VALUE` (-1) are invalid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IoHandle(isize);

impl IoHandle {
    pub const fn from_raw(raw: isize) -> Self {
        Self(raw)
    }

    pub const fn as_raw(&self) -> isize {
        self.0
    }

    pub const fn is_valid(&self) -> bool {
        self.0 != 0 && self.0 != -1
    }
}

/// An opaque completion descriptor identifying one in-flight overlapped
/// request, carried as its address.
///
/// On Windows this is the address of the `OVERLAPPED` block passed to the
/// OS when the operation was issued; targeting an abort at this descriptor
/// aborts exactly that request and no other on the same handle. The crate
/// treats it as an opaque integer and never reads through it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IoDescriptor(usize);

impl IoDescriptor {
    pub const fn from_raw(raw: usize) -> Self {
        Self(raw)
    }

    pub const fn as_raw(&self) -> usize {
        self.0
    }
}

/// Diagnostic carried by a failed abort request.
///
/// The coordinator swallows these (cancellation is inherently racy against
/// natural completion, so "too late" failures are expected); the code is
/// logged and otherwise dropped.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("platform abort request failed with code {code}")]
pub struct AbortFailed {
    pub code: i32,
}

/// Best-effort "cancel this in-flight operation" primitive.
///
/// Implementations request that the OS abort the overlapped request
/// identified by `(handle, descriptor)`. There is no delivery guarantee:
/// the operation may still complete normally, and a failure here carries a
/// diagnostic code only. Implementations must not block indefinitely and
/// must not retain the pair beyond the call.
pub trait AbortIo: Send + Sync {
    fn request_abort(&self, handle: IoHandle, descriptor: IoDescriptor) -> Result<(), AbortFailed>;
}
