//! The Win32 abort primitive.

use windows_sys::Win32::Foundation::{GetLastError, HANDLE};
use windows_sys::Win32::System::IO::{CancelIoEx, OVERLAPPED};

use crate::abort::{AbortFailed, AbortIo, IoDescriptor, IoHandle};

/// [`AbortIo`] over `CancelIoEx`.
///
/// Targets exactly the overlapped request identified by the descriptor, not
/// every pending operation on the handle. `CancelIoEx` fails with
/// `ERROR_NOT_FOUND` if the request completed in the meantime; like any
/// other failure here, the caller treats that as diagnostic only.
pub struct SystemAbort;

impl AbortIo for SystemAbort {
    fn request_abort(&self, handle: IoHandle, descriptor: IoDescriptor) -> Result<(), AbortFailed> {
        // The pair is guaranteed live by the coordinator: the owner frees it
        // only after mark_completed, which cannot return while we run.
        let ret = unsafe {
            CancelIoEx(
                handle.as_raw() as HANDLE,
                descriptor.as_raw() as *const OVERLAPPED,
            )
        };
        if ret == 0 {
            Err(AbortFailed {
                code: unsafe { GetLastError() } as i32,
            })
        } else {
            Ok(())
        }
    }
}
