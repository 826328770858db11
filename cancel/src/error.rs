use thiserror::Error;

/// Caller contract violations around arming the coordinator.
///
/// These are bugs in the calling code, never transient conditions: the
/// current operation is unusable once one is returned.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContractError {
    #[error("handle is invalid or closed")]
    InvalidHandle,

    #[error("cancellation already armed for this operation")]
    AlreadyArmed,
}

/// How an aborted operation is surfaced to the ultimate caller.
///
/// The distinction matters end-to-end: [`Error::Canceled`] means the caller
/// asked for the abort through the cancellation signal, while
/// [`Error::AbortedExternally`] means something else tore the operation down
/// (another actor called the platform abort on the handle, the peer vanished,
/// ...). Callers use the difference to decide whether retrying makes sense,
/// so the two must never be collapsed.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    #[error("operation canceled")]
    Canceled,

    #[error("operation aborted without a cancellation request")]
    AbortedExternally,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages() {
        assert_eq!(
            ContractError::AlreadyArmed.to_string(),
            "cancellation already armed for this operation"
        );
        assert_eq!(Error::Canceled.to_string(), "operation canceled");
        assert_eq!(
            Error::AbortedExternally.to_string(),
            "operation aborted without a cancellation request"
        );
    }
}
