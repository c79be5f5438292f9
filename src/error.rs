//! Error types, split by recovery policy.
//!
//! [`SecurityFault`] is the unrecoverable class: a privilege transition or
//! environment rebuild went wrong and the process trust boundary may already
//! be inconsistent. The process-global entry points translate it into a
//! security log line followed by `abort()`. [`LogError`] and
//! [`TransferError`] are ordinary recoverable errors from the utility
//! surface; they never leave privilege or environment state inconsistent.

use nix::errno::Errno;
use std::os::unix::io::RawFd;
use thiserror::Error;

/// Unrecoverable security fault from the privilege or environment engines.
///
/// Not convertible into the recoverable error types: callers receiving one
/// must terminate rather than continue with a half-applied trust boundary.
#[derive(Error, Debug)]
pub enum SecurityFault {
    /// A syscall in the drop/restore sequence failed.
    #[error("privilege transition failed while {stage}: {errno}")]
    Transition { stage: &'static str, errno: Errno },

    /// Post-transition readback did not match the intended identity.
    #[error("{credential} verification failed: expected {expected}, found {actual}")]
    Verification {
        credential: &'static str,
        expected: u32,
        actual: u32,
    },

    /// The supplementary group list read back differs from the intended list.
    #[error("supplementary group verification failed: expected {expected:?}, found {actual:?}")]
    GroupVerification { expected: Vec<u32>, actual: Vec<u32> },

    /// Restore was requested but no reversible drop has saved an identity.
    #[error("restore requested but no reversible drop has saved a privilege state")]
    NoSavedState,

    /// The rebuilt environment could not be materialized or installed.
    #[error("environment rebuild failed: {0}")]
    Environment(String),
}

/// Recoverable errors from the security log.
#[derive(Error, Debug)]
pub enum LogError {
    /// The requested output descriptor is negative.
    #[error("invalid log output descriptor: {0}")]
    InvalidFd(RawFd),

    /// The formatted line could not be written to the output descriptor.
    #[error("log write failed: {0}")]
    Write(#[from] TransferError),
}

/// Recoverable I/O errors that record how far an exact-count transfer got.
#[derive(Error, Debug)]
pub enum TransferError {
    /// The transfer failed before any byte moved.
    #[error("transfer failed before any data moved: {source}")]
    NoProgress { source: std::io::Error },

    /// Some bytes moved, then a hard error stopped the loop.
    #[error("transfer stopped after {transferred} of {requested} bytes: {source}")]
    Partial {
        transferred: usize,
        requested: usize,
        source: std::io::Error,
    },

    /// The stream ended before the requested count was read.
    #[error("end of stream after {transferred} of {requested} bytes")]
    EndOfStream { transferred: usize, requested: usize },
}

/// Result type alias for security-critical operations.
pub type Result<T> = std::result::Result<T, SecurityFault>;
