//! Exact-count read/write loops over raw descriptors.
//!
//! Interrupted syscalls are retried; every other failure reports how far the
//! transfer got, so callers can tell "nothing moved" from "partial transfer
//! then error".

use crate::error::TransferError;
use std::io;
use std::os::unix::io::RawFd;

/// Read exactly `buf.len()` bytes from `fd` into `buf`.
///
/// Retries on `EINTR`. Reaching end of stream before the buffer is full is
/// an error carrying the byte count that did arrive.
pub fn read_exact(fd: RawFd, buf: &mut [u8]) -> Result<(), TransferError> {
    let requested = buf.len();
    let mut transferred = 0usize;

    while transferred < requested {
        let remaining = &mut buf[transferred..];
        // SAFETY: pointer and length come from a live mutable slice.
        let n = unsafe { libc::read(fd, remaining.as_mut_ptr().cast(), remaining.len()) };
        if n < 0 {
            let err = io::Error::last_os_error();
            if err.raw_os_error() == Some(libc::EINTR) {
                continue;
            }
            return Err(classify(transferred, requested, err));
        }
        if n == 0 {
            return Err(TransferError::EndOfStream {
                transferred,
                requested,
            });
        }
        transferred += n as usize;
    }

    Ok(())
}

/// Write exactly `buf.len()` bytes from `buf` to `fd`.
///
/// Retries on `EINTR`. A descriptor that accepts zero bytes while data
/// remains is reported as a hard error, as in `io::Write::write_all`.
pub fn write_exact(fd: RawFd, buf: &[u8]) -> Result<(), TransferError> {
    let requested = buf.len();
    let mut transferred = 0usize;

    while transferred < requested {
        let remaining = &buf[transferred..];
        // SAFETY: pointer and length come from a live slice.
        let n = unsafe { libc::write(fd, remaining.as_ptr().cast(), remaining.len()) };
        if n < 0 {
            let err = io::Error::last_os_error();
            if err.raw_os_error() == Some(libc::EINTR) {
                continue;
            }
            return Err(classify(transferred, requested, err));
        }
        if n == 0 {
            let err = io::Error::new(io::ErrorKind::WriteZero, "descriptor accepted no bytes");
            return Err(classify(transferred, requested, err));
        }
        transferred += n as usize;
    }

    Ok(())
}

fn classify(transferred: usize, requested: usize, source: io::Error) -> TransferError {
    if transferred == 0 {
        TransferError::NoProgress { source }
    } else {
        TransferError::Partial {
            transferred,
            requested,
            source,
        }
    }
}
