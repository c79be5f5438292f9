//! Privilege drop and restore.
//!
//! [`PrivilegeManager`] is the engine; the free functions operate on the
//! process-wide manager and uphold the fatal contract: any
//! [`SecurityFault`](crate::error::SecurityFault) is written to the security
//! log and the process aborts rather than continuing with a half-applied
//! transition. Callers must serialize these operations; the mutex makes the
//! requirement explicit without making concurrent use meaningful.

pub mod identity;
pub mod manager;

pub use identity::{IdentityControl, SystemIdentity};
pub use manager::{PrivilegeManager, SavedPrivilegeState};

use crate::error::SecurityFault;
use std::sync::Mutex;

static PROCESS_PRIVILEGES: Mutex<PrivilegeManager<SystemIdentity>> =
    Mutex::new(PrivilegeManager::new(SystemIdentity));

/// Drop process privileges to the real UID/GID.
///
/// Reversible when `permanent` is false: a later [`restore_privileges`]
/// returns to the identity in force now. Terminates the process on any
/// transition or verification failure.
pub fn drop_privileges(permanent: bool) {
    let result = match PROCESS_PRIVILEGES.lock() {
        Ok(mut manager) => manager.drop_privileges(permanent),
        Err(poisoned) => poisoned.into_inner().drop_privileges(permanent),
    };
    if let Err(fault) = result {
        fatal(&fault);
    }
}

/// Restore the identity saved by the last reversible [`drop_privileges`].
///
/// Terminates the process when no reversible drop has run or the restored
/// identity does not verify.
pub fn restore_privileges() {
    let result = match PROCESS_PRIVILEGES.lock() {
        Ok(mut manager) => manager.restore_privileges(),
        Err(poisoned) => poisoned.into_inner().restore_privileges(),
    };
    if let Err(fault) = result {
        fatal(&fault);
    }
}

fn fatal(fault: &SecurityFault) -> ! {
    let _ = crate::sec_err!("{}", fault);
    std::process::abort()
}
