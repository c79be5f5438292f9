//! Allow-list environment reconstruction.
//!
//! The new set is built off to the side and installed with a single pointer
//! store, so in-process readers (signal handlers included) see the old set
//! or the new set, never a mixture.

use crate::environment::policy::SanitizePolicy;
use crate::error::{Result, SecurityFault};
use std::env;
use std::ffi::{CString, OsString};
use std::os::unix::ffi::OsStrExt;

extern "C" {
    #[allow(non_upper_case_globals)]
    static mut environ: *mut *mut libc::c_char;
}

/// Rebuild an environment set from `policy` plus caller `preserve` names.
///
/// `lookup` supplies the prior environment. Forced assignments come first,
/// then built-in preserved names, then caller names; a copy-if-present name
/// appears at most once however often it is listed, and a name colliding
/// with a forced assignment never overrides it. Pure with respect to process
/// state.
pub fn rebuild<F>(policy: &SanitizePolicy, preserve: &[&str], lookup: F) -> Vec<(String, OsString)>
where
    F: Fn(&str) -> Option<OsString>,
{
    let mut set: Vec<(String, OsString)> =
        Vec::with_capacity(policy.forced.len() + policy.preserved.len() + preserve.len());

    for (name, value) in &policy.forced {
        set.push((name.clone(), OsString::from(value)));
    }

    let candidates = policy
        .preserved
        .iter()
        .map(String::as_str)
        .chain(preserve.iter().copied());
    for name in candidates {
        if !valid_name(name) {
            // Such a name cannot exist in any environment, so skipping it
            // preserves the copy-if-present semantics.
            log::debug!("skipping unpreservable environment name {:?}", name);
            continue;
        }
        if set.iter().any(|(existing, _)| existing == name) {
            continue;
        }
        if let Some(value) = lookup(name) {
            set.push((name.to_string(), value));
        }
    }

    set
}

fn valid_name(name: &str) -> bool {
    !name.is_empty() && !name.contains('=') && !name.contains('\0')
}

/// Materialize `set` and install it as the process environment.
///
/// The backing storage is leaked: `environ` must stay valid for the life of
/// the process, and the previous array may still be read by code that
/// loaded the pointer just before the swap.
fn install(set: &[(String, OsString)]) -> Result<()> {
    let mut entries: Vec<*mut libc::c_char> = Vec::with_capacity(set.len() + 1);
    for (name, value) in set {
        let mut bytes = Vec::with_capacity(name.len() + value.len() + 1);
        bytes.extend_from_slice(name.as_bytes());
        bytes.push(b'=');
        bytes.extend_from_slice(value.as_bytes());
        let entry = CString::new(bytes).map_err(|_| {
            SecurityFault::Environment(format!(
                "environment entry for {:?} contains a NUL byte",
                name
            ))
        })?;
        entries.push(entry.into_raw());
    }
    entries.push(std::ptr::null_mut());

    let array = Box::leak(entries.into_boxed_slice());
    // SAFETY: the array and its strings have process lifetime (leaked
    // above) and the final element is the NULL terminator the C runtime
    // requires. The single store is the atomic install point.
    unsafe {
        environ = array.as_mut_ptr();
    }
    Ok(())
}

/// Environment reconstruction engine.
///
/// Holds the policy; [`sanitize`](Self::sanitize) reads the live process
/// environment through `std::env` and installs the rebuilt set. The
/// process-global wrapper in [`crate::environment`] adds the log-and-abort
/// contract over the default policy.
pub struct EnvironmentSanitizer {
    policy: SanitizePolicy,
}

impl EnvironmentSanitizer {
    pub fn new(policy: SanitizePolicy) -> Self {
        EnvironmentSanitizer { policy }
    }

    /// Policy in force for this sanitizer.
    pub fn policy(&self) -> &SanitizePolicy {
        &self.policy
    }

    /// Replace the process environment with the rebuilt allow-list set.
    pub fn sanitize(&self, preserve: &[&str]) -> Result<()> {
        let set = rebuild(&self.policy, preserve, |name| env::var_os(name));
        install(&set)?;
        log::debug!("environment rebuilt with {} entries", set.len());
        Ok(())
    }
}
