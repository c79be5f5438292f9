//! Allow-list environment reconstruction.
//!
//! The environment is rebuilt, not filtered: an allow-list stays safe
//! against dangerous variables nobody thought to deny (loader injection,
//! locale and format-string tricks, shell metacharacter separators).
//! [`EnvironmentSanitizer`] is the engine; the free function applies the
//! default policy to the live process and upholds the fatal contract.

pub mod policy;
pub mod sanitizer;

pub use policy::{SanitizePolicy, DEFAULT_IFS, DEFAULT_PATH};
pub use sanitizer::{rebuild, EnvironmentSanitizer};

/// Rebuild the process environment from the default policy plus `preserve`.
///
/// `PATH` and `IFS` are forced to their trusted defaults, `TZ` and the
/// `preserve` names are copied if present, and everything else is
/// discarded. Terminates the process if the rebuilt set cannot be
/// installed.
pub fn sanitize_environment(preserve: &[&str]) {
    let sanitizer = EnvironmentSanitizer::new(SanitizePolicy::default());
    if let Err(fault) = sanitizer.sanitize(preserve) {
        let _ = crate::sec_err!("{}", fault);
        std::process::abort();
    }
}
