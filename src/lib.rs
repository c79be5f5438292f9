//! secureproc: process hardening before privileged work.
//!
//! # Architecture
//!
//! Two independent components share one philosophy: a transition must be
//! atomic and verifiable, or the process must not continue.
//!
//! ## Privileges ([`privileges`])
//! - [`privileges::manager`]: reversible and permanent drops to the real
//!   UID/GID with read-back verification, and restoration of a saved
//!   identity (groups before GID before UID on the way down, UID first on
//!   the way back)
//! - [`privileges::identity`]: the syscall capability seam; tests
//!   substitute an in-memory kernel model
//!
//! ## Environment ([`environment`])
//! - [`environment::sanitizer`]: allow-list reconstruction of the process
//!   environment, built off to the side and installed in a single
//!   observable step
//! - [`environment::policy`]: forced `PATH`/`IFS` defaults plus the
//!   copy-if-present preserve list
//!
//! ## Security log ([`logging`])
//! - severity-laddered, fd-targeted channel of last resort used by the
//!   fatal paths; independent of the `log` facade
//!
//! ## Utilities ([`utils`])
//! - [`utils::strings`]: bounded copy/append for NUL-terminated buffers
//! - [`utils::io`]: exact-count transfer loops with interrupt retry
//!
//! # Failure policy
//!
//! The process-global entry points ([`drop_privileges`],
//! [`restore_privileges`], [`sanitize_environment`]) write one diagnostic
//! line to the security log and abort on any fault: a half-applied
//! privilege transition or environment must never keep executing. The
//! engine types ([`PrivilegeManager`], [`EnvironmentSanitizer`]) return
//! [`SecurityFault`] instead, for embedders that place the abort boundary
//! themselves.
//!
//! Drop, restore, and sanitize are startup-time operations: callers must
//! serialize them and should run them before spawning threads.

// Core components
pub mod environment;
pub mod privileges;

// Security log channel
pub mod logging;

// Shared error types
pub mod error;

// Utilities
pub mod utils;

// Re-export commonly used types for convenience
pub use environment::{sanitize_environment, EnvironmentSanitizer, SanitizePolicy};
pub use error::{LogError, Result, SecurityFault, TransferError};
pub use logging::Severity;
pub use privileges::{
    drop_privileges, restore_privileges, IdentityControl, PrivilegeManager, SavedPrivilegeState,
    SystemIdentity,
};
