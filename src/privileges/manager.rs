//! Privilege drop/restore engine.
//!
//! Order is fixed: supplementary groups, then GID, then UID. Groups and GID
//! go first because changing them requires the UID privilege being given up;
//! UID comes back first on restore for the same reason. Every transition is
//! verified by reading the identity back, and a permanent drop additionally
//! proves the old identity is unreachable before reporting success.

use crate::error::{Result, SecurityFault};
use crate::privileges::identity::IdentityControl;
use nix::unistd::{Gid, Uid};

/// Identity captured immediately before a reversible drop.
///
/// Overwritten by each reversible drop (last snapshot wins) and read, never
/// cleared, by restore.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SavedPrivilegeState {
    /// Effective UID in force before the drop.
    pub effective_user: Uid,
    /// Effective GID in force before the drop.
    pub effective_group: Gid,
    /// Full supplementary group list before the drop.
    pub groups: Vec<Gid>,
}

/// Drop/restore engine over an injectable identity capability.
///
/// Methods return [`SecurityFault`] instead of aborting so the sequencing
/// can be exercised in tests; the process-global wrappers in
/// [`crate::privileges`] add the log-and-abort contract.
pub struct PrivilegeManager<I: IdentityControl> {
    identity: I,
    saved: Option<SavedPrivilegeState>,
}

impl<I: IdentityControl> PrivilegeManager<I> {
    pub const fn new(identity: I) -> Self {
        PrivilegeManager {
            identity,
            saved: None,
        }
    }

    /// Identity capability, for read access.
    pub fn identity(&self) -> &I {
        &self.identity
    }

    /// Snapshot taken by the last reversible drop, if any.
    pub fn saved_state(&self) -> Option<&SavedPrivilegeState> {
        self.saved.as_ref()
    }

    /// Drop privileges to the real UID/GID.
    ///
    /// With `permanent` the real, effective, and saved IDs all move and the
    /// old identity is verified unreachable. Without it only the effective
    /// IDs move, and the pre-drop identity is captured for
    /// [`restore_privileges`](Self::restore_privileges).
    pub fn drop_privileges(&mut self, permanent: bool) -> Result<()> {
        let new_uid = self.identity.real_user();
        let old_uid = self.identity.effective_user();
        let new_gid = self.identity.real_group();
        let old_gid = self.identity.effective_group();

        if !permanent {
            let groups = self
                .identity
                .groups()
                .map_err(|errno| SecurityFault::Transition {
                    stage: "capturing supplementary groups",
                    errno,
                })?;
            self.saved = Some(SavedPrivilegeState {
                effective_user: old_uid,
                effective_group: old_gid,
                groups,
            });
        }

        // Group changes need the superuser privilege that is about to go
        // away, so they come before any UID/GID change.
        if old_uid.is_root() {
            self.identity
                .set_groups(&[new_gid])
                .map_err(|errno| SecurityFault::Transition {
                    stage: "reducing supplementary groups",
                    errno,
                })?;
        }

        // GID before UID: GID is the less powerful credential, and changing
        // it still requires the UID privilege.
        if new_gid != old_gid {
            let step = if permanent {
                self.identity.set_group(new_gid)
            } else {
                self.identity.set_effective_group(new_gid)
            };
            step.map_err(|errno| SecurityFault::Transition {
                stage: "changing group identity",
                errno,
            })?;
        }

        if new_uid != old_uid {
            let step = if permanent {
                self.identity.set_user(new_uid)
            } else {
                self.identity.set_effective_user(new_uid)
            };
            step.map_err(|errno| SecurityFault::Transition {
                stage: "changing user identity",
                errno,
            })?;
        }

        if permanent {
            if new_gid != old_gid {
                self.verify_locked_group(old_gid, new_gid)?;
            }
            if new_uid != old_uid {
                self.verify_locked_user(old_uid, new_uid)?;
            }
        } else {
            self.verify_effective(new_uid, new_gid)?;
        }

        log::debug!(
            "dropped privileges to uid={}, gid={} ({})",
            new_uid,
            new_gid,
            if permanent { "permanent" } else { "reversible" }
        );
        Ok(())
    }

    /// Restore the identity captured by the last reversible drop.
    ///
    /// UID first: the saved effective UID is what authorizes the GID and
    /// group restorations that follow. Fails with
    /// [`SecurityFault::NoSavedState`] when no reversible drop has run.
    pub fn restore_privileges(&mut self) -> Result<()> {
        let saved = self.saved.clone().ok_or(SecurityFault::NoSavedState)?;

        if self.identity.effective_user() != saved.effective_user {
            self.identity
                .set_effective_user(saved.effective_user)
                .map_err(|errno| SecurityFault::Transition {
                    stage: "restoring effective user",
                    errno,
                })?;
            let actual = self.identity.effective_user();
            if actual != saved.effective_user {
                return Err(SecurityFault::Verification {
                    credential: "effective UID",
                    expected: saved.effective_user.as_raw(),
                    actual: actual.as_raw(),
                });
            }
        }

        if self.identity.effective_group() != saved.effective_group {
            self.identity
                .set_effective_group(saved.effective_group)
                .map_err(|errno| SecurityFault::Transition {
                    stage: "restoring effective group",
                    errno,
                })?;
            let actual = self.identity.effective_group();
            if actual != saved.effective_group {
                return Err(SecurityFault::Verification {
                    credential: "effective GID",
                    expected: saved.effective_group.as_raw(),
                    actual: actual.as_raw(),
                });
            }
        }

        if saved.effective_user.is_root() {
            self.identity
                .set_groups(&saved.groups)
                .map_err(|errno| SecurityFault::Transition {
                    stage: "restoring supplementary groups",
                    errno,
                })?;
            let readback = self
                .identity
                .groups()
                .map_err(|errno| SecurityFault::Transition {
                    stage: "reading supplementary groups back",
                    errno,
                })?;
            // The kernel does not guarantee list ordering.
            let mut actual: Vec<u32> = readback.iter().map(|g| g.as_raw()).collect();
            let mut expected: Vec<u32> = saved.groups.iter().map(|g| g.as_raw()).collect();
            actual.sort_unstable();
            expected.sort_unstable();
            if actual != expected {
                return Err(SecurityFault::GroupVerification { expected, actual });
            }
        }

        log::debug!(
            "restored effective identity to uid={}, gid={}",
            saved.effective_user,
            saved.effective_group
        );
        Ok(())
    }

    /// Permanent-drop verification: try to regain the pre-drop effective
    /// UID, then require the effective UID to read back as the dropped
    /// value. The escalation attempt erroring or silently doing nothing both
    /// count as passing; the only fault is an effective UID other than
    /// `new`, which includes the attempt actually succeeding.
    fn verify_locked_user(&mut self, old: Uid, new: Uid) -> Result<()> {
        let _ = self.identity.set_effective_user(old);
        let actual = self.identity.effective_user();
        if actual != new {
            return Err(SecurityFault::Verification {
                credential: "effective UID",
                expected: new.as_raw(),
                actual: actual.as_raw(),
            });
        }
        Ok(())
    }

    /// GID counterpart of [`verify_locked_user`](Self::verify_locked_user).
    fn verify_locked_group(&mut self, old: Gid, new: Gid) -> Result<()> {
        let _ = self.identity.set_effective_group(old);
        let actual = self.identity.effective_group();
        if actual != new {
            return Err(SecurityFault::Verification {
                credential: "effective GID",
                expected: new.as_raw(),
                actual: actual.as_raw(),
            });
        }
        Ok(())
    }

    /// Reversible-drop verification: the effective IDs must read back as the
    /// intended values.
    fn verify_effective(&self, uid: Uid, gid: Gid) -> Result<()> {
        let actual_gid = self.identity.effective_group();
        if actual_gid != gid {
            return Err(SecurityFault::Verification {
                credential: "effective GID",
                expected: gid.as_raw(),
                actual: actual_gid.as_raw(),
            });
        }
        let actual_uid = self.identity.effective_user();
        if actual_uid != uid {
            return Err(SecurityFault::Verification {
                credential: "effective UID",
                expected: uid.as_raw(),
                actual: actual_uid.as_raw(),
            });
        }
        Ok(())
    }
}
