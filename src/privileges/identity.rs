//! Identity syscall capability.
//!
//! The manager speaks to the kernel only through [`IdentityControl`], which
//! keeps the two mutation shapes explicit: effective-only (reversible) and
//! real+effective+saved together (irreversible). Production code uses
//! [`SystemIdentity`]; tests substitute an in-memory implementation.

use nix::unistd::{self, Gid, Uid};

/// Read and mutate the process identity triple and supplementary groups.
pub trait IdentityControl {
    fn real_user(&self) -> Uid;
    fn effective_user(&self) -> Uid;
    fn real_group(&self) -> Gid;
    fn effective_group(&self) -> Gid;

    /// Change the effective UID only, leaving real and saved UID in place.
    fn set_effective_user(&mut self, uid: Uid) -> nix::Result<()>;

    /// Change real, effective, and saved UID together.
    fn set_user(&mut self, uid: Uid) -> nix::Result<()>;

    /// Change the effective GID only, leaving real and saved GID in place.
    fn set_effective_group(&mut self, gid: Gid) -> nix::Result<()>;

    /// Change real, effective, and saved GID together.
    fn set_group(&mut self, gid: Gid) -> nix::Result<()>;

    /// Current supplementary group list.
    fn groups(&self) -> nix::Result<Vec<Gid>>;

    /// Replace the supplementary group list.
    fn set_groups(&mut self, groups: &[Gid]) -> nix::Result<()>;
}

/// Live process identity backed by the real syscalls.
///
/// On platforms without `setresuid`/`setresgid` the irreversible shape
/// moves the effective ID first and then calls `setuid`/`setgid`, which
/// covers all three IDs only for a privileged caller; the post-drop
/// verification in the manager catches a saved ID that lingered.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemIdentity;

impl IdentityControl for SystemIdentity {
    fn real_user(&self) -> Uid {
        unistd::getuid()
    }

    fn effective_user(&self) -> Uid {
        unistd::geteuid()
    }

    fn real_group(&self) -> Gid {
        unistd::getgid()
    }

    fn effective_group(&self) -> Gid {
        unistd::getegid()
    }

    fn set_effective_user(&mut self, uid: Uid) -> nix::Result<()> {
        unistd::seteuid(uid)
    }

    fn set_user(&mut self, uid: Uid) -> nix::Result<()> {
        #[cfg(target_os = "linux")]
        {
            unistd::setresuid(uid, uid, uid)
        }
        #[cfg(not(target_os = "linux"))]
        {
            // seteuid first: setuid covers all three IDs only when privileged.
            let _ = unistd::seteuid(uid);
            unistd::setuid(uid)
        }
    }

    fn set_effective_group(&mut self, gid: Gid) -> nix::Result<()> {
        unistd::setegid(gid)
    }

    fn set_group(&mut self, gid: Gid) -> nix::Result<()> {
        #[cfg(target_os = "linux")]
        {
            unistd::setresgid(gid, gid, gid)
        }
        #[cfg(not(target_os = "linux"))]
        {
            let _ = unistd::setegid(gid);
            unistd::setgid(gid)
        }
    }

    fn groups(&self) -> nix::Result<Vec<Gid>> {
        unistd::getgroups()
    }

    fn set_groups(&mut self, groups: &[Gid]) -> nix::Result<()> {
        unistd::setgroups(groups)
    }
}
