//! Reconstruction policy: what survives sanitization.

use serde::{Deserialize, Serialize};

/// Platform-standard default search path, forced into every rebuilt
/// environment.
pub const DEFAULT_PATH: &str = "/usr/bin:/bin:/usr/sbin:/sbin";

/// Forced field separator: space, tab, line-feed.
pub const DEFAULT_IFS: &str = " \t\n";

/// Allow-list policy for environment reconstruction.
///
/// `forced` assignments are always written with the given value, replacing
/// any prior one; `preserved` names are copied from the prior environment
/// only if present. Nothing else survives a rebuild.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SanitizePolicy {
    /// Assignments written unconditionally.
    pub forced: Vec<(String, String)>,
    /// Names copied verbatim from the prior environment when present.
    pub preserved: Vec<String>,
}

impl Default for SanitizePolicy {
    fn default() -> Self {
        SanitizePolicy {
            forced: vec![
                ("IFS".to_string(), DEFAULT_IFS.to_string()),
                ("PATH".to_string(), DEFAULT_PATH.to_string()),
            ],
            preserved: vec!["TZ".to_string()],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_policy_forces_ifs_and_path() {
        let policy = SanitizePolicy::default();
        assert_eq!(
            policy.forced,
            vec![
                ("IFS".to_string(), " \t\n".to_string()),
                ("PATH".to_string(), DEFAULT_PATH.to_string()),
            ]
        );
    }

    #[test]
    fn default_policy_preserves_timezone_only() {
        let policy = SanitizePolicy::default();
        assert_eq!(policy.preserved, vec!["TZ".to_string()]);
    }

    #[test]
    fn policy_round_trips_through_json() {
        let policy = SanitizePolicy::default();
        let text = serde_json::to_string(&policy).expect("serialize");
        let back: SanitizePolicy = serde_json::from_str(&text).expect("deserialize");
        assert_eq!(back, policy);
    }
}
