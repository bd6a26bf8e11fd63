//! Proposing the next release version from a diff.

use std::fmt;

use semver::{BuildMetadata, Prerelease, Version};
use serde::{Deserialize, Serialize};

use crate::domain::{diff::Diff, error::DomainError, value_objects::Severity};

/// Version proposed for a first release.
pub const BOOTSTRAP_VERSION: Version = Version::new(0, 1, 0);

/// How incompatible changes are treated before `1.0.0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BumpPolicy {
    /// Below `1.0.0`, breaking changes bump the minor component instead of
    /// leaving the `0.x` range.
    pub pre_stable_breaking_bumps_minor: bool,
}

impl Default for BumpPolicy {
    fn default() -> Self {
        Self {
            pre_stable_breaking_bumps_minor: true,
        }
    }
}

/// Which version component to increment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Bump {
    Patch,
    Minor,
    Major,
}

impl Bump {
    /// Component to bump on top of `previous` for the changes in `diff`.
    pub fn for_diff(previous: &Version, diff: &Diff, policy: BumpPolicy) -> Self {
        match diff.highest_severity() {
            Some(s) if s.is_incompatible() => {
                if previous.major == 0 && policy.pre_stable_breaking_bumps_minor {
                    Self::Minor
                } else {
                    Self::Major
                }
            }
            Some(Severity::Minor) => Self::Minor,
            _ => Self::Patch,
        }
    }

    pub fn apply(self, previous: &Version) -> Version {
        let mut next = Version {
            pre: Prerelease::EMPTY,
            build: BuildMetadata::EMPTY,
            ..previous.clone()
        };
        match self {
            Self::Major => {
                next.major += 1;
                next.minor = 0;
                next.patch = 0;
            }
            Self::Minor => {
                next.minor += 1;
                next.patch = 0;
            }
            Self::Patch => next.patch += 1,
        }
        next
    }
}

impl fmt::Display for Bump {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Patch => "patch",
            Self::Minor => "minor",
            Self::Major => "major",
        })
    }
}

/// Parse a version, accepting a leading `v` as used in tag names.
pub fn parse_version(text: &str) -> Result<Version, DomainError> {
    let trimmed = text.trim();
    let bare = trimmed
        .strip_prefix('v')
        .or_else(|| trimmed.strip_prefix('V'))
        .unwrap_or(trimmed);
    Version::parse(bare).map_err(|e| DomainError::InvalidVersion {
        value: text.to_string(),
        reason: e.to_string(),
    })
}

/// Propose the version that follows `previous` given `diff`.
///
/// Without a previous release the answer is always [`BOOTSTRAP_VERSION`].
pub fn next_version(previous: Option<&Version>, diff: &Diff, policy: BumpPolicy) -> Version {
    match previous {
        None => BOOTSTRAP_VERSION,
        Some(previous) => Bump::for_diff(previous, diff, policy).apply(previous),
    }
}

/// Highest of several per-module proposals, never below the bootstrap version.
pub fn highest_version(proposals: impl IntoIterator<Item = Version>) -> Version {
    proposals
        .into_iter()
        .fold(BOOTSTRAP_VERSION, |best, v| if v > best { v } else { best })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{diff::DiffEntry, value_objects::ChangeKind};

    fn diff_of(severities: &[Severity]) -> Diff {
        Diff::from_entries(
            severities
                .iter()
                .enumerate()
                .map(|(i, s)| DiffEntry::new(format!("/e{i}"), *s, ChangeKind::Changed, "change"))
                .collect(),
        )
    }

    fn v(text: &str) -> Version {
        parse_version(text).unwrap()
    }

    #[test]
    fn patch_only_bumps_patch() {
        let next = next_version(Some(&v("1.2.3")), &diff_of(&[Severity::Patch]), BumpPolicy::default());
        assert_eq!(next, v("1.2.4"));
    }

    #[test]
    fn empty_diff_bumps_patch() {
        let next = next_version(Some(&v("1.2.3")), &Diff::default(), BumpPolicy::default());
        assert_eq!(next, v("1.2.4"));
    }

    #[test]
    fn minor_addition_bumps_minor() {
        let next = next_version(
            Some(&v("1.2.3")),
            &diff_of(&[Severity::Patch, Severity::Minor]),
            BumpPolicy::default(),
        );
        assert_eq!(next, v("1.3.0"));
    }

    #[test]
    fn breaking_removal_bumps_major() {
        let next = next_version(Some(&v("1.2.3")), &diff_of(&[Severity::Breaking]), BumpPolicy::default());
        assert_eq!(next, v("2.0.0"));
        let next = next_version(Some(&v("1.2.3")), &diff_of(&[Severity::Major]), BumpPolicy::default());
        assert_eq!(next, v("2.0.0"));
    }

    #[test]
    fn first_release_is_bootstrap() {
        for severities in [&[][..], &[Severity::Breaking][..], &[Severity::Patch][..]] {
            assert_eq!(next_version(None, &diff_of(severities), BumpPolicy::default()), BOOTSTRAP_VERSION);
        }
    }

    #[test]
    fn pre_stable_breaking_follows_policy() {
        let breaking = diff_of(&[Severity::Breaking]);
        assert_eq!(next_version(Some(&v("0.4.2")), &breaking, BumpPolicy::default()), v("0.5.0"));

        let strict = BumpPolicy {
            pre_stable_breaking_bumps_minor: false,
        };
        assert_eq!(next_version(Some(&v("0.4.2")), &breaking, strict), v("1.0.0"));
    }

    #[test]
    fn prerelease_and_build_are_dropped() {
        let next = next_version(Some(&v("v1.2.3-rc.1+build.5")), &diff_of(&[Severity::Patch]), BumpPolicy::default());
        assert_eq!(next.to_string(), "1.2.4");
    }

    #[test]
    fn tag_prefix_is_accepted_and_garbage_rejected() {
        assert_eq!(v("v2.0.1"), Version::new(2, 0, 1));
        assert!(matches!(parse_version("latest"), Err(DomainError::InvalidVersion { .. })));
    }

    #[test]
    fn highest_across_modules_with_floor() {
        assert_eq!(highest_version([v("1.0.1"), v("1.3.0"), v("0.9.0")]), v("1.3.0"));
        assert_eq!(highest_version(Vec::new()), BOOTSTRAP_VERSION);
        assert_eq!(highest_version([v("0.0.5")]), BOOTSTRAP_VERSION);
    }
}
