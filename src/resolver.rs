//! Previous-release-tag resolution.
//!
//! Selects the single tag to diff against, under an explicit, caller-chosen
//! mode. Sorting is stable, so tags with equal precedence (duplicates or
//! build-metadata-only differences) resolve deterministically to the earliest
//! input occurrence.

use crate::config::EnvironmentPolicy;
use crate::domain::{version, Tag};
use crate::error::{ReleaseError, Result};
use crate::warning::ReleaseWarning;
use semver::Version;

/// How the previous release tag is selected
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionMode {
    /// Greatest valid semver tag; zero valid tags is a hard failure
    PlainLatest,
    /// Greatest tag qualifying under the environment policy; none is the
    /// normal first-release state
    EnvironmentChannel,
    /// Greatest valid tag strictly below the given version
    PredecessorOf(String),
}

fn latest<'a>(mut candidates: Vec<(&'a Tag, &'a Version)>) -> Option<&'a Tag> {
    candidates.sort_by(|a, b| version::compare(b.1, a.1));
    candidates.first().map(|(tag, _)| *tag)
}

fn semver_tags(tags: &[Tag]) -> Vec<(&Tag, &Version)> {
    tags.iter()
        .filter_map(|t| t.version.as_ref().map(|v| (t, v)))
        .collect()
}

/// Whether a tag qualifies for resolution under the environment policy
fn qualifies(v: &Version, policy: &EnvironmentPolicy) -> bool {
    match &policy.prerelease_channel {
        Some(label) => version::in_channel(v, label),
        None => !policy.stable_only || v.pre.is_empty(),
    }
}

/// Resolve the previous release tag from an unordered tag list.
///
/// # Returns
/// * `Ok(Some(tag))` - The selected previous tag
/// * `Ok(None)` - No previous tag; a normal first-release state (never
///   returned in [SelectionMode::PlainLatest])
/// * `Err(NoValidTagFound)` - Plain-latest mode found zero valid tags
/// * `Err(InvalidVersion)` - Predecessor mode was given an unparsable version
pub fn resolve(
    tags: &[Tag],
    mode: &SelectionMode,
    policy: &EnvironmentPolicy,
) -> Result<Option<Tag>> {
    match mode {
        SelectionMode::PlainLatest => {
            let valid = semver_tags(tags);
            if valid.is_empty() {
                return Err(ReleaseError::NoValidTagFound);
            }
            Ok(latest(valid).cloned())
        }
        SelectionMode::EnvironmentChannel => {
            let qualifying: Vec<_> = semver_tags(tags)
                .into_iter()
                .filter(|(_, v)| qualifies(v, policy))
                .collect();
            Ok(latest(qualifying).cloned())
        }
        SelectionMode::PredecessorOf(current) => {
            let current = version::parse(current)?;
            let below: Vec<_> = semver_tags(tags)
                .into_iter()
                .filter(|(_, v)| version::compare(v, &current) == std::cmp::Ordering::Less)
                .collect();
            Ok(latest(below).cloned())
        }
    }
}

/// Surface prerelease tags whose identifiers match no configured channel.
///
/// Such tags are invisible to environment-aware resolution in every
/// environment; that may be intentional, so they are reported rather than
/// silently included or excluded.
pub fn channel_warnings(tags: &[Tag], known_channels: &[String]) -> Vec<ReleaseWarning> {
    tags.iter()
        .filter_map(|t| t.version.as_ref().map(|v| (t, v)))
        .filter(|(_, v)| !v.pre.is_empty())
        .filter(|(_, v)| !known_channels.iter().any(|label| version::in_channel(v, label)))
        .map(|(t, _)| ReleaseWarning::UnknownChannelTag {
            tag: t.name.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bump::Bump;

    fn tags(names: &[&str]) -> Vec<Tag> {
        names.iter().map(Tag::new).collect()
    }

    fn stable_policy() -> EnvironmentPolicy {
        EnvironmentPolicy {
            prerelease_channel: None,
            stable_only: true,
            default_bump: Bump::Patch,
        }
    }

    fn channel_policy(label: &str) -> EnvironmentPolicy {
        EnvironmentPolicy {
            prerelease_channel: Some(label.to_string()),
            stable_only: false,
            default_bump: Bump::None,
        }
    }

    #[test]
    fn test_plain_latest_picks_greatest() {
        let result = resolve(
            &tags(&["1.2.0", "1.3.0", "0.9.0"]),
            &SelectionMode::PlainLatest,
            &stable_policy(),
        )
        .unwrap();
        assert_eq!(result.unwrap().name, "1.3.0");
    }

    #[test]
    fn test_plain_latest_skips_invalid() {
        let result = resolve(
            &tags(&["latest", "1.0.0", "not-a-version"]),
            &SelectionMode::PlainLatest,
            &stable_policy(),
        )
        .unwrap()
        .unwrap();
        assert_eq!(result.name, "1.0.0");
        assert!(result.is_semver());
    }

    #[test]
    fn test_plain_latest_no_valid_tags_is_error() {
        let err = resolve(
            &tags(&["latest", "nightly"]),
            &SelectionMode::PlainLatest,
            &stable_policy(),
        )
        .unwrap_err();
        assert!(matches!(err, ReleaseError::NoValidTagFound));
    }

    #[test]
    fn test_plain_latest_deterministic_tie_break() {
        // equal precedence, build metadata differs; earliest input entry wins
        let list = tags(&["1.0.0+linux", "1.0.0+mac"]);
        for _ in 0..3 {
            let result = resolve(&list, &SelectionMode::PlainLatest, &stable_policy())
                .unwrap()
                .unwrap();
            assert_eq!(result.name, "1.0.0+linux");
        }
    }

    #[test]
    fn test_environment_channel_prerelease() {
        let result = resolve(
            &tags(&["1.0.0", "1.0.1-pre.0", "1.0.1-pre.1", "1.0.1-rc.0"]),
            &SelectionMode::EnvironmentChannel,
            &channel_policy("pre"),
        )
        .unwrap();
        assert_eq!(result.unwrap().name, "1.0.1-pre.1");
    }

    #[test]
    fn test_environment_channel_stable_excludes_prereleases() {
        let result = resolve(
            &tags(&["1.0.0", "1.0.1-pre.0", "1.1.0-pre.3"]),
            &SelectionMode::EnvironmentChannel,
            &stable_policy(),
        )
        .unwrap();
        assert_eq!(result.unwrap().name, "1.0.0");
    }

    #[test]
    fn test_environment_channel_first_release_sentinel() {
        let result = resolve(
            &tags(&["1.0.0", "1.1.0"]),
            &SelectionMode::EnvironmentChannel,
            &channel_policy("pre"),
        )
        .unwrap();
        assert_eq!(result, None);
    }

    #[test]
    fn test_environment_channel_empty_list() {
        let result = resolve(&[], &SelectionMode::EnvironmentChannel, &stable_policy()).unwrap();
        assert_eq!(result, None);
    }

    #[test]
    fn test_environment_unrestricted_sees_everything() {
        let policy = EnvironmentPolicy {
            prerelease_channel: None,
            stable_only: false,
            default_bump: Bump::None,
        };
        let result = resolve(
            &tags(&["1.0.0", "1.0.1-rc.0"]),
            &SelectionMode::EnvironmentChannel,
            &policy,
        )
        .unwrap();
        assert_eq!(result.unwrap().name, "1.0.1-rc.0");
    }

    #[test]
    fn test_predecessor_of() {
        let result = resolve(
            &tags(&["1.0.0", "1.2.0", "1.3.0", "2.0.0"]),
            &SelectionMode::PredecessorOf("1.3.0".to_string()),
            &stable_policy(),
        )
        .unwrap();
        assert_eq!(result.unwrap().name, "1.2.0");
    }

    #[test]
    fn test_predecessor_of_nothing_below() {
        let result = resolve(
            &tags(&["1.0.0"]),
            &SelectionMode::PredecessorOf("0.5.0".to_string()),
            &stable_policy(),
        )
        .unwrap();
        assert_eq!(result, None);
    }

    #[test]
    fn test_predecessor_of_invalid_current() {
        let err = resolve(
            &tags(&["1.0.0"]),
            &SelectionMode::PredecessorOf("latest".to_string()),
            &stable_policy(),
        )
        .unwrap_err();
        assert!(matches!(err, ReleaseError::InvalidVersion(_)));
    }

    #[test]
    fn test_predecessor_excludes_equal() {
        let result = resolve(
            &tags(&["1.3.0", "1.3.0+meta"]),
            &SelectionMode::PredecessorOf("1.3.0".to_string()),
            &stable_policy(),
        )
        .unwrap();
        assert_eq!(result, None);
    }

    #[test]
    fn test_channel_warnings_flags_foreign_prereleases() {
        let warnings = channel_warnings(
            &tags(&["1.0.0", "1.0.1-pre.0", "1.0.1-rc.0", "oddball"]),
            &["pre".to_string()],
        );
        assert_eq!(
            warnings,
            vec![ReleaseWarning::UnknownChannelTag {
                tag: "1.0.1-rc.0".to_string()
            }]
        );
    }

    #[test]
    fn test_channel_warnings_empty_when_all_known() {
        let warnings = channel_warnings(
            &tags(&["1.0.0", "1.0.1-pre.0"]),
            &["pre".to_string()],
        );
        assert!(warnings.is_empty());
    }
}
