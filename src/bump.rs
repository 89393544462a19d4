//! Version bump decisions from classified commits.

use crate::config::EnvironmentPolicy;
use crate::domain::{version, ClassifiedCommit, CommitType, IncrementKind};
use crate::error::Result;
use semver::Version;
use serde::{Deserialize, Serialize};

/// Magnitude of the version increment implied by a set of changes.
///
/// Ordered by severity: `None < Patch < Minor < Major`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Bump {
    #[default]
    None,
    Patch,
    Minor,
    Major,
}

/// Computes bump decisions and next versions under an environment policy
pub struct BumpCalculator {
    policy: EnvironmentPolicy,
}

impl BumpCalculator {
    /// Create a calculator for the given environment policy
    pub fn new(policy: EnvironmentPolicy) -> Self {
        BumpCalculator { policy }
    }

    /// Decide the bump for a set of classified commits.
    ///
    /// Strict priority: any breaking commit wins, then any feature, then any
    /// fix. Merge and revert commits never count. When nothing qualifies the
    /// policy's default bump applies.
    pub fn decide(&self, commits: &[ClassifiedCommit]) -> Bump {
        let mut bump = Bump::None;

        for commit in commits {
            if commit.is_noise() {
                continue;
            }

            let candidate = match commit.commit_type {
                Some(CommitType::Breaking) => Bump::Major,
                Some(CommitType::Feat) => Bump::Minor,
                Some(CommitType::Fix) => Bump::Patch,
                _ => Bump::None,
            };

            if candidate > bump {
                bump = candidate;
            }

            // Nothing outranks a breaking change
            if bump == Bump::Major {
                return bump;
            }
        }

        if bump == Bump::None {
            return self.policy.default_bump;
        }
        bump
    }

    /// Apply a bump decision to the current version.
    ///
    /// Stable environments map the bump onto a plain increment; `Bump::None`
    /// yields `Ok(None)`, the distinct nothing-to-release signal. In a
    /// channel-tracking environment a version already inside the channel only
    /// advances its prerelease counter; otherwise the channel opens with the
    /// pre-increment matching the bump.
    ///
    /// # Returns
    /// * `Ok(Some(version))` - The next version to tag
    /// * `Ok(None)` - No version-worthy change
    /// * `Err(InvalidVersion)` - Channel label is not a legal identifier
    pub fn next_version(&self, current: &Version, bump: Bump) -> Result<Option<Version>> {
        if let Some(label) = &self.policy.prerelease_channel {
            if version::in_channel(current, label) {
                let next = version::increment(current, IncrementKind::Prerelease, Some(label))?;
                return Ok(Some(next));
            }

            let kind = match bump {
                Bump::None => IncrementKind::Prerelease,
                Bump::Patch => IncrementKind::PrePatch,
                Bump::Minor => IncrementKind::PreMinor,
                Bump::Major => IncrementKind::PreMajor,
            };
            let next = version::increment(current, kind, Some(label))?;
            return Ok(Some(next));
        }

        let kind = match bump {
            Bump::None => return Ok(None),
            Bump::Patch => IncrementKind::Patch,
            Bump::Minor => IncrementKind::Minor,
            Bump::Major => IncrementKind::Major,
        };
        Ok(Some(version::increment(current, kind, None)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::RawCommit;

    fn commit(commit_type: Option<CommitType>) -> ClassifiedCommit {
        ClassifiedCommit {
            sha: "abcdef1234567890".to_string(),
            author: "Ann".to_string(),
            html_url: String::new(),
            commit_type,
            scope: None,
            subject: "subject".to_string(),
            header: "header".to_string(),
            is_merge: false,
            is_revert: false,
        }
    }

    fn classify_all(messages: &[&str]) -> Vec<ClassifiedCommit> {
        let classifier = crate::conventional::Classifier::with_defaults();
        messages
            .iter()
            .map(|m| {
                classifier.classify(&RawCommit {
                    sha: "abcdef1234567890".to_string(),
                    message: m.to_string(),
                    author: Some("Ann".to_string()),
                    html_url: String::new(),
                })
            })
            .collect()
    }

    fn prod_policy() -> EnvironmentPolicy {
        EnvironmentPolicy {
            prerelease_channel: None,
            stable_only: true,
            default_bump: Bump::Patch,
        }
    }

    fn strict_policy() -> EnvironmentPolicy {
        EnvironmentPolicy {
            prerelease_channel: None,
            stable_only: true,
            default_bump: Bump::None,
        }
    }

    fn channel_policy() -> EnvironmentPolicy {
        EnvironmentPolicy {
            prerelease_channel: Some("pre".to_string()),
            stable_only: false,
            default_bump: Bump::None,
        }
    }

    fn ver(s: &str) -> Version {
        crate::domain::version::parse(s).unwrap()
    }

    #[test]
    fn test_decide_breaking_wins() {
        let calc = BumpCalculator::new(strict_policy());
        let commits = classify_all(&["feat: add endpoint", "fix(core)!: breaking change"]);
        assert_eq!(calc.decide(&commits), Bump::Major);
    }

    #[test]
    fn test_decide_feature_over_fix() {
        let calc = BumpCalculator::new(strict_policy());
        let commits = classify_all(&["fix: bug", "feat: thing", "docs: readme"]);
        assert_eq!(calc.decide(&commits), Bump::Minor);
    }

    #[test]
    fn test_decide_fix_only() {
        let calc = BumpCalculator::new(strict_policy());
        let commits = classify_all(&["fix: bug", "chore: deps"]);
        assert_eq!(calc.decide(&commits), Bump::Patch);
    }

    #[test]
    fn test_decide_default_applies_when_nothing_qualifies() {
        let calc = BumpCalculator::new(prod_policy());
        let commits = classify_all(&["fix: bug", "docs: readme"]);
        assert_eq!(calc.decide(&commits), Bump::Patch);

        let commits = classify_all(&["docs: readme", "chore: deps"]);
        assert_eq!(calc.decide(&commits), Bump::Patch);
    }

    #[test]
    fn test_decide_none_without_default() {
        let calc = BumpCalculator::new(strict_policy());
        let commits = classify_all(&["docs: readme", "style: fmt"]);
        assert_eq!(calc.decide(&commits), Bump::None);
    }

    #[test]
    fn test_decide_empty_set() {
        assert_eq!(BumpCalculator::new(strict_policy()).decide(&[]), Bump::None);
        assert_eq!(BumpCalculator::new(prod_policy()).decide(&[]), Bump::Patch);
    }

    #[test]
    fn test_decide_skips_merges_and_reverts() {
        let calc = BumpCalculator::new(strict_policy());
        let mut merge = commit(Some(CommitType::Feat));
        merge.is_merge = true;
        let mut revert = commit(Some(CommitType::Breaking));
        revert.is_revert = true;
        assert_eq!(calc.decide(&[merge, revert]), Bump::None);
    }

    #[test]
    fn test_decide_is_monotonic_in_breaking_commits() {
        let calc = BumpCalculator::new(strict_policy());
        let sets: Vec<Vec<ClassifiedCommit>> = vec![
            vec![],
            vec![commit(Some(CommitType::Fix))],
            vec![commit(Some(CommitType::Feat)), commit(None)],
        ];
        for set in sets {
            let before = calc.decide(&set);
            let mut with_breaking = set.clone();
            with_breaking.push(commit(Some(CommitType::Breaking)));
            assert!(calc.decide(&with_breaking) >= before);
        }
    }

    #[test]
    fn test_bump_severity_order() {
        assert!(Bump::None < Bump::Patch);
        assert!(Bump::Patch < Bump::Minor);
        assert!(Bump::Minor < Bump::Major);
    }

    #[test]
    fn test_next_version_stable() {
        let calc = BumpCalculator::new(prod_policy());
        assert_eq!(
            calc.next_version(&ver("1.2.3"), Bump::Major).unwrap(),
            Some(ver("2.0.0"))
        );
        assert_eq!(
            calc.next_version(&ver("1.2.3"), Bump::Minor).unwrap(),
            Some(ver("1.3.0"))
        );
        assert_eq!(
            calc.next_version(&ver("1.2.3"), Bump::Patch).unwrap(),
            Some(ver("1.2.4"))
        );
    }

    #[test]
    fn test_next_version_none_signals_no_release() {
        let calc = BumpCalculator::new(strict_policy());
        assert_eq!(calc.next_version(&ver("1.2.3"), Bump::None).unwrap(), None);
    }

    #[test]
    fn test_next_version_channel_counter_bump() {
        // an in-channel version only advances its counter, whatever the bump
        let calc = BumpCalculator::new(channel_policy());
        assert_eq!(
            calc.next_version(&ver("2.0.0-pre.1"), Bump::None).unwrap(),
            Some(ver("2.0.0-pre.2"))
        );
        assert_eq!(
            calc.next_version(&ver("2.0.0-pre.1"), Bump::Minor).unwrap(),
            Some(ver("2.0.0-pre.2"))
        );
    }

    #[test]
    fn test_next_version_channel_opens_with_bump() {
        let calc = BumpCalculator::new(channel_policy());
        assert_eq!(
            calc.next_version(&ver("1.2.3"), Bump::Minor).unwrap(),
            Some(ver("1.3.0-pre.0"))
        );
        assert_eq!(
            calc.next_version(&ver("1.2.3"), Bump::Major).unwrap(),
            Some(ver("2.0.0-pre.0"))
        );
    }

    #[test]
    fn test_next_version_channel_opens_without_qualifying_commits() {
        let calc = BumpCalculator::new(channel_policy());
        assert_eq!(
            calc.next_version(&ver("1.2.3"), Bump::None).unwrap(),
            Some(ver("1.2.4-pre.0"))
        );
    }
}
