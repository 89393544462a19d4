//! Conventional-commit classification.
//!
//! Parses `type(scope)!: subject` headers and flags merge/revert commits via
//! configurable patterns. Classification never fails: a message that does not
//! match the grammar becomes an unclassified commit with the header as its
//! subject.

use crate::config::MatcherConfig;
use crate::domain::{ClassifiedCommit, CommitType, RawCommit};
use crate::error::{ReleaseError, Result};
use regex::Regex;

/// Default pattern recognizing pull-request merge commits (header line)
pub const DEFAULT_MERGE_PATTERN: &str = r"^Merge pull request #(\d+) from (.*)$";

/// Default pattern recognizing revert commits (full message)
pub const DEFAULT_REVERT_PATTERN: &str = r#"^Revert "([\s\S]*)"$"#;

const BREAKING_FOOTERS: [&str; 2] = ["BREAKING CHANGE:", "BREAKING-CHANGE:"];

/// Classifies raw commits with compiled merge/revert matchers
pub struct Classifier {
    header_re: Regex,
    merge_re: Regex,
    revert_re: Regex,
}

impl Classifier {
    /// Build a classifier from matcher configuration.
    ///
    /// # Returns
    /// * `Ok(Classifier)` - Matchers compiled
    /// * `Err(Config)` - If an override pattern is not a valid regex
    pub fn new(matchers: &MatcherConfig) -> Result<Self> {
        let header_re = Regex::new(r"^([A-Za-z]+)(?:\(([^)]*)\))?(!)?:\s*(.*)$")
            .map_err(|e| ReleaseError::config(format!("header pattern: {}", e)))?;
        let merge_re = Regex::new(&matchers.merge_pattern)
            .map_err(|e| ReleaseError::config(format!("merge pattern: {}", e)))?;
        let revert_re = Regex::new(&matchers.revert_pattern)
            .map_err(|e| ReleaseError::config(format!("revert pattern: {}", e)))?;

        Ok(Classifier {
            header_re,
            merge_re,
            revert_re,
        })
    }

    /// Classifier with the default merge/revert patterns
    pub fn with_defaults() -> Self {
        // Default patterns are compile-time constants and always valid
        match Classifier::new(&MatcherConfig::default()) {
            Ok(c) => c,
            Err(_) => unreachable!("default matcher patterns are valid"),
        }
    }

    /// Classify one raw commit.
    ///
    /// The type token is lower-cased and must belong to the fixed commit-type
    /// enumeration; anything else degrades to an unclassified entry. A
    /// trailing `!` or a breaking-change footer overrides the type to
    /// [CommitType::Breaking].
    pub fn classify(&self, raw: &RawCommit) -> ClassifiedCommit {
        let header = raw.message.lines().next().unwrap_or("").trim().to_string();

        let is_merge = self.merge_re.is_match(&header);
        let is_revert = self.revert_re.is_match(&raw.message);

        let mut commit_type = None;
        let mut scope = None;
        let mut subject = header.clone();

        if let Some(caps) = self.header_re.captures(&header) {
            let token = caps
                .get(1)
                .map(|m| m.as_str().to_lowercase())
                .unwrap_or_default();

            if let Some(ty) = CommitType::from_token(&token) {
                commit_type = Some(ty);
                scope = caps
                    .get(2)
                    .map(|m| m.as_str().to_string())
                    .filter(|s| !s.is_empty());
                subject = caps
                    .get(4)
                    .map(|m| m.as_str().trim().to_string())
                    .unwrap_or_default();

                let bang = caps.get(3).is_some();
                let footer = BREAKING_FOOTERS.iter().any(|f| raw.message.contains(f));
                if bang || footer {
                    commit_type = Some(CommitType::Breaking);
                }
            }
        }

        ClassifiedCommit {
            sha: raw.sha.clone(),
            author: raw.author.clone().unwrap_or_else(|| "Unknown".to_string()),
            html_url: raw.html_url.clone(),
            commit_type,
            scope,
            subject,
            header,
            is_merge,
            is_revert,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(message: &str) -> RawCommit {
        RawCommit {
            sha: "abcdef1234567890".to_string(),
            message: message.to_string(),
            author: Some("Ann".to_string()),
            html_url: "https://x/1".to_string(),
        }
    }

    #[test]
    fn test_classify_type_and_scope() {
        let c = Classifier::with_defaults().classify(&raw("feat(auth): add oauth support"));
        assert_eq!(c.commit_type, Some(CommitType::Feat));
        assert_eq!(c.scope, Some("auth".to_string()));
        assert_eq!(c.subject, "add oauth support");
        assert_eq!(c.header, "feat(auth): add oauth support");
        assert!(!c.is_merge);
        assert!(!c.is_revert);
    }

    #[test]
    fn test_classify_type_without_scope() {
        let c = Classifier::with_defaults().classify(&raw("fix: resolve login issue"));
        assert_eq!(c.commit_type, Some(CommitType::Fix));
        assert_eq!(c.scope, None);
        assert_eq!(c.subject, "resolve login issue");
    }

    #[test]
    fn test_classify_uppercase_token() {
        let c = Classifier::with_defaults().classify(&raw("Fix: resolve login issue"));
        assert_eq!(c.commit_type, Some(CommitType::Fix));
    }

    #[test]
    fn test_classify_breaking_bang() {
        let c = Classifier::with_defaults().classify(&raw("feat(api)!: redesign endpoint"));
        assert_eq!(c.commit_type, Some(CommitType::Breaking));
        assert_eq!(c.scope, Some("api".to_string()));
    }

    #[test]
    fn test_classify_breaking_bang_without_scope() {
        let c = Classifier::with_defaults().classify(&raw("refactor!: drop legacy config"));
        assert_eq!(c.commit_type, Some(CommitType::Breaking));
        assert_eq!(c.scope, None);
    }

    #[test]
    fn test_classify_breaking_footer() {
        let c = Classifier::with_defaults().classify(&raw(
            "fix: rename field\n\nBREAKING CHANGE: field changed from X to Y",
        ));
        assert_eq!(c.commit_type, Some(CommitType::Breaking));
    }

    #[test]
    fn test_classify_unknown_type_degrades() {
        let c = Classifier::with_defaults().classify(&raw("wip: half-done thing"));
        assert_eq!(c.commit_type, None);
        assert_eq!(c.subject, "wip: half-done thing");
    }

    #[test]
    fn test_classify_non_conventional() {
        let c = Classifier::with_defaults().classify(&raw("Updated the readme"));
        assert_eq!(c.commit_type, None);
        assert_eq!(c.subject, "Updated the readme");
        assert_eq!(c.header, "Updated the readme");
    }

    #[test]
    fn test_classify_breaking_footer_on_unstructured_message() {
        // Without a recognized header, the footer does not promote the commit
        let c = Classifier::with_defaults()
            .classify(&raw("rework everything\n\nBREAKING CHANGE: all of it"));
        assert_eq!(c.commit_type, None);
    }

    #[test]
    fn test_classify_merge_commit() {
        let c = Classifier::with_defaults()
            .classify(&raw("Merge pull request #42 from org/feature-branch"));
        assert!(c.is_merge);
        assert!(c.is_noise());
    }

    #[test]
    fn test_classify_revert_commit() {
        let c = Classifier::with_defaults()
            .classify(&raw("Revert \"feat(api): add endpoint\""));
        assert!(c.is_revert);
        assert!(c.is_noise());
    }

    #[test]
    fn test_classify_missing_author_defaults_to_unknown() {
        let mut commit = raw("fix: something");
        commit.author = None;
        let c = Classifier::with_defaults().classify(&commit);
        assert_eq!(c.author, "Unknown");
    }

    #[test]
    fn test_classify_empty_message() {
        let c = Classifier::with_defaults().classify(&raw(""));
        assert_eq!(c.commit_type, None);
        assert_eq!(c.subject, "");
    }

    #[test]
    fn test_classify_header_only_first_line() {
        let c = Classifier::with_defaults()
            .classify(&raw("feat: add endpoint\n\nlong body\nfix: not a type"));
        assert_eq!(c.commit_type, Some(CommitType::Feat));
        assert_eq!(c.header, "feat: add endpoint");
    }

    #[test]
    fn test_custom_merge_pattern() {
        let matchers = MatcherConfig {
            merge_pattern: r"^Merged in (.*) \(pull request #(\d+)\)$".to_string(),
            revert_pattern: DEFAULT_REVERT_PATTERN.to_string(),
        };
        let classifier = Classifier::new(&matchers).unwrap();
        let c = classifier.classify(&raw("Merged in feature-x (pull request #7)"));
        assert!(c.is_merge);
    }

    #[test]
    fn test_invalid_override_pattern_is_config_error() {
        let matchers = MatcherConfig {
            merge_pattern: "([unclosed".to_string(),
            revert_pattern: DEFAULT_REVERT_PATTERN.to_string(),
        };
        assert!(Classifier::new(&matchers).is_err());
    }
}
