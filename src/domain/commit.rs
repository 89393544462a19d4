/// One commit as fetched from the repository host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawCommit {
    /// Full commit SHA
    pub sha: String,
    /// Full commit message (header, body, footers)
    pub message: String,
    /// Author name, when the host reports one
    pub author: Option<String>,
    /// Web URL of the commit
    pub html_url: String,
}

/// Conventional commit types, in changelog section order.
///
/// The declaration order is the rendering order; `ALL` iterates it so the
/// type-to-label association stays a fixed ordered list rather than a map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitType {
    Feat,
    Fix,
    Docs,
    Style,
    Refactor,
    Perf,
    Test,
    Build,
    Ci,
    Chore,
    Revert,
    Breaking,
}

impl CommitType {
    /// Every commit type, in changelog section order
    pub const ALL: [CommitType; 12] = [
        CommitType::Feat,
        CommitType::Fix,
        CommitType::Docs,
        CommitType::Style,
        CommitType::Refactor,
        CommitType::Perf,
        CommitType::Test,
        CommitType::Build,
        CommitType::Ci,
        CommitType::Chore,
        CommitType::Revert,
        CommitType::Breaking,
    ];

    /// Section heading used for this type in the changelog
    pub fn label(&self) -> &'static str {
        match self {
            CommitType::Feat => "Features",
            CommitType::Fix => "Bug Fixes",
            CommitType::Docs => "Documentation",
            CommitType::Style => "Styles",
            CommitType::Refactor => "Code Refactoring",
            CommitType::Perf => "Performance Improvements",
            CommitType::Test => "Tests",
            CommitType::Build => "Builds",
            CommitType::Ci => "Continuous Integration",
            CommitType::Chore => "Chores",
            CommitType::Revert => "Reverts",
            CommitType::Breaking => "Breaking Changes",
        }
    }

    /// Map a lower-cased header token onto a commit type
    pub fn from_token(token: &str) -> Option<CommitType> {
        match token {
            "feat" => Some(CommitType::Feat),
            "fix" => Some(CommitType::Fix),
            "docs" => Some(CommitType::Docs),
            "style" => Some(CommitType::Style),
            "refactor" => Some(CommitType::Refactor),
            "perf" => Some(CommitType::Perf),
            "test" => Some(CommitType::Test),
            "build" => Some(CommitType::Build),
            "ci" => Some(CommitType::Ci),
            "chore" => Some(CommitType::Chore),
            "revert" => Some(CommitType::Revert),
            "breaking" => Some(CommitType::Breaking),
            _ => None,
        }
    }
}

/// A commit after conventional-commit classification.
///
/// Created once per [RawCommit] and never mutated. Commits flagged as merges
/// or reverts are excluded from changelog grouping and bump computation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedCommit {
    /// Full commit SHA
    pub sha: String,
    /// Author name, defaulted to "Unknown" when the host reported none
    pub author: String,
    /// Web URL of the commit
    pub html_url: String,
    /// Recognized type, absent for unstructured messages
    pub commit_type: Option<CommitType>,
    /// Scope from the `type(scope)` parenthesis group
    pub scope: Option<String>,
    /// Subject text after the colon (or the whole header when unclassified)
    pub subject: String,
    /// First line of the commit message
    pub header: String,
    /// Matched the merge-commit pattern
    pub is_merge: bool,
    /// Matched the revert-commit pattern
    pub is_revert: bool,
}

impl ClassifiedCommit {
    /// First 7 characters of the commit SHA
    pub fn short_sha(&self) -> &str {
        let end = self.sha.len().min(7);
        &self.sha[..end]
    }

    /// True when the commit should be excluded from grouping and bump math
    pub fn is_noise(&self) -> bool {
        self.is_merge || self.is_revert
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_order_matches_rendering_order() {
        assert_eq!(CommitType::ALL[0], CommitType::Feat);
        assert_eq!(CommitType::ALL[1], CommitType::Fix);
        assert_eq!(CommitType::ALL[10], CommitType::Revert);
        assert_eq!(CommitType::ALL[11], CommitType::Breaking);
        assert_eq!(CommitType::ALL.len(), 12);
    }

    #[test]
    fn test_labels() {
        assert_eq!(CommitType::Feat.label(), "Features");
        assert_eq!(CommitType::Fix.label(), "Bug Fixes");
        assert_eq!(CommitType::Ci.label(), "Continuous Integration");
        assert_eq!(CommitType::Breaking.label(), "Breaking Changes");
    }

    #[test]
    fn test_from_token() {
        assert_eq!(CommitType::from_token("feat"), Some(CommitType::Feat));
        assert_eq!(CommitType::from_token("perf"), Some(CommitType::Perf));
        assert_eq!(CommitType::from_token("wip"), None);
        assert_eq!(CommitType::from_token("FEAT"), None);
    }

    #[test]
    fn test_short_sha() {
        let commit = ClassifiedCommit {
            sha: "abcdef1234567890".to_string(),
            author: "Ann".to_string(),
            html_url: String::new(),
            commit_type: None,
            scope: None,
            subject: "x".to_string(),
            header: "x".to_string(),
            is_merge: false,
            is_revert: false,
        };
        assert_eq!(commit.short_sha(), "abcdef1");
    }

    #[test]
    fn test_short_sha_short_input() {
        let commit = ClassifiedCommit {
            sha: "abc".to_string(),
            author: "Ann".to_string(),
            html_url: String::new(),
            commit_type: None,
            scope: None,
            subject: "x".to_string(),
            header: "x".to_string(),
            is_merge: false,
            is_revert: false,
        };
        assert_eq!(commit.short_sha(), "abc");
    }
}
