use std::fmt;

/// Non-fatal conditions collected during a release run.
/// These are reported to the user but never block the release.
#[derive(Debug, Clone, PartialEq)]
pub enum ReleaseWarning {
    /// A prerelease tag whose identifiers match no configured channel label.
    /// Such tags are invisible to environment-aware resolution.
    UnknownChannelTag { tag: String },
    /// The commit comparison against the previous tag could not be computed
    UnavailableCommitRange { base: String, reason: String },
    /// An artifact glob pattern matched no files
    NoMatchingArtifacts { pattern: String },
    /// An artifact failed to upload even after the hash-named retry
    AssetUploadFailed { file: String, reason: String },
}

impl fmt::Display for ReleaseWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReleaseWarning::UnknownChannelTag { tag } => {
                write!(
                    f,
                    "Tag '{}' carries prerelease identifiers that match no configured channel; it is invisible to tag resolution",
                    tag
                )
            }
            ReleaseWarning::UnavailableCommitRange { base, reason } => {
                write!(
                    f,
                    "Could not compare commits against '{}' ({}); continuing with an empty commit list",
                    base, reason
                )
            }
            ReleaseWarning::NoMatchingArtifacts { pattern } => {
                write!(f, "Artifact pattern '{}' matched no files", pattern)
            }
            ReleaseWarning::AssetUploadFailed { file, reason } => {
                write!(f, "Failed to upload '{}': {}", file, reason)
            }
        }
    }
}
