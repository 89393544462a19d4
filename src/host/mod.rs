//! Repository host abstraction layer
//!
//! This module provides a trait-based abstraction over the repository host
//! that owns tags and releases, allowing for multiple implementations
//! including a local git repository and a mock implementation for testing.
//!
//! # Overview
//!
//! The primary abstraction is the [ReleaseHost] trait, which defines the
//! operations the release pipeline needs. The concrete implementations
//! include:
//!
//! - [local::GitRepoHost]: A local implementation using the `git2` crate
//! - [mock::MockHost]: A mock implementation for testing
//!
//! Most code should depend on the [ReleaseHost] trait rather than concrete
//! implementations to enable easy testing and flexibility. The host instance
//! is bound to a single repository at construction time.

pub mod local;
pub mod mock;

pub use local::GitRepoHost;
pub use mock::MockHost;

use crate::domain::RawCommit;
use crate::error::Result;

/// Base ref sentinel meaning "repository root / first release"
pub const ROOT_BASE: &str = "HEAD";

/// One tag as listed by the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagEntry {
    pub name: String,
    pub commit_sha: String,
}

/// Parameters for creating a release
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseParams {
    pub tag_name: String,
    pub name: String,
    pub body: String,
    pub prerelease: bool,
}

/// A release record owned by the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Release {
    pub id: u64,
    pub tag_name: String,
    pub upload_url: String,
}

/// Operations the release pipeline requires from a repository host.
///
/// ## Thread Safety
///
/// All implementors must be `Send + Sync` to allow safe sharing across
/// threads.
///
/// ## Error Handling
///
/// All methods return [crate::error::Result<T>]. Implementations map their
/// underlying failures onto [crate::error::ReleaseError] variants; in
/// particular commit comparison failures become
/// [crate::error::ReleaseError::CommitRange] so the caller can degrade them,
/// and asset name collisions become
/// [crate::error::ReleaseError::AssetConflict] so the caller can retry.
pub trait ReleaseHost: Send + Sync {
    /// List every tag in the repository, with the commit each points at.
    fn list_tags(&self) -> Result<Vec<TagEntry>>;

    /// Whether a tag ref currently exists.
    ///
    /// # Arguments
    /// * `name` - Plain tag name (e.g. "1.2.0"), without a `refs/tags/` prefix
    fn tag_exists(&self, name: &str) -> Result<bool>;

    /// Commits reachable from `head` but not from `base`, oldest first.
    ///
    /// # Arguments
    /// * `base` - Tag name to diff from, or [ROOT_BASE] for the full history
    /// * `head` - Commit SHA (or ref) the release will point at
    ///
    /// # Returns
    /// * `Ok(commits)` - Commit range in chronological order (oldest first)
    /// * `Err(CommitRange)` - If the comparison cannot be computed
    fn compare_commits(&self, base: &str, head: &str) -> Result<Vec<RawCommit>>;

    /// Create the tag ref, force-moving it when it already exists.
    fn create_or_update_tag(&self, name: &str, sha: &str) -> Result<()>;

    /// Find the release currently attached to a tag.
    ///
    /// # Returns
    /// * `Ok(Some(release))` - The attached release
    /// * `Ok(None)` - No release exists for the tag
    fn get_release_by_tag(&self, tag: &str) -> Result<Option<Release>>;

    /// Delete a release by id. The tag ref is left alone.
    fn delete_release(&self, id: u64) -> Result<()>;

    /// Create a release for a tag.
    fn create_release(&self, params: &ReleaseParams) -> Result<Release>;

    /// Attach an asset to a release.
    ///
    /// # Returns
    /// * `Err(AssetConflict)` - The file name is already taken; the caller
    ///   retries once with a content-hash-qualified name
    fn upload_asset(&self, release: &Release, file_name: &str, bytes: &[u8]) -> Result<()>;
}
