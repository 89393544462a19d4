use crate::domain::RawCommit;
use crate::error::{ReleaseError, Result};
use crate::host::{Release, ReleaseHost, ReleaseParams, TagEntry, ROOT_BASE};
use std::collections::HashSet;
use std::sync::Mutex;

#[derive(Debug, Clone)]
struct StoredRelease {
    release: Release,
    params: ReleaseParams,
}

#[derive(Default)]
struct MockState {
    tags: Vec<TagEntry>,
    commits: Vec<RawCommit>,
    releases: Vec<StoredRelease>,
    assets: Vec<String>,
    next_release_id: u64,
    fail_compare: bool,
    conflicting_names: HashSet<String>,
    fail_all_uploads: bool,
}

/// Mock host for testing without a repository or network.
///
/// `compare_commits` hands back the seeded commit list whenever `base` is the
/// root sentinel or a known tag; the failure knobs simulate the degraded
/// paths (unavailable comparison, asset name conflicts, dead uploads).
pub struct MockHost {
    state: Mutex<MockState>,
}

impl MockHost {
    /// Create a new empty mock host
    pub fn new() -> Self {
        MockHost {
            state: Mutex::new(MockState {
                next_release_id: 1,
                ..MockState::default()
            }),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MockState> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Add a tag entry
    pub fn add_tag(&self, name: impl Into<String>, sha: impl Into<String>) {
        self.lock().tags.push(TagEntry {
            name: name.into(),
            commit_sha: sha.into(),
        });
    }

    /// Seed the commit range returned by `compare_commits`
    pub fn add_commit(&self, commit: RawCommit) {
        self.lock().commits.push(commit);
    }

    /// Make every `compare_commits` call fail
    pub fn fail_compare(&self) {
        self.lock().fail_compare = true;
    }

    /// Make uploads of the given file name fail with a name conflict
    pub fn conflict_on(&self, name: impl Into<String>) {
        self.lock().conflicting_names.insert(name.into());
    }

    /// Make every upload fail, regardless of name
    pub fn fail_all_uploads(&self) {
        self.lock().fail_all_uploads = true;
    }

    /// Names of every uploaded asset, in upload order
    pub fn uploaded_assets(&self) -> Vec<String> {
        self.lock().assets.clone()
    }

    /// Number of releases currently stored
    pub fn release_count(&self) -> usize {
        self.lock().releases.len()
    }

    /// The stored release body for a tag, if any
    pub fn release_body(&self, tag: &str) -> Option<String> {
        self.lock()
            .releases
            .iter()
            .find(|r| r.release.tag_name == tag)
            .map(|r| r.params.body.clone())
    }
}

impl Default for MockHost {
    fn default() -> Self {
        Self::new()
    }
}

impl ReleaseHost for MockHost {
    fn list_tags(&self) -> Result<Vec<TagEntry>> {
        Ok(self.lock().tags.clone())
    }

    fn tag_exists(&self, name: &str) -> Result<bool> {
        Ok(self.lock().tags.iter().any(|t| t.name == name))
    }

    fn compare_commits(&self, base: &str, head: &str) -> Result<Vec<RawCommit>> {
        let state = self.lock();
        if state.fail_compare {
            return Err(ReleaseError::commit_range(format!(
                "cannot compare {}...{}",
                base, head
            )));
        }
        if base != ROOT_BASE && !state.tags.iter().any(|t| t.name == base) {
            return Err(ReleaseError::commit_range(format!("unknown base '{}'", base)));
        }
        Ok(state.commits.clone())
    }

    fn create_or_update_tag(&self, name: &str, sha: &str) -> Result<()> {
        let mut state = self.lock();
        if let Some(existing) = state.tags.iter_mut().find(|t| t.name == name) {
            existing.commit_sha = sha.to_string();
        } else {
            state.tags.push(TagEntry {
                name: name.to_string(),
                commit_sha: sha.to_string(),
            });
        }
        Ok(())
    }

    fn get_release_by_tag(&self, tag: &str) -> Result<Option<Release>> {
        Ok(self
            .lock()
            .releases
            .iter()
            .find(|r| r.release.tag_name == tag)
            .map(|r| r.release.clone()))
    }

    fn delete_release(&self, id: u64) -> Result<()> {
        let mut state = self.lock();
        let before = state.releases.len();
        state.releases.retain(|r| r.release.id != id);
        if state.releases.len() == before {
            return Err(ReleaseError::host(format!("no release with id {}", id)));
        }
        Ok(())
    }

    fn create_release(&self, params: &ReleaseParams) -> Result<Release> {
        let mut state = self.lock();
        let id = state.next_release_id;
        state.next_release_id += 1;
        let release = Release {
            id,
            tag_name: params.tag_name.clone(),
            upload_url: format!("mock://releases/{}/assets", id),
        };
        state.releases.push(StoredRelease {
            release: release.clone(),
            params: params.clone(),
        });
        Ok(release)
    }

    fn upload_asset(&self, _release: &Release, file_name: &str, _bytes: &[u8]) -> Result<()> {
        let mut state = self.lock();
        if state.fail_all_uploads {
            return Err(ReleaseError::host("upload endpoint unavailable"));
        }
        if state.conflicting_names.contains(file_name) {
            return Err(ReleaseError::AssetConflict(file_name.to_string()));
        }
        state.assets.push(file_name.to_string());
        Ok(())
    }
}
