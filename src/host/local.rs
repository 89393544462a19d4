use crate::domain::RawCommit;
use crate::error::{ReleaseError, Result};
use crate::host::{Release, ReleaseHost, ReleaseParams, TagEntry, ROOT_BASE};
use git2::{ObjectType, Oid, Repository, Signature};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

/// Local repository host backed by `git2`.
///
/// Tags are plain refs; a release is realized as an annotated tag whose
/// message carries the release name and changelog body. Assets are written
/// into an optional local directory; without one, uploads fail per-file and
/// the pipeline continues.
pub struct GitRepoHost {
    repo: Repository,
    commit_url_base: Option<String>,
    assets_dir: Option<PathBuf>,
    release_tags: Mutex<HashMap<u64, String>>,
}

impl GitRepoHost {
    /// Open or discover a git repository
    pub fn open(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let repo = Repository::discover(path)?;
        let commit_url_base = repo
            .find_remote("origin")
            .ok()
            .and_then(|r| r.url().map(str::to_string))
            .and_then(|url| normalize_remote_url(&url));

        Ok(GitRepoHost {
            repo,
            commit_url_base,
            assets_dir: None,
            release_tags: Mutex::new(HashMap::new()),
        })
    }

    /// Store uploaded assets under the given directory
    pub fn with_assets_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.assets_dir = Some(dir.into());
        self
    }

    /// The commit SHA at HEAD
    pub fn head_sha(&self) -> Result<String> {
        let head = self.repo.head()?;
        let oid = head
            .target()
            .ok_or_else(|| ReleaseError::host("HEAD is detached or invalid"))?;
        Ok(oid.to_string())
    }

    fn commit_url(&self, sha: &str) -> String {
        match &self.commit_url_base {
            Some(base) => format!("{}/commit/{}", base, sha),
            None => String::new(),
        }
    }

    fn tag_commit_oid(&self, name: &str) -> Result<Oid> {
        let reference = self.repo.find_reference(&format!("refs/tags/{}", name))?;
        let commit = reference.peel(ObjectType::Commit)?;
        Ok(commit.id())
    }

    fn signature(&self) -> Result<Signature<'static>> {
        match self.repo.signature() {
            Ok(sig) => Ok(sig),
            Err(_) => Ok(Signature::now("auto-release", "auto-release@localhost")?),
        }
    }

    fn remember_release(&self, id: u64, tag: &str) {
        let mut map = match self.release_tags.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        map.insert(id, tag.to_string());
    }

    fn release_tag(&self, id: u64) -> Option<String> {
        let map = match self.release_tags.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        map.get(&id).cloned()
    }
}

/// Turn a remote URL into an https base usable for commit links
fn normalize_remote_url(url: &str) -> Option<String> {
    let trimmed = url.trim_end_matches(".git").trim_end_matches('/');
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        return Some(trimmed.to_string());
    }
    // scp-like syntax: git@host:owner/repo
    let (user_host, path) = trimmed.split_once(':')?;
    let (_, host) = user_host.split_once('@')?;
    if host.is_empty() || path.is_empty() {
        return None;
    }
    Some(format!("https://{}/{}", host, path))
}

fn id_from_oid(oid: Oid) -> u64 {
    let bytes = oid.as_bytes();
    let mut buf = [0u8; 8];
    buf.copy_from_slice(&bytes[..8]);
    u64::from_be_bytes(buf)
}

impl ReleaseHost for GitRepoHost {
    fn list_tags(&self) -> Result<Vec<TagEntry>> {
        let names = self.repo.tag_names(None)?;
        let mut tags = Vec::new();

        for name in names.iter().flatten() {
            if let Ok(oid) = self.tag_commit_oid(name) {
                tags.push(TagEntry {
                    name: name.to_string(),
                    commit_sha: oid.to_string(),
                });
            }
        }

        Ok(tags)
    }

    fn tag_exists(&self, name: &str) -> Result<bool> {
        match self.repo.find_reference(&format!("refs/tags/{}", name)) {
            Ok(_) => Ok(true),
            Err(e) if e.code() == git2::ErrorCode::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    fn compare_commits(&self, base: &str, head: &str) -> Result<Vec<RawCommit>> {
        let head_oid = self
            .repo
            .revparse_single(head)
            .and_then(|obj| obj.peel_to_commit())
            .map(|c| c.id())
            .map_err(|e| ReleaseError::commit_range(format!("head '{}': {}", head, e)))?;

        let mut revwalk = self
            .repo
            .revwalk()
            .map_err(|e| ReleaseError::commit_range(e.to_string()))?;
        revwalk
            .push(head_oid)
            .map_err(|e| ReleaseError::commit_range(e.to_string()))?;

        if base != ROOT_BASE {
            let base_oid = self
                .tag_commit_oid(base)
                .map_err(|e| ReleaseError::commit_range(format!("base '{}': {}", base, e)))?;
            revwalk
                .hide(base_oid)
                .map_err(|e| ReleaseError::commit_range(e.to_string()))?;
        }

        let mut commits = Vec::new();
        for oid in revwalk {
            let oid = oid.map_err(|e| ReleaseError::commit_range(e.to_string()))?;
            let commit = self
                .repo
                .find_commit(oid)
                .map_err(|e| ReleaseError::commit_range(e.to_string()))?;

            commits.push(RawCommit {
                sha: oid.to_string(),
                message: commit.message().unwrap_or("").to_string(),
                author: commit.author().name().map(str::to_string),
                html_url: self.commit_url(&oid.to_string()),
            });
        }

        commits.reverse();
        Ok(commits)
    }

    fn create_or_update_tag(&self, name: &str, sha: &str) -> Result<()> {
        let oid = Oid::from_str(sha)
            .map_err(|e| ReleaseError::host(format!("bad sha '{}': {}", sha, e)))?;
        let object = self.repo.find_object(oid, None)?;
        self.repo.tag_lightweight(name, &object, true)?;
        Ok(())
    }

    fn get_release_by_tag(&self, tag: &str) -> Result<Option<Release>> {
        let reference = match self.repo.find_reference(&format!("refs/tags/{}", tag)) {
            Ok(r) => r,
            Err(e) if e.code() == git2::ErrorCode::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        // Only an annotated tag carries a release record
        match reference.peel(ObjectType::Tag) {
            Ok(obj) => {
                let id = id_from_oid(obj.id());
                self.remember_release(id, tag);
                Ok(Some(Release {
                    id,
                    tag_name: tag.to_string(),
                    upload_url: String::new(),
                }))
            }
            Err(_) => Ok(None),
        }
    }

    fn delete_release(&self, id: u64) -> Result<()> {
        let tag = self
            .release_tag(id)
            .ok_or_else(|| ReleaseError::host(format!("no release with id {}", id)))?;

        // Replace the annotated tag with a lightweight one at the same
        // commit, so the tag survives while the release record goes away
        let commit_oid = self.tag_commit_oid(&tag)?;
        let object = self.repo.find_object(commit_oid, None)?;
        self.repo.tag_lightweight(&tag, &object, true)?;
        Ok(())
    }

    fn create_release(&self, params: &ReleaseParams) -> Result<Release> {
        let commit_oid = self.tag_commit_oid(&params.tag_name)?;
        let object = self.repo.find_object(commit_oid, None)?;
        let sig = self.signature()?;

        let message = if params.body.is_empty() {
            params.name.clone()
        } else {
            format!("{}\n\n{}", params.name, params.body)
        };

        let tag_oid = self.repo.tag(&params.tag_name, &object, &sig, &message, true)?;
        let id = id_from_oid(tag_oid);
        self.remember_release(id, &params.tag_name);

        let upload_url = self
            .assets_dir
            .as_ref()
            .map(|d| d.join(&params.tag_name).display().to_string())
            .unwrap_or_default();

        Ok(Release {
            id,
            tag_name: params.tag_name.clone(),
            upload_url,
        })
    }

    fn upload_asset(&self, release: &Release, file_name: &str, bytes: &[u8]) -> Result<()> {
        let dir = self
            .assets_dir
            .as_ref()
            .ok_or_else(|| ReleaseError::host("no asset directory configured"))?;

        let target_dir = dir.join(&release.tag_name);
        std::fs::create_dir_all(&target_dir)?;

        let target = target_dir.join(file_name);
        if target.exists() {
            return Err(ReleaseError::AssetConflict(file_name.to_string()));
        }
        std::fs::write(target, bytes)?;
        Ok(())
    }
}

// SAFETY: GitRepoHost only exposes &self methods that route through libgit2's
// internally synchronized object database; the release id map is behind a
// Mutex.
unsafe impl Sync for GitRepoHost {}
