//! Release artifact upload.
//!
//! Expands each glob pattern, uploads every match under its base name, and
//! retries a failed upload once with a content-hash-qualified file name. A
//! second failure is recorded per file; other files keep uploading.

use crate::error::Result;
use crate::host::{Release, ReleaseHost};
use crate::warning::ReleaseWarning;
use sha2::{Digest, Sha256};
use std::path::Path;

/// What happened to each artifact
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UploadReport {
    /// File names attached to the release, in upload order
    pub uploaded: Vec<String>,
    /// Non-fatal per-file and per-pattern failures
    pub warnings: Vec<ReleaseWarning>,
}

/// Base name with a short content hash spliced in before the extension
fn hashed_name(file_name: &str, bytes: &[u8]) -> String {
    let digest = Sha256::digest(bytes);
    let hash = hex::encode(&digest[..8]);

    let path = Path::new(file_name);
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| file_name.to_string());
    match path.extension() {
        Some(ext) => format!("{}-{}.{}", stem, hash, ext.to_string_lossy()),
        None => format!("{}-{}", stem, hash),
    }
}

fn base_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

fn upload_one<H: ReleaseHost>(
    host: &H,
    release: &Release,
    path: &Path,
    report: &mut UploadReport,
) -> Result<()> {
    let bytes = std::fs::read(path)?;
    let name = base_name(path);

    match host.upload_asset(release, &name, &bytes) {
        Ok(()) => {
            report.uploaded.push(name);
            Ok(())
        }
        Err(first) => {
            let retry_name = hashed_name(&name, &bytes);
            match host.upload_asset(release, &retry_name, &bytes) {
                Ok(()) => {
                    report.uploaded.push(retry_name);
                    Ok(())
                }
                Err(_) => {
                    report.warnings.push(ReleaseWarning::AssetUploadFailed {
                        file: name,
                        reason: first.to_string(),
                    });
                    Ok(())
                }
            }
        }
    }
}

/// Upload every file matching the given glob patterns.
///
/// Upload failures never abort the run; they surface through the report's
/// warnings.
pub fn upload_artifacts<H: ReleaseHost>(
    host: &H,
    release: &Release,
    patterns: &[String],
) -> UploadReport {
    let mut report = UploadReport::default();

    for pattern in patterns {
        let paths = match glob::glob(pattern) {
            Ok(paths) => paths,
            Err(e) => {
                report.warnings.push(ReleaseWarning::AssetUploadFailed {
                    file: pattern.clone(),
                    reason: e.to_string(),
                });
                continue;
            }
        };

        let mut matched = false;
        for entry in paths.flatten() {
            if !entry.is_file() {
                continue;
            }
            matched = true;
            if let Err(e) = upload_one(host, release, &entry, &mut report) {
                report.warnings.push(ReleaseWarning::AssetUploadFailed {
                    file: base_name(&entry),
                    reason: e.to_string(),
                });
            }
        }

        if !matched {
            report.warnings.push(ReleaseWarning::NoMatchingArtifacts {
                pattern: pattern.clone(),
            });
        }
    }

    report
}
