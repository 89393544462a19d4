//! Semantic version policy: validity, ordering, and increment rules.
//!
//! Thin layer over the `semver` crate. Tags commonly carry a `v` prefix, so
//! parsing strips a single leading `v`/`V` before handing off to semver.

use crate::error::{ReleaseError, Result};
use semver::{BuildMetadata, Prerelease, Version};
use std::cmp::Ordering;

/// The kind of version increment to apply.
///
/// The `Pre*` kinds bump the named component and open a prerelease sequence;
/// `Prerelease` advances an existing prerelease counter (or opens one on a
/// stable version by bumping patch first).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IncrementKind {
    Major,
    Minor,
    Patch,
    PreMajor,
    PreMinor,
    PrePatch,
    Prerelease,
}

/// A single prerelease identifier, numeric or textual
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identifier {
    Numeric(u64),
    Text(String),
}

impl Identifier {
    fn parse(raw: &str) -> Self {
        match raw.parse::<u64>() {
            Ok(n) => Identifier::Numeric(n),
            Err(_) => Identifier::Text(raw.to_string()),
        }
    }

    fn render(&self) -> String {
        match self {
            Identifier::Numeric(n) => n.to_string(),
            Identifier::Text(s) => s.clone(),
        }
    }
}

/// Strip a single leading 'v' or 'V' prefix from a tag-like string.
fn strip_prefix(s: &str) -> &str {
    s.strip_prefix('v').or_else(|| s.strip_prefix('V')).unwrap_or(s)
}

/// Parse a version string, tolerating a leading 'v'/'V' prefix.
///
/// # Returns
/// * `Ok(Version)` - Parsed semantic version
/// * `Err(InvalidVersion)` - If the string does not satisfy semver grammar
pub fn parse(s: &str) -> Result<Version> {
    Version::parse(strip_prefix(s))
        .map_err(|e| ReleaseError::invalid_version(format!("'{}': {}", s, e)))
}

/// True iff the string parses as a semantic version (with optional 'v' prefix).
pub fn is_valid(s: &str) -> bool {
    parse(s).is_ok()
}

/// Total order by semver precedence. Build metadata does not participate;
/// versions differing only in build metadata compare equal.
pub fn compare(a: &Version, b: &Version) -> Ordering {
    a.cmp_precedence(b)
}

/// The prerelease identifiers of a version, in order (empty for stable versions).
pub fn prerelease_identifiers(v: &Version) -> Vec<Identifier> {
    if v.pre.is_empty() {
        return Vec::new();
    }
    v.pre.as_str().split('.').map(Identifier::parse).collect()
}

/// True iff the version's prerelease identifier sequence contains `label`.
pub fn in_channel(v: &Version, label: &str) -> bool {
    prerelease_identifiers(v)
        .iter()
        .any(|id| matches!(id, Identifier::Text(t) if t == label))
}

fn make_prerelease(ids: &[Identifier]) -> Result<Prerelease> {
    let joined = ids
        .iter()
        .map(Identifier::render)
        .collect::<Vec<_>>()
        .join(".");
    Prerelease::new(&joined)
        .map_err(|e| ReleaseError::invalid_version(format!("prerelease '{}': {}", joined, e)))
}

fn opening_prerelease(label: Option<&str>) -> Result<Prerelease> {
    match label {
        Some(l) => make_prerelease(&[Identifier::Text(l.to_string()), Identifier::Numeric(0)]),
        None => Ok(Prerelease::new("0").unwrap_or(Prerelease::EMPTY)),
    }
}

/// Advance an existing prerelease sequence: increment the trailing numeric
/// identifier (appending `.0` when none exists), then reset to `label.0` when
/// the sequence belongs to a different channel.
fn advance_prerelease(pre: &Prerelease, label: Option<&str>) -> Result<Prerelease> {
    let mut ids: Vec<Identifier> = pre.as_str().split('.').map(Identifier::parse).collect();

    let mut bumped = false;
    for id in ids.iter_mut().rev() {
        if let Identifier::Numeric(n) = id {
            *n += 1;
            bumped = true;
            break;
        }
    }
    if !bumped {
        ids.push(Identifier::Numeric(0));
    }

    if let Some(l) = label {
        let same_channel = match (ids.first(), ids.get(1)) {
            (Some(Identifier::Text(t)), Some(Identifier::Numeric(_))) => t == l,
            _ => false,
        };
        if !same_channel {
            ids = vec![Identifier::Text(l.to_string()), Identifier::Numeric(0)];
        }
    }

    make_prerelease(&ids)
}

/// Compute the incremented version.
///
/// Follows the established increment rules for prerelease-aware versioning:
/// a plain `Major`/`Minor`/`Patch` bump on a version that is already a
/// prerelease of the target component collapses to the release version
/// (e.g. `2.0.0-beta.1` + `Major` = `2.0.0`). Build metadata is dropped.
///
/// # Arguments
/// * `version` - Version to increment
/// * `kind` - Increment kind
/// * `label` - Prerelease channel label for the `Pre*`/`Prerelease` kinds
///
/// # Returns
/// * `Ok(Version)` - The incremented version (always valid)
/// * `Err(InvalidVersion)` - If a supplied label is not a legal identifier
pub fn increment(version: &Version, kind: IncrementKind, label: Option<&str>) -> Result<Version> {
    let mut v = version.clone();
    v.build = BuildMetadata::EMPTY;

    match kind {
        IncrementKind::Major => {
            if v.pre.is_empty() || v.minor != 0 || v.patch != 0 {
                v.major += 1;
            }
            v.minor = 0;
            v.patch = 0;
            v.pre = Prerelease::EMPTY;
        }
        IncrementKind::Minor => {
            if v.pre.is_empty() || v.patch != 0 {
                v.minor += 1;
            }
            v.patch = 0;
            v.pre = Prerelease::EMPTY;
        }
        IncrementKind::Patch => {
            if v.pre.is_empty() {
                v.patch += 1;
            }
            v.pre = Prerelease::EMPTY;
        }
        IncrementKind::PreMajor => {
            v.major += 1;
            v.minor = 0;
            v.patch = 0;
            v.pre = opening_prerelease(label)?;
        }
        IncrementKind::PreMinor => {
            v.minor += 1;
            v.patch = 0;
            v.pre = opening_prerelease(label)?;
        }
        IncrementKind::PrePatch => {
            v.patch += 1;
            v.pre = opening_prerelease(label)?;
        }
        IncrementKind::Prerelease => {
            if v.pre.is_empty() {
                v.patch += 1;
                v.pre = opening_prerelease(label)?;
            } else {
                v.pre = advance_prerelease(&v.pre, label)?;
            }
        }
    }

    Ok(v)
}
