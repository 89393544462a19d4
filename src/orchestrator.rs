//! Release workflow orchestration.
//!
//! Sequences tag resolution, commit classification, bump computation,
//! changelog rendering, and host mutations. Re-running with the same target
//! tag force-moves the tag and replaces the release instead of duplicating
//! either.

use crate::bump::BumpCalculator;
use crate::changelog;
use crate::config::Config;
use crate::conventional::Classifier;
use crate::domain::{version, ClassifiedCommit, Tag};
use crate::error::Result;
use crate::host::{ReleaseHost, ReleaseParams, ROOT_BASE};
use crate::resolver::{self, SelectionMode};
use crate::ui;
use crate::upload;
use crate::warning::ReleaseWarning;

/// Arguments for one release run
#[derive(Debug, Clone, PartialEq)]
pub struct ReleaseArgs {
    /// Environment whose policy governs resolution and bumping
    pub environment: String,

    /// How the previous release tag is selected
    pub mode: SelectionMode,

    /// Explicit target tag; when absent the engine computes one
    pub tag: Option<String>,

    /// Release title; the tag name stands in when absent
    pub title: Option<String>,

    /// Mark the created release as a prerelease
    pub prerelease: bool,

    /// Glob patterns for artifacts to attach
    pub artifacts: Vec<String>,

    /// Compute everything but mutate nothing
    pub dry_run: bool,
}

impl ReleaseArgs {
    /// Args for a computed release in the given environment.
    ///
    /// Selection defaults to the environment-channel mode; an explicit target
    /// tag switches it to predecessor resolution against that tag.
    pub fn for_environment(environment: impl Into<String>, tag: Option<String>) -> Self {
        let mode = match &tag {
            Some(t) => SelectionMode::PredecessorOf(t.clone()),
            None => SelectionMode::EnvironmentChannel,
        };
        ReleaseArgs {
            environment: environment.into(),
            mode,
            tag,
            title: None,
            prerelease: false,
            artifacts: Vec::new(),
            dry_run: false,
        }
    }
}

/// What a release run produced
#[derive(Debug, Clone, PartialEq)]
pub enum ReleaseOutcome {
    /// Tag and release were created or replaced
    Published {
        tag: String,
        release_id: u64,
        previous: Option<String>,
        changelog: String,
        uploaded: Vec<String>,
    },
    /// Dry run: everything computed, nothing mutated
    Planned {
        tag: String,
        previous: Option<String>,
        changelog: String,
    },
    /// No version-worthy change; nothing was created
    Skipped { previous: Option<String> },
}

/// Outcome plus every non-fatal condition met along the way
#[derive(Debug, Clone, PartialEq)]
pub struct ReleaseReport {
    pub outcome: ReleaseOutcome,
    pub warnings: Vec<ReleaseWarning>,
}

fn release_name(title: &Option<String>, tag: &str) -> String {
    match title {
        Some(t) => format!("{} - {}", t, tag),
        None => tag.to_string(),
    }
}

/// Decide the target tag for a computed release.
///
/// The bump base is the resolved previous tag when one exists; otherwise the
/// plain-latest tag, so that opening a prerelease channel bumps from the
/// newest version instead of restarting. Returns `Ok(None)` when no
/// version-worthy change exists.
fn computed_tag(
    config: &Config,
    calculator: &BumpCalculator,
    policy: &crate::config::EnvironmentPolicy,
    tags: &[Tag],
    previous: &Option<Tag>,
    commits: &[ClassifiedCommit],
) -> Result<Option<String>> {
    let base = match previous.as_ref().and_then(|t| t.version.as_ref()) {
        Some(v) => Some(v.clone()),
        None => match resolver::resolve(tags, &SelectionMode::PlainLatest, policy) {
            Ok(latest) => latest.and_then(|t| t.version),
            Err(crate::error::ReleaseError::NoValidTagFound) => None,
            Err(e) => return Err(e),
        },
    };

    let current = match base {
        Some(v) => v,
        None => {
            // First release ever: start from the configured initial version
            let initial = version::parse(&config.release.initial_version)?;
            ui::display_status(&format!("First release, starting at {}", initial));
            return Ok(Some(config.release.format_tag(&initial.to_string())));
        }
    };

    let bump = calculator.decide(commits);
    ui::display_status(&format!("Next semver bump: {:?}", bump));

    match calculator.next_version(&current, bump)? {
        Some(next) => Ok(Some(config.release.format_tag(&next.to_string()))),
        None => Ok(None),
    }
}

/// Run the full release workflow against a host.
///
/// # Arguments
/// * `host` - Repository host owning tags and releases
/// * `config` - Loaded configuration
/// * `args` - Per-run arguments
/// * `head_sha` - Commit the release will point at
pub fn run_release<H: ReleaseHost>(
    host: &H,
    config: &Config,
    args: &ReleaseArgs,
    head_sha: &str,
) -> Result<ReleaseReport> {
    let policy = config.environment(&args.environment)?;
    let classifier = Classifier::new(&config.matchers)?;
    let calculator = BumpCalculator::new(policy.clone());
    let mut warnings = Vec::new();

    ui::display_group("Resolving previous release tag");
    let tags: Vec<Tag> = host
        .list_tags()?
        .into_iter()
        .map(|entry| Tag::new(entry.name))
        .collect();
    ui::display_status(&format!("Found {} tags", tags.len()));

    warnings.extend(resolver::channel_warnings(&tags, &config.known_channels()));

    let previous = resolver::resolve(&tags, &args.mode, policy)?;
    match &previous {
        Some(tag) => ui::display_status(&format!("Previous release tag: {}", tag.name)),
        None => ui::display_status("No previous release tag; assuming first release"),
    }

    ui::display_group("Fetching commit history");
    let base = match &previous {
        Some(tag) if host.tag_exists(&tag.name).unwrap_or(false) => tag.name.clone(),
        _ => ROOT_BASE.to_string(),
    };

    let raw_commits = match host.compare_commits(&base, head_sha) {
        Ok(commits) => commits,
        Err(e) => {
            warnings.push(ReleaseWarning::UnavailableCommitRange {
                base: base.clone(),
                reason: e.to_string(),
            });
            Vec::new()
        }
    };
    ui::display_status(&format!(
        "Found {} commits since last release",
        raw_commits.len()
    ));

    let classified: Vec<ClassifiedCommit> =
        raw_commits.iter().map(|c| classifier.classify(c)).collect();
    let relevant: Vec<ClassifiedCommit> = classified
        .iter()
        .filter(|c| !c.is_noise())
        .cloned()
        .collect();

    let changelog = changelog::render(&classified);

    let tag_name = match &args.tag {
        Some(explicit) => explicit.clone(),
        None => match computed_tag(config, &calculator, policy, &tags, &previous, &relevant)? {
            Some(tag) => tag,
            None => {
                ui::display_status("No version-worthy change; skipping release");
                return Ok(ReleaseReport {
                    outcome: ReleaseOutcome::Skipped {
                        previous: previous.map(|t| t.name),
                    },
                    warnings,
                });
            }
        },
    };
    ui::display_status(&format!("Target release tag: {}", tag_name));

    if args.dry_run {
        return Ok(ReleaseReport {
            outcome: ReleaseOutcome::Planned {
                tag: tag_name,
                previous: previous.map(|t| t.name),
                changelog,
            },
            warnings,
        });
    }

    ui::display_group("Creating release tag");
    host.create_or_update_tag(&tag_name, head_sha)?;
    ui::display_success(&format!("Tag {} now points at {}", tag_name, head_sha));

    if let Some(existing) = host.get_release_by_tag(&tag_name)? {
        ui::display_status(&format!("Replacing existing release {}", existing.id));
        host.delete_release(existing.id)?;
    }

    ui::display_group(&format!("Generating new release for the {} tag", tag_name));
    let release = host.create_release(&ReleaseParams {
        tag_name: tag_name.clone(),
        name: release_name(&args.title, &tag_name),
        body: changelog.clone(),
        prerelease: args.prerelease,
    })?;
    ui::display_success(&format!("Created release {}", release.id));

    let mut uploaded = Vec::new();
    if !args.artifacts.is_empty() {
        ui::display_group("Uploading release artifacts");
        let report = upload::upload_artifacts(host, &release, &args.artifacts);
        uploaded = report.uploaded;
        warnings.extend(report.warnings);
        ui::display_status(&format!("Uploaded {} artifacts", uploaded.len()));
    }

    Ok(ReleaseReport {
        outcome: ReleaseOutcome::Published {
            tag: tag_name,
            release_id: release.id,
            previous: previous.map(|t| t.name),
            changelog,
            uploaded,
        },
        warnings,
    })
}
