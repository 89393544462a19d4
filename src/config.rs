use crate::bump::Bump;
use crate::conventional::{DEFAULT_MERGE_PATTERN, DEFAULT_REVERT_PATTERN};
use crate::error::{ReleaseError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Complete configuration for auto-release.
///
/// Contains the environment policy table, merge/revert matcher overrides, and
/// release defaults (initial version, tag pattern).
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Config {
    #[serde(default = "default_environments")]
    pub environments: HashMap<String, EnvironmentPolicy>,

    #[serde(default)]
    pub matchers: MatcherConfig,

    #[serde(default)]
    pub release: ReleaseDefaults,
}

/// Per-environment release policy.
///
/// One record reproduces every tag-selection and bump-policy variant: a
/// prerelease-tracking environment carries a channel label, a stable one
/// restricts resolution to tags without prerelease identifiers, and
/// `default_bump` decides what happens when no qualifying commit exists.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct EnvironmentPolicy {
    /// Prerelease channel label tracked by this environment (e.g. "pre", "beta")
    #[serde(default)]
    pub prerelease_channel: Option<String>,

    /// Restrict tag resolution to versions without prerelease identifiers
    #[serde(default = "default_true")]
    pub stable_only: bool,

    /// Bump applied when no commit qualifies (Bump::None means "do not release")
    #[serde(default)]
    pub default_bump: Bump,
}

fn default_true() -> bool {
    true
}

fn default_environments() -> HashMap<String, EnvironmentPolicy> {
    let mut map = HashMap::new();
    map.insert(
        "dev".to_string(),
        EnvironmentPolicy {
            prerelease_channel: None,
            stable_only: true,
            default_bump: Bump::Patch,
        },
    );
    map.insert(
        "test".to_string(),
        EnvironmentPolicy {
            prerelease_channel: Some("pre".to_string()),
            stable_only: false,
            default_bump: Bump::None,
        },
    );
    map.insert(
        "prod".to_string(),
        EnvironmentPolicy {
            prerelease_channel: None,
            stable_only: true,
            default_bump: Bump::Patch,
        },
    );
    map
}

/// Merge/revert commit detection patterns
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct MatcherConfig {
    #[serde(default = "default_merge_pattern")]
    pub merge_pattern: String,

    #[serde(default = "default_revert_pattern")]
    pub revert_pattern: String,
}

fn default_merge_pattern() -> String {
    DEFAULT_MERGE_PATTERN.to_string()
}

fn default_revert_pattern() -> String {
    DEFAULT_REVERT_PATTERN.to_string()
}

impl Default for MatcherConfig {
    fn default() -> Self {
        MatcherConfig {
            merge_pattern: default_merge_pattern(),
            revert_pattern: default_revert_pattern(),
        }
    }
}

/// Release formatting defaults
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ReleaseDefaults {
    /// Version used for the very first release of a repository
    #[serde(default = "default_initial_version")]
    pub initial_version: String,

    /// Tag name pattern, with a {version} placeholder
    #[serde(default = "default_tag_pattern")]
    pub tag_pattern: String,
}

fn default_initial_version() -> String {
    "0.1.0".to_string()
}

fn default_tag_pattern() -> String {
    "{version}".to_string()
}

impl Default for ReleaseDefaults {
    fn default() -> Self {
        ReleaseDefaults {
            initial_version: default_initial_version(),
            tag_pattern: default_tag_pattern(),
        }
    }
}

impl ReleaseDefaults {
    /// Render a version through the tag pattern
    pub fn format_tag(&self, version: &str) -> String {
        self.tag_pattern.replace("{version}", version)
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            environments: default_environments(),
            matchers: MatcherConfig::default(),
            release: ReleaseDefaults::default(),
        }
    }
}

impl Config {
    /// Look up the policy for a named environment.
    ///
    /// # Returns
    /// * `Ok(&EnvironmentPolicy)` - The configured policy
    /// * `Err(Config)` - If the environment is not configured
    pub fn environment(&self, name: &str) -> Result<&EnvironmentPolicy> {
        self.environments.get(name).ok_or_else(|| {
            let mut known: Vec<&str> = self.environments.keys().map(|k| k.as_str()).collect();
            known.sort_unstable();
            ReleaseError::config(format!(
                "Unknown environment '{}' (configured: {})",
                name,
                known.join(", ")
            ))
        })
    }

    /// Every prerelease channel label configured across environments
    pub fn known_channels(&self) -> Vec<String> {
        let mut labels: Vec<String> = self
            .environments
            .values()
            .filter_map(|p| p.prerelease_channel.clone())
            .collect();
        labels.sort_unstable();
        labels.dedup();
        labels
    }
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `autorelease.toml` in current directory
/// 3. `.autorelease.toml` in the user config directory
/// 4. Default configuration if no file found
///
/// # Arguments
/// * `config_path` - Optional path to custom configuration file
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If file exists but cannot be read or parsed
pub fn load_config(config_path: Option<&str>) -> Result<Config> {
    let config_str = if let Some(path) = config_path {
        fs::read_to_string(path)?
    } else if Path::new("./autorelease.toml").exists() {
        fs::read_to_string("./autorelease.toml")?
    } else if let Some(config_dir) = dirs::config_dir() {
        let config_path = config_dir.join(".autorelease.toml");
        if config_path.exists() {
            fs::read_to_string(config_path)?
        } else {
            return Ok(Config::default());
        }
    } else {
        return Ok(Config::default());
    };

    let config: Config =
        toml::from_str(&config_str).map_err(|e| ReleaseError::config(e.to_string()))?;
    Ok(config)
}
