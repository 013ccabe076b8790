//! Configuration types for a shipflow run.
//!
//! [`RunConfig`] holds what the operator asked for on the command line and is
//! validated once at construction. [`ShipConfig`] holds the optional project
//! settings loaded from `shipflow.toml`, with defaults for every field.

use crate::error::{Result, ShipError};
use anyhow::Context;
use serde::Deserialize;
use std::path::Path;

/// Default base (integration) branch.
pub const DEFAULT_BASE_BRANCH: &str = "develop";

/// Release branch that receives merges from the base branch.
pub const RELEASE_BRANCH: &str = "main";

/// Prefix applied to every feature branch.
pub const FEATURE_BRANCH_PREFIX: &str = "feature/";

/// Name of the settings file looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "shipflow.toml";

/// Parameters of a single run.
///
/// Immutable once built; [`RunConfig::new`] rejects invalid feature names so
/// nothing downstream ever sees one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    feature_name: String,
    base_branch: String,
    verbose: bool,
    skip_tests: bool,
}

impl RunConfig {
    /// Creates a run configuration, validating the feature name.
    ///
    /// # Errors
    ///
    /// Returns `ShipError::InvalidFeatureName` if the name is empty, contains
    /// anything other than ASCII letters, digits, `-` and `_`, or consists
    /// only of separators.
    pub fn new(
        feature_name: impl Into<String>,
        base_branch: impl Into<String>,
        verbose: bool,
        skip_tests: bool,
    ) -> Result<Self> {
        let feature_name = feature_name.into();
        validate_feature_name(&feature_name)?;

        Ok(Self {
            feature_name,
            base_branch: base_branch.into(),
            verbose,
            skip_tests,
        })
    }

    /// Feature name as given by the operator.
    pub fn feature_name(&self) -> &str {
        &self.feature_name
    }

    /// Base (integration) branch.
    pub fn base_branch(&self) -> &str {
        &self.base_branch
    }

    /// Whether external commands are echoed.
    pub fn verbose(&self) -> bool {
        self.verbose
    }

    /// Whether the test and build gate is bypassed.
    pub fn skip_tests(&self) -> bool {
        self.skip_tests
    }

    /// Feature branch name, always `feature/<feature_name>`.
    pub fn feature_branch(&self) -> String {
        format!("{}{}", FEATURE_BRANCH_PREFIX, self.feature_name)
    }

    /// Commit message used for the feature commit.
    pub fn commit_message(&self) -> String {
        format!("feat: [{}] Implementación inicial", self.feature_name)
    }
}

/// Checks a feature name against `^[A-Za-z0-9_-]+$`.
///
/// A name made only of `-` and `_` is rejected as well: once separators are
/// stripped there must be something left.
pub fn validate_feature_name(name: &str) -> Result<()> {
    let allowed = name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    let has_alphanumeric = name.chars().any(|c| c.is_ascii_alphanumeric());

    if allowed && has_alphanumeric {
        Ok(())
    } else {
        Err(ShipError::InvalidFeatureName(name.to_string()))
    }
}

/// Project settings loaded from `shipflow.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ShipConfig {
    /// Version control settings.
    pub git: GitSettings,

    /// Package manager settings.
    pub package: PackageSettings,

    /// Deployment settings.
    pub deploy: DeploySettings,
}

impl ShipConfig {
    /// Loads settings from `path`, falling back to defaults if the file is absent.
    ///
    /// # Errors
    ///
    /// Returns `ShipError::ConfigParseError` if the file is not valid TOML or
    /// has fields of the wrong type, and `ShipError::Anyhow` if it exists but
    /// cannot be read.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no settings file, using defaults");
            return Ok(Self::default());
        }

        Self::load_file(path)
    }

    /// Loads settings from a file that must exist.
    ///
    /// Used for a path the operator named explicitly, where a missing file is
    /// a mistake rather than an opt-out.
    ///
    /// # Errors
    ///
    /// Returns `ShipError::ConfigNotFound` if the file does not exist, plus
    /// the errors of [`ShipConfig::load`].
    pub fn load_required(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(ShipError::ConfigNotFound(path.to_path_buf()));
        }

        Self::load_file(path)
    }

    fn load_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read settings file {}", path.display()))?;

        toml::from_str(&content)
            .map_err(|e| ShipError::ConfigParseError(format!("{}: {}", path.display(), e)))
    }
}

/// Version control settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GitSettings {
    /// Remote that branches are pulled from and pushed to.
    pub remote: String,
}

impl Default for GitSettings {
    fn default() -> Self {
        Self {
            remote: "origin".to_string(),
        }
    }
}

/// Package manager settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PackageSettings {
    /// Manifest file that must exist before tests run.
    pub manifest: String,
}

impl Default for PackageSettings {
    fn default() -> Self {
        Self {
            manifest: "package.json".to_string(),
        }
    }
}

/// Deployment settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DeploySettings {
    /// Deployment CLI looked up on the execution path.
    pub tool: String,

    /// Arguments for a production deploy.
    pub args: Vec<String>,
}

impl Default for DeploySettings {
    fn default() -> Self {
        Self {
            tool: "vercel".to_string(),
            args: vec!["--prod".to_string()],
        }
    }
}
