// repo-fleet: branch-based bulk changes across git repositories
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Units, where they come from, and the persisted repository list.
//!
//! ```text
//! UnitSource ──> Vec<Unit> ──> DiscoveryFilter ──> orchestrator::group_units
//!     |                                                   |
//!     |  RepositoryListFile (yaml/json)                   v
//!     '<──────────── RepositoryList::from_groups <── RepositoryGroup
//! ```
//!
//! A repository list file looks like:
//!
//! ```yaml
//! - url: https://github.com/acme/widgets.git
//!   branch: track/1.0
//!   units:
//!     - path: charms/widget
//!       name: widget
//! ```

pub mod descriptor;


use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;
use wax::{Glob, Program as _};

use crate::config::types::DiscoveryConfig;
use crate::error::{ConfigError, FleetResult, InputError};

pub use descriptor::{CharmDescriptorReader, Descriptor, DescriptorKind, DescriptorSource};

/// A named sub-project inside a repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unit {
    pub name: String,
    pub url: String,
    /// Directory of the unit relative to the repository root.
    pub path: PathBuf,
    /// The unit's home branch.
    pub branch: String,
}

impl Unit {
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        url: impl Into<String>,
        path: impl Into<PathBuf>,
        branch: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            path: path.into(),
            branch: branch.into(),
        }
    }
}

/// Units sharing one repository and one home branch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryGroup {
    pub url: String,
    pub branch: String,
    pub units: Vec<Unit>,
}

/// Anything that can enumerate units.
pub trait UnitSource {
    /// All units this source knows about.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying data cannot be read.
    fn units(&self) -> FleetResult<Vec<Unit>>;
}

impl UnitSource for Vec<Unit> {
    fn units(&self) -> FleetResult<Vec<Unit>> {
        Ok(self.clone())
    }
}

/// Units read from a persisted repository list.
#[derive(Debug, Clone)]
pub struct RepositoryListFile {
    path: PathBuf,
}

impl RepositoryListFile {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl UnitSource for RepositoryListFile {
    fn units(&self) -> FleetResult<Vec<Unit>> {
        Ok(RepositoryList::load(&self.path)?.into_units())
    }
}

/// Units from several sources, in order.
impl<S: UnitSource> UnitSource for [S] {
    fn units(&self) -> FleetResult<Vec<Unit>> {
        let mut all = Vec::new();
        for source in self {
            all.extend(source.units()?);
        }
        Ok(all)
    }
}

// --- Filtering ---

/// Reduces a URL to `host/owner/repo` for glob matching.
fn match_key(url: &str) -> String {
    let url = url.trim().trim_end_matches('/');
    let url = url.strip_suffix(".git").unwrap_or(url);
    if let Some((_, rest)) = url.split_once("://") {
        let rest = rest.rsplit_once('@').map_or(rest, |(_, host)| host);
        return rest.to_string();
    }
    if let Some((user_host, path)) = url.split_once(':') {
        let host = user_host.rsplit_once('@').map_or(user_host, |(_, host)| host);
        return format!("{host}/{path}");
    }
    url.to_string()
}

fn is_exact_url(pattern: &str) -> bool {
    pattern.contains("://") || pattern.starts_with("git@")
}

/// One compiled skip pattern.
#[derive(Debug, Clone)]
enum SkipPattern {
    /// `host/owner/repo` of a URL pattern.
    Exact(String),
    Glob(Glob<'static>),
}

impl SkipPattern {
    fn matches(&self, key: &str) -> bool {
        match self {
            Self::Exact(exact) => exact == key,
            Self::Glob(glob) => glob.is_match(key),
        }
    }
}

/// Skip patterns and unit renames applied to discovered units.
///
/// A skip pattern that looks like a URL is compared exactly (ignoring a
/// trailing `.git`); anything else is a glob over `host/owner/repo`.
#[derive(Debug, Clone, Default)]
pub struct DiscoveryFilter {
    skip: Vec<SkipPattern>,
    rename: BTreeMap<String, String>,
}

impl DiscoveryFilter {
    /// Creates a filter, compiling every glob once.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` for a malformed glob.
    pub fn new(skip: Vec<String>, rename: BTreeMap<String, String>) -> Result<Self, ConfigError> {
        let skip = skip
            .iter()
            .map(|pattern| {
                if is_exact_url(pattern) {
                    return Ok(SkipPattern::Exact(match_key(pattern)));
                }
                Glob::new(pattern)
                    .map(|glob| SkipPattern::Glob(glob.into_owned()))
                    .map_err(|e| ConfigError::InvalidValue {
                        section: "discovery".to_string(),
                        key: "skip".to_string(),
                        message: format!("invalid glob pattern '{pattern}': {e}"),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { skip, rename })
    }

    /// Builds a filter from the `[discovery]` section.
    ///
    /// # Errors
    ///
    /// See [`DiscoveryFilter::new`].
    pub fn from_config(config: &DiscoveryConfig) -> Result<Self, ConfigError> {
        Self::new(config.skip.clone(), config.rename.clone())
    }

    /// Whether units of `url` are left out.
    #[must_use]
    pub fn skips(&self, url: &str) -> bool {
        let key = match_key(url);
        self.skip.iter().any(|pattern| pattern.matches(&key))
    }

    /// Drops skipped units and renames the rest.
    #[must_use]
    pub fn apply(&self, units: Vec<Unit>) -> Vec<Unit> {
        units
            .into_iter()
            .filter(|unit| {
                let skipped = self.skips(&unit.url);
                if skipped {
                    debug!(repo = %unit.url, unit = %unit.name, "skipped by discovery filter");
                }
                !skipped
            })
            .map(|mut unit| {
                if let Some(new) = self.rename.get(&unit.name) {
                    debug!(from = %unit.name, to = %new, "renamed unit");
                    unit.name.clone_from(new);
                }
                unit
            })
            .collect()
    }
}

// --- Persisted format ---

/// File format of a repository list, chosen by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListFormat {
    Yaml,
    Json,
}

impl ListFormat {
    /// Format for `path`.
    ///
    /// # Errors
    ///
    /// Returns `InputError::UnsupportedFormat` for anything but
    /// `.yaml`, `.yml` and `.json`.
    pub fn from_path(path: &Path) -> Result<Self, InputError> {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("yaml" | "yml") => Ok(Self::Yaml),
            Some("json") => Ok(Self::Json),
            _ => Err(InputError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

/// A unit inside a [`RepositoryRecord`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitRecord {
    pub path: PathBuf,
    pub name: String,
}

/// One repository of a persisted list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryRecord {
    pub url: String,
    pub branch: String,
    #[serde(default)]
    pub units: Vec<UnitRecord>,
}

/// Snapshot of grouped repositories that can be saved and replayed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RepositoryList {
    pub repositories: Vec<RepositoryRecord>,
}

impl RepositoryList {
    #[must_use]
    pub fn from_groups(groups: &[RepositoryGroup]) -> Self {
        let repositories = groups
            .iter()
            .map(|group| RepositoryRecord {
                url: group.url.clone(),
                branch: group.branch.clone(),
                units: group
                    .units
                    .iter()
                    .map(|unit| UnitRecord {
                        path: unit.path.clone(),
                        name: unit.name.clone(),
                    })
                    .collect(),
            })
            .collect();
        Self { repositories }
    }

    /// Every unit, each inheriting its record's URL and branch.
    #[must_use]
    pub fn into_units(self) -> Vec<Unit> {
        self.repositories
            .into_iter()
            .flat_map(|record| {
                let RepositoryRecord { url, branch, units } = record;
                units
                    .into_iter()
                    .map(move |unit| Unit::new(unit.name, url.clone(), unit.path, branch.clone()))
            })
            .collect()
    }

    /// Parses a list in the given format.
    ///
    /// # Errors
    ///
    /// Returns `InputError::MalformedRepositoryList` on invalid content.
    pub fn parse(content: &str, format: ListFormat, origin: &Path) -> Result<Self, InputError> {
        let malformed = |message: String| InputError::MalformedRepositoryList {
            path: origin.display().to_string(),
            message,
        };
        match format {
            ListFormat::Yaml => serde_yml::from_str(content).map_err(|e| malformed(e.to_string())),
            ListFormat::Json => {
                serde_json::from_str(content).map_err(|e| malformed(e.to_string()))
            }
        }
    }

    /// Reads a list, picking the format from the extension.
    ///
    /// # Errors
    ///
    /// - `InputError::UnsupportedFormat` for an unknown extension.
    /// - `InputError::MalformedRepositoryList` on invalid content.
    /// - `FleetError::Io` if the file cannot be read.
    pub fn load(path: &Path) -> FleetResult<Self> {
        let format = ListFormat::from_path(path)?;
        let content = std::fs::read_to_string(path)?;
        let list = Self::parse(&content, format, path)?;
        debug!(path = %path.display(), repositories = list.repositories.len(), "loaded repository list");
        Ok(list)
    }

    /// Renders the list in the given format.
    ///
    /// # Errors
    ///
    /// Returns `InputError::MalformedRepositoryList` if serialization fails.
    pub fn render(&self, format: ListFormat) -> Result<String, InputError> {
        let failed = |message: String| InputError::MalformedRepositoryList {
            path: "<output>".to_string(),
            message,
        };
        match format {
            ListFormat::Yaml => serde_yml::to_string(self).map_err(|e| failed(e.to_string())),
            ListFormat::Json => serde_json::to_string_pretty(self)
                .map(|mut s| {
                    s.push('\n');
                    s
                })
                .map_err(|e| failed(e.to_string())),
        }
    }

    /// Writes the list, picking the format from the extension.
    ///
    /// # Errors
    ///
    /// See [`RepositoryList::load`].
    pub fn save(&self, path: &Path) -> FleetResult<()> {
        let format = ListFormat::from_path(path)?;
        let content = self.render(format)?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        debug!(path = %path.display(), "saved repository list");
        Ok(())
    }
}
