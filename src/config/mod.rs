// repo-fleet: branch-based bulk changes across git repositories
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration management for repo-fleet.
//!
//! # Configuration Hierarchy
//!
//! ```text
//! Priority (low → high)
//! 1. defaults
//! 2. fleet.toml (cwd)
//! 3. --config
//! 4. FLEET_* env vars
//! 5. --set and CLI flags
//! ```
//!
//! # Environment Variable Mapping
//!
//! ```text
//! FLEET_GLOBAL__DRY=true            → global.dry = true
//! FLEET_PATHS__BASE=/srv/repos      → paths.base = "/srv/repos"
//! FLEET_GIT__STASH_CONFLICT=fail    → git.stash_conflict = "fail"
//! ```
//!
//! # Example
//!
//! ```toml
//! [paths]
//! base = "/srv/fleet"
//! repositories = ["charms.yaml"]
//!
//! [git]
//! stash_conflict = "prefer-branch"
//!
//! [discovery]
//! skip = ["github.com/acme/legacy-*"]
//! rename = { istio_ingressgateway = "istio_gateway" }
//! ```

pub mod credentials;
pub mod loader;
pub mod types;


use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::Result;

pub use credentials::Credentials;
use loader::ConfigLoader;
use types::{DiscoveryConfig, GitConfig, GithubConfig, GlobalConfig, PathsConfig};

/// Complete application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Global options.
    pub global: GlobalConfig,
    /// Filesystem locations.
    pub paths: PathsConfig,
    /// Hosting service settings.
    pub github: GithubConfig,
    /// Local git behavior.
    pub git: GitConfig,
    /// Unit discovery adjustments.
    pub discovery: DiscoveryConfig,
}

impl Config {
    /// Create a new configuration builder.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use repo_fleet::config::Config;
    ///
    /// let config = Config::builder()
    ///     .add_toml_file_optional("fleet.toml")
    ///     .with_env_prefix("FLEET")
    ///     .build()?;
    /// # Ok::<(), anyhow::Error>(())
    /// ```
    #[must_use]
    pub fn builder() -> ConfigLoader {
        ConfigLoader::new()
    }

    /// Load configuration from a single TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, contains invalid TOML, or
    /// does not match the `Config` structure.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::builder().add_toml_file(path).build()
    }

    /// Load configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the content is not valid TOML or does not match the
    /// `Config` structure.
    pub fn parse(content: &str) -> Result<Self> {
        Self::builder().add_toml_str(content).build()
    }

    /// Loads credentials from `github.credentials_file` or the environment.
    ///
    /// # Errors
    ///
    /// Returns an `InputError` when credentials are unreadable or empty.
    pub fn credentials(&self) -> Result<Credentials> {
        Ok(Credentials::load(self.github.credentials_file.as_deref())?)
    }

    /// Format configuration options for display.
    ///
    /// Output is ordered by key. The credentials file path is shown, never
    /// its content.
    #[must_use]
    pub fn format_options(&self) -> Vec<String> {
        let mut options = BTreeMap::new();
        let path = |p: Option<&Path>| p.map_or_else(String::new, |p| p.display().to_string());

        options.insert("global.dry".into(), self.global.dry.to_string());
        options.insert(
            "global.output_log_level".into(),
            self.global.output_log_level.as_u8().to_string(),
        );
        options.insert(
            "global.file_log_level".into(),
            self.global.file_log_level.as_u8().to_string(),
        );
        options.insert(
            "global.log_file".into(),
            path(self.global.log_file.as_deref()),
        );
        options.insert("global.json_log".into(), self.global.json_log.to_string());

        options.insert("paths.base".into(), self.paths.base.display().to_string());
        options.insert(
            "paths.repositories".into(),
            self.paths
                .repositories
                .iter()
                .map(|p| p.display().to_string())
                .collect::<Vec<_>>()
                .join(", "),
        );

        options.insert("github.api_url".into(), self.github.api_url.clone());
        options.insert(
            "github.credentials_file".into(),
            path(self.github.credentials_file.as_deref()),
        );

        options.insert("git.remote".into(), self.git.remote.clone());
        options.insert(
            "git.stash_conflict".into(),
            self.git.stash_conflict.to_string(),
        );
        options.insert(
            "git.user_email".into(),
            self.git.user_email.clone().unwrap_or_default(),
        );

        options.insert("discovery.skip".into(), self.discovery.skip.join(", "));
        for (old, new) in &self.discovery.rename {
            options.insert(format!("discovery.rename.{old}"), new.clone());
        }

        let max_key_len = options.keys().map(String::len).max().unwrap_or(0);

        options
            .into_iter()
            .map(|(key, value)| format!("{key:<max_key_len$} = {value}"))
            .collect()
    }
}
