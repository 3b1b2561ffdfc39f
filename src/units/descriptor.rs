// repo-fleet: branch-based bulk changes across git repositories
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Per-unit descriptor files.
//!
//! ```text
//! unit_dir/metadata.yaml     name, docs, resources (oci-image upstream-source)
//! unit_dir/charmcraft.yaml   name, links.documentation   (fallback)
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::error::{FleetResult, InputError};

pub const METADATA_FILE: &str = "metadata.yaml";
pub const CHARMCRAFT_FILE: &str = "charmcraft.yaml";

/// Which file a descriptor was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DescriptorKind {
    Metadata,
    Charmcraft,
}

impl fmt::Display for DescriptorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Metadata => write!(f, "{METADATA_FILE}"),
            Self::Charmcraft => write!(f, "{CHARMCRAFT_FILE}"),
        }
    }
}

/// What a unit says about itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Descriptor {
    pub name: String,
    pub docs: Option<String>,
    /// Resource name to upstream image reference.
    pub resources: BTreeMap<String, String>,
    pub file: PathBuf,
    pub kind: DescriptorKind,
}

/// Reads the descriptor of a unit directory.
pub trait DescriptorSource {
    /// `None` when the directory has no descriptor.
    ///
    /// # Errors
    ///
    /// Returns `InputError::MalformedDescriptor` when one exists but cannot be parsed.
    fn read(&self, unit_dir: &Path) -> FleetResult<Option<Descriptor>>;
}

#[derive(Deserialize)]
struct MetadataFile {
    name: String,
    #[serde(default)]
    docs: Option<String>,
    #[serde(default)]
    resources: Option<BTreeMap<String, ResourceEntry>>,
}

#[derive(Deserialize)]
struct ResourceEntry {
    #[serde(rename = "type")]
    kind: String,
    #[serde(rename = "upstream-source", default)]
    upstream_source: Option<String>,
}

#[derive(Deserialize)]
struct CharmcraftFile {
    name: String,
    #[serde(default)]
    links: Option<Links>,
}

#[derive(Deserialize)]
struct Links {
    #[serde(default)]
    documentation: Option<String>,
}

/// Reads `metadata.yaml`, falling back to `charmcraft.yaml`.
#[derive(Debug, Clone, Copy, Default)]
pub struct CharmDescriptorReader;

fn parse_yaml<T: DeserializeOwned>(file: &Path) -> FleetResult<T> {
    let content = std::fs::read_to_string(file)?;
    let malformed = |message: String| InputError::MalformedDescriptor {
        path: file.display().to_string(),
        message,
    };
    if content.trim().is_empty() {
        return Err(malformed("file is empty".to_string()).into());
    }
    Ok(serde_yml::from_str(&content).map_err(|e| malformed(e.to_string()))?)
}

impl CharmDescriptorReader {
    fn read_metadata(file: &Path) -> FleetResult<Descriptor> {
        let parsed: MetadataFile = parse_yaml(file)?;
        let resources = match parsed.resources {
            Some(resources) => resources
                .into_iter()
                .filter(|(_, entry)| entry.kind == "oci-image")
                .filter_map(|(name, entry)| entry.upstream_source.map(|source| (name, source)))
                .collect(),
            None => {
                warn!(unit = %parsed.name, "descriptor has no resources");
                BTreeMap::new()
            }
        };
        Ok(Descriptor {
            name: parsed.name,
            docs: parsed.docs,
            resources,
            file: file.to_path_buf(),
            kind: DescriptorKind::Metadata,
        })
    }

    fn read_charmcraft(file: &Path) -> FleetResult<Descriptor> {
        let parsed: CharmcraftFile = parse_yaml(file)?;
        Ok(Descriptor {
            name: parsed.name,
            docs: parsed.links.and_then(|links| links.documentation),
            resources: BTreeMap::new(),
            file: file.to_path_buf(),
            kind: DescriptorKind::Charmcraft,
        })
    }
}

impl DescriptorSource for CharmDescriptorReader {
    fn read(&self, unit_dir: &Path) -> FleetResult<Option<Descriptor>> {
        let metadata = unit_dir.join(METADATA_FILE);
        if metadata.is_file() {
            return Self::read_metadata(&metadata).map(Some);
        }
        let charmcraft = unit_dir.join(CHARMCRAFT_FILE);
        if charmcraft.is_file() {
            return Self::read_charmcraft(&charmcraft).map(Some);
        }
        debug!(dir = %unit_dir.display(), "no descriptor found");
        Ok(None)
    }
}
