// repo-fleet: branch-based bulk changes across git repositories
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Container image references and the tag lookup collaborator.
//!
//! ```text
//! "ghcr.io/acme/widget:1.2"
//!     |  ImageReference::parse
//!     v
//! { platform: ghcr.io, namespace: acme, name: widget, tag: 1.2 }
//!     |  TagSource::tags
//!     v
//! [Tag { name, last_update, status, architectures }]
//!     |  newest_tag(architecture)
//!     v
//! newest active tag built for that architecture
//! ```
//!
//! References without a known registry host belong to Docker Hub, and a
//! bare image name lives in the `library` namespace.

#[cfg(test)]
mod tests;

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{FleetResult, InputError};

/// Registries an image reference can name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Platform {
    Docker,
    Github,
}

impl Platform {
    const ALL: [Self; 2] = [Self::Docker, Self::Github];

    #[must_use]
    pub const fn host(self) -> &'static str {
        match self {
            Self::Docker => "docker.io",
            Self::Github => "ghcr.io",
        }
    }

    /// Splits a leading registry host off `image`.
    fn split(image: &str) -> (Self, &str) {
        Self::ALL
            .iter()
            .find_map(|platform| {
                image
                    .strip_prefix(platform.host())
                    .and_then(|rest| rest.strip_prefix('/'))
                    .map(|rest| (*platform, rest))
            })
            .unwrap_or((Self::Docker, image))
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.host())
    }
}

/// A fully qualified `platform/namespace/name:tag` image reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageReference {
    pub platform: Platform,
    pub namespace: String,
    pub name: String,
    pub tag: String,
}

impl ImageReference {
    /// Parses `[platform/][namespace/]name:tag`.
    ///
    /// # Errors
    ///
    /// Returns `InputError::InvalidImageReference` when the tag is missing
    /// or the path has more than a namespace and a name.
    pub fn parse(reference: &str) -> Result<Self, InputError> {
        let invalid = |message: &str| InputError::InvalidImageReference {
            reference: reference.to_string(),
            message: message.to_string(),
        };

        let trimmed = reference.trim();
        let (path, tag) = trimmed
            .split_once(':')
            .ok_or_else(|| invalid("missing tag"))?;
        if tag.is_empty() || tag.contains([':', '/']) {
            return Err(invalid("malformed tag"));
        }

        let (platform, rest) = Platform::split(path);
        let (namespace, name) = match rest.split_once('/') {
            None => ("library", rest),
            Some((_, name)) if name.contains('/') => {
                return Err(invalid("too many path elements"));
            }
            Some((namespace, name)) => (namespace, name),
        };
        if namespace.is_empty() || name.is_empty() {
            return Err(invalid("empty namespace or name"));
        }

        Ok(Self {
            platform,
            namespace: namespace.to_string(),
            name: name.to_string(),
            tag: tag.to_string(),
        })
    }

    /// `namespace/name`, the repository part of the reference.
    #[must_use]
    pub fn repository(&self) -> String {
        format!("{}/{}", self.namespace, self.name)
    }

    /// The same image at another tag.
    #[must_use]
    pub fn with_tag(&self, tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..self.clone()
        }
    }
}

impl fmt::Display for ImageReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{}:{}",
            self.platform, self.namespace, self.name, self.tag
        )
    }
}

/// One published tag of an image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub name: String,
    pub last_update: DateTime<Utc>,
    /// Registry-reported state, `active` for usable tags.
    pub status: String,
    pub architectures: Vec<String>,
}

impl Tag {
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status.eq_ignore_ascii_case("active")
    }

    #[must_use]
    pub fn supports(&self, architecture: &str) -> bool {
        self.architectures.iter().any(|a| a == architecture)
    }
}

/// Lists the tags a registry publishes for an image.
#[allow(async_fn_in_trait)]
pub trait TagSource {
    /// All tags of `image`'s repository; the reference's own tag is ignored.
    async fn tags(&self, image: &ImageReference) -> FleetResult<Vec<Tag>>;
}

/// The most recently updated active tag of `image`.
///
/// With an `architecture`, only tags built for it are considered.
///
/// # Errors
///
/// Propagates lookup failures from `source`.
pub async fn newest_tag<S: TagSource>(
    source: &S,
    image: &ImageReference,
    architecture: Option<&str>,
) -> FleetResult<Option<Tag>> {
    let tags = source.tags(image).await?;
    Ok(tags
        .into_iter()
        .filter(Tag::is_active)
        .filter(|tag| architecture.is_none_or(|arch| tag.supports(arch)))
        .max_by(|a, b| {
            a.last_update
                .cmp(&b.last_update)
                .then_with(|| a.name.cmp(&b.name))
        }))
}
