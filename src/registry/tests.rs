// repo-fleet: branch-based bulk changes across git repositories
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use super::{ImageReference, Platform, Tag, TagSource, newest_tag};
use crate::error::{FleetResult, InputError, RepositoryError};

/// Tags keyed by `platform/namespace/name`.
#[derive(Default)]
struct MemoryRegistry {
    tags: HashMap<String, Vec<Tag>>,
}

impl MemoryRegistry {
    fn key(image: &ImageReference) -> String {
        format!("{}/{}", image.platform, image.repository())
    }

    fn publish(&mut self, image: &str, tag: &str, updated: &str, status: &str, archs: &[&str]) {
        let image = ImageReference::parse(image).unwrap();
        self.tags.entry(Self::key(&image)).or_default().push(Tag {
            name: tag.to_string(),
            last_update: timestamp(updated),
            status: status.to_string(),
            architectures: archs.iter().map(ToString::to_string).collect(),
        });
    }
}

impl TagSource for MemoryRegistry {
    async fn tags(&self, image: &ImageReference) -> FleetResult<Vec<Tag>> {
        self.tags.get(&Self::key(image)).cloned().ok_or_else(|| {
            RepositoryError::Api {
                status: 404,
                url: Self::key(image),
                message: "repository not found".to_string(),
            }
            .into()
        })
    }
}

fn timestamp(raw: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(raw).unwrap().with_timezone(&Utc)
}

fn registry() -> MemoryRegistry {
    let mut registry = MemoryRegistry::default();
    let image = "charmedkubeflow/admission-webhook:1.0";
    registry.publish(image, "1.9.0", "2025-01-10T00:00:00Z", "active", &["amd64", "arm64"]);
    registry.publish(image, "1.10.0", "2025-06-01T00:00:00Z", "active", &["amd64"]);
    registry.publish(image, "1.11.0-rc1", "2025-07-01T00:00:00Z", "inactive", &["amd64", "arm64"]);
    registry
}

// =============================================================================
// ImageReference
// =============================================================================

#[test]
fn test_parse_qualified_references() {
    let docker = ImageReference::parse("docker.io/charmedkubeflow/katib-db-manager:v0.18.0-d73ff5e")
        .unwrap();
    assert_eq!(docker.platform, Platform::Docker);
    assert_eq!(docker.repository(), "charmedkubeflow/katib-db-manager");
    assert_eq!(docker.tag, "v0.18.0-d73ff5e");

    let github = ImageReference::parse("ghcr.io/acme/widget:1.2").unwrap();
    assert_eq!(github.platform, Platform::Github);
    assert_eq!(github.to_string(), "ghcr.io/acme/widget:1.2");
}

#[test]
fn test_parse_defaults_platform_and_namespace() {
    let namespaced = ImageReference::parse("charmedkubeflow/admission-webhook:1.10.0-8dd1032").unwrap();
    assert_eq!(
        namespaced.to_string(),
        "docker.io/charmedkubeflow/admission-webhook:1.10.0-8dd1032"
    );

    let bare = ImageReference::parse("postgres:16").unwrap();
    assert_eq!(bare.to_string(), "docker.io/library/postgres:16");
}

#[test]
fn test_parse_rejects_malformed_references() {
    for reference in [
        "charmedkubeflow/admission-webhook",
        "docker.io/a/b/c:1.0",
        "acme/widget:",
        "localhost:5000/acme/widget:1.0",
        "/widget:1.0",
    ] {
        assert!(
            matches!(
                ImageReference::parse(reference),
                Err(InputError::InvalidImageReference { .. })
            ),
            "{reference}"
        );
    }
}

#[test]
fn test_with_tag_keeps_repository() {
    let image = ImageReference::parse("ghcr.io/acme/widget:1.2").unwrap();
    insta::assert_snapshot!(image.with_tag("1.3").to_string(), @"ghcr.io/acme/widget:1.3");
}

// =============================================================================
// TagSource
// =============================================================================

#[tokio::test]
async fn test_newest_tag_skips_inactive_tags() {
    let image = ImageReference::parse("docker.io/charmedkubeflow/admission-webhook:1.9.0").unwrap();

    let newest = newest_tag(&registry(), &image, None).await.unwrap().unwrap();

    assert_eq!(newest.name, "1.10.0");
}

#[tokio::test]
async fn test_newest_tag_for_architecture() {
    let image = ImageReference::parse("charmedkubeflow/admission-webhook:1.9.0").unwrap();
    let registry = registry();

    let arm = newest_tag(&registry, &image, Some("arm64")).await.unwrap();
    let riscv = newest_tag(&registry, &image, Some("riscv64")).await.unwrap();

    assert_eq!(arm.map(|tag| tag.name), Some("1.9.0".to_string()));
    assert_eq!(riscv, None);
}

#[tokio::test]
async fn test_lookup_failure_propagates() {
    let image = ImageReference::parse("ghcr.io/acme/unknown:1.0").unwrap();

    let err = newest_tag(&registry(), &image, None).await.unwrap_err();

    assert!(matches!(
        err.as_repository(),
        Some(RepositoryError::Api { status: 404, .. })
    ));
}
