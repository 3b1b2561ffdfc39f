// repo-fleet: branch-based bulk changes across git repositories
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Scratch repositories with a bare local remote.
//!
//! ```text
//! temp/
//!   seed/         working repo used to build history
//!   remote.git    bare clone of seed, the "origin" under test
//!   base/         where handles clone to
//! ```
//!
//! The seed has `main` (a/one.txt, b/two.txt, README) and `feature`
//! (adds feature.txt, rewrites README).

use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::Arc;

use tempfile::TempDir;

use super::handle::{HandleOptions, RepositoryHandle};
use crate::config::Credentials;

pub(crate) fn git(args: &[&str], cwd: &Path) -> String {
    let output = Command::new("git")
        .args(args)
        .current_dir(cwd)
        .output()
        .expect("failed to run git");
    assert!(
        output.status.success(),
        "git {} failed: {}",
        args.join(" "),
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

pub(crate) struct Fixture {
    pub(crate) temp: TempDir,
    pub(crate) seed: PathBuf,
    pub(crate) remote: PathBuf,
    pub(crate) base: PathBuf,
}

impl Fixture {
    pub(crate) fn new() -> Self {
        let temp = tempfile::tempdir().expect("failed to create temp dir");
        let seed = temp.path().join("seed");
        let remote = temp.path().join("remote.git");
        let base = temp.path().join("base");
        std::fs::create_dir_all(seed.join("a")).unwrap();
        std::fs::create_dir_all(seed.join("b")).unwrap();

        git(&["init", "--quiet", "--initial-branch=main"], &seed);
        git(&["config", "user.email", "seed@example.com"], &seed);
        git(&["config", "user.name", "Seed"], &seed);
        std::fs::write(seed.join("README"), "base\n").unwrap();
        std::fs::write(seed.join("a/one.txt"), "one\n").unwrap();
        std::fs::write(seed.join("b/two.txt"), "two\n").unwrap();
        git(&["add", "-A"], &seed);
        git(&["commit", "--quiet", "-m", "initial"], &seed);

        git(&["checkout", "--quiet", "-b", "feature"], &seed);
        std::fs::write(seed.join("feature.txt"), "feature\n").unwrap();
        std::fs::write(seed.join("README"), "feature\n").unwrap();
        git(&["add", "-A"], &seed);
        git(&["commit", "--quiet", "-m", "feature work"], &seed);
        git(&["checkout", "--quiet", "main"], &seed);

        git(
            &[
                "clone",
                "--quiet",
                "--bare",
                seed.to_str().unwrap(),
                remote.to_str().unwrap(),
            ],
            temp.path(),
        );

        Self {
            temp,
            seed,
            remote,
            base,
        }
    }

    pub(crate) fn url(&self) -> String {
        self.remote.display().to_string()
    }

    pub(crate) fn open(&self, options: HandleOptions) -> RepositoryHandle {
        RepositoryHandle::open_or_clone(&self.url(), &self.base, credentials(), options)
            .expect("failed to open or clone")
    }

    /// Commit id a ref points at in the bare remote, if it exists.
    pub(crate) fn remote_ref(&self, name: &str) -> Option<String> {
        let output = Command::new("git")
            .args(["rev-parse", "--verify", "--quiet", name])
            .current_dir(&self.remote)
            .output()
            .expect("failed to run git");
        output
            .status
            .success()
            .then(|| String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

pub(crate) fn credentials() -> Arc<Credentials> {
    Arc::new(Credentials::new("fleet-bot", "test-token").unwrap())
}
